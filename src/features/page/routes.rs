use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::map::MapService;
use crate::features::page::handlers::{self, PageState};
use crate::features::reports::ReportService;

/// Create routes for the server-rendered page
pub fn routes(report_service: Arc<ReportService>, map_service: Arc<MapService>) -> Router {
    let state = PageState {
        report_service,
        map_service,
    };

    Router::new()
        .route("/", get(handlers::index))
        .route("/fragments/reports", get(handlers::reports_fragment))
        .with_state(state)
}

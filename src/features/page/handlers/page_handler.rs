use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::core::error::{AppError, Result};
use crate::features::map::MapService;
use crate::features::page::services::{render_page, render_reports_list};
use crate::features::reports::ReportService;

/// State for page handlers
#[derive(Clone)]
pub struct PageState {
    pub report_service: Arc<ReportService>,
    pub map_service: Arc<MapService>,
}

/// Full page with map, report form and reports list
pub async fn index(State(state): State<PageState>) -> Result<Html<String>> {
    let reports = state.report_service.list().await;
    let location = state.map_service.pending_location().await;

    render_page(&reports, location.as_deref())
        .map(Html)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Reports list fragment, re-rendered from the whole collection
pub async fn reports_fragment(State(state): State<PageState>) -> Result<Html<String>> {
    let reports = state.report_service.list().await;

    render_reports_list(&reports)
        .map(Html)
        .map_err(|e| AppError::Internal(e.to_string()))
}

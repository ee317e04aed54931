use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::map::handlers;
use crate::features::map::services::MapService;

/// Create routes for the map feature
pub fn routes(map_service: Arc<MapService>) -> Router {
    Router::new()
        .route("/api/map", get(handlers::get_map_view))
        .route(
            "/api/map/pin",
            put(handlers::set_pending_pin).delete(handlers::clear_pending_pin),
        )
        .with_state(map_service)
}

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::reports::ReportService;
use crate::features::submissions::handlers::{self, SubmissionState};
use crate::features::submissions::services::SubmissionService;
use crate::shared::constants::MAX_PHOTO_SIZE;

/// Headroom over the photo limit so an oversized photo still reaches the
/// size check and gets a readable message
const MULTIPART_OVERHEAD: usize = 2 * 1024 * 1024;

/// Create routes for the submissions feature
pub fn routes(
    submission_service: Arc<SubmissionService>,
    report_service: Arc<ReportService>,
) -> Router {
    let state = SubmissionState {
        submission_service,
        report_service,
    };

    Router::new()
        .route(
            "/api/submissions",
            post(handlers::submit_report)
                .layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE + MULTIPART_OVERHEAD)),
        )
        .route("/api/submissions/state", get(handlers::get_submission_state))
        .with_state(state)
}

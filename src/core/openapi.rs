use utoipa::{Modify, OpenApi};

use crate::features::map::{dtos as map_dtos, handlers as map_handlers, models as map_models};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::submissions::{
    dtos as submissions_dtos, handlers as submissions_handlers, models as submissions_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::update_report_status,
        reports_handlers::get_report_photo,
        // Map
        map_handlers::get_map_view,
        map_handlers::set_pending_pin,
        map_handlers::clear_pending_pin,
        // Submissions
        submissions_handlers::submit_report,
        submissions_handlers::get_submission_state,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Reports
            reports_models::Severity,
            reports_models::ReportStatus,
            reports_dtos::ReportResponseDto,
            reports_dtos::UpdateReportStatusDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            // Map
            map_models::LatLng,
            map_models::Bounds,
            map_models::MarkerColor,
            map_models::MarkerIcon,
            map_models::MarkerPopup,
            map_models::Marker,
            map_models::MapLayers,
            map_models::MapView,
            map_dtos::SetPinDto,
            map_dtos::PendingPinResponseDto,
            ApiResponse<map_models::MapView>,
            ApiResponse<map_dtos::PendingPinResponseDto>,
            // Submissions
            submissions_models::SubmissionPhase,
            submissions_dtos::SubmitReportDto,
            submissions_dtos::EncodedImage,
            submissions_dtos::SubmissionPayload,
            submissions_dtos::SubmissionResponseDto,
            submissions_dtos::SubmissionStateDto,
            ApiResponse<submissions_dtos::SubmissionResponseDto>,
            ApiResponse<submissions_dtos::SubmissionStateDto>,
        )
    ),
    tags(
        (name = "reports", description = "Waterlogging reports of the current session"),
        (name = "map", description = "Map markers, viewport and pending pin"),
        (name = "submissions", description = "Report submission to the form endpoint"),
    ),
    info(
        title = "Waterlog API",
        version = "0.1.0",
        description = "API behind the waterlogging report map",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info at startup
pub struct ApiInfoModifier {
    pub version: String,
}

impl Modify for ApiInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.version = self.version.clone();
    }
}

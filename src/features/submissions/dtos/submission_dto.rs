use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::map::models::Marker;
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::submissions::models::SubmissionPhase;

/// Photo as the form endpoint expects it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EncodedImage {
    /// Base64 of the raw bytes
    pub data: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub name: String,
}

/// JSON body posted to the form endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    /// Phone number, named `number` by the endpoint
    pub number: String,
    /// "lat, lng"
    pub location: String,
    pub severity: String,
    pub description: String,
    pub image: EncodedImage,
}

/// Report form for OpenAPI documentation
/// Note: This struct is for API documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportDto {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Falls back to the pending pin when empty
    #[schema(example = "19.07600, 72.87770")]
    pub location: Option<String>,
    #[schema(example = "High")]
    pub severity: String,
    pub description: Option<String>,
    /// Photo, at most 25 MiB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: String,
}

/// Response DTO for an accepted submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponseDto {
    pub report: ReportResponseDto,
    /// Marker to add to the map
    pub marker: Marker,
    /// Reports list re-rendered with the new report
    pub reports_html: String,
    /// The page should clear its form fields
    pub form_reset: bool,
}

/// Response DTO for the submission state machine
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionStateDto {
    pub phase: SubmissionPhase,
    /// Outcome of the most recent finished submission
    pub last_outcome: Option<SubmissionPhase>,
}

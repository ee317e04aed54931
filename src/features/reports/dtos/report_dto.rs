use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::{Report, ReportStatus, Severity};

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    pub severity: Severity,
    pub comments: String,
    /// Empty when the report has no photo
    pub photo_url: String,
    pub status: ReportStatus,
    pub timestamp: String,
    pub photo_file: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            lat: r.lat,
            lng: r.lng,
            severity: r.severity,
            comments: r.comments,
            photo_url: r.photo_url,
            status: r.status,
            timestamp: r.timestamp,
            photo_file: r.photo_file,
            city: r.city,
            state: r.state,
        }
    }
}

/// Request DTO for changing a report's workflow status
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    #[schema(example = "Under Review")]
    pub status: ReportStatus,
}

use axum::body::Bytes;
use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Incident intensity, drives the marker color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }

    /// Parse the value posted by the severity select; an empty value means "not chosen"
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Low" => Some(Severity::Low),
            "Medium" => Some(Severity::Medium),
            "High" => Some(Severity::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workflow stage of a report, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 5] = [
        ReportStatus::Submitted,
        ReportStatus::UnderReview,
        ReportStatus::InProgress,
        ReportStatus::Resolved,
        ReportStatus::Closed,
    ];

    /// Status every new report starts in
    pub const INITIAL: ReportStatus = ReportStatus::Submitted;

    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Submitted => "Submitted",
            ReportStatus::UnderReview => "Under Review",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
            ReportStatus::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One waterlogging incident held in memory for the session
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    pub severity: Severity,
    pub comments: String,
    /// Displayable photo reference, empty when the report has no photo
    pub photo_url: String,
    pub status: ReportStatus,
    /// Human-readable local submission time
    pub timestamp: String,
    /// Original file name of the attached photo
    pub photo_file: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl Report {
    /// Build a report from a static data record
    pub fn from_seed(record: SeedRecord, timestamp: String) -> Self {
        Self {
            id: record.id,
            lat: record.lat,
            lng: record.lng,
            severity: record.severity,
            comments: record.description,
            photo_url: String::new(),
            status: ReportStatus::INITIAL,
            timestamp,
            photo_file: None,
            city: record.city,
            state: record.state,
        }
    }

    pub fn has_photo(&self) -> bool {
        !self.photo_url.is_empty()
    }
}

/// Current local time formatted for display next to a report
pub fn display_timestamp() -> String {
    Local::now().format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// One entry of the static data file
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRecord {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    /// Unknown or missing values fall back to `Low` instead of failing the file
    #[serde(default = "seed_fallback_severity", deserialize_with = "lenient_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

fn seed_fallback_severity() -> Severity {
    Severity::Low
}

fn lenient_severity<'de, D>(deserializer: D) -> Result<Severity, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let severity = match &value {
        serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        },
        _ => None,
    };

    Ok(severity.unwrap_or_else(|| {
        tracing::warn!("Unknown seed severity {}, using Low", value);
        seed_fallback_severity()
    }))
}

/// Data for creating a report after the form endpoint accepted it
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub lat: f64,
    pub lng: f64,
    pub severity: Severity,
    pub comments: String,
    pub photo: StoredPhoto,
}

/// Photo bytes kept alongside a submitted report
#[derive(Debug, Clone)]
pub struct StoredPhoto {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

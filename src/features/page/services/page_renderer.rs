use minijinja::{context, Value};
use serde::Serialize;

use crate::features::reports::models::{Report, ReportStatus, Severity};
use crate::shared::templates::{render_template, TemplateError};

/// Shown for an empty city or comment
const PLACEHOLDER: &str = "—";

#[derive(Debug, Serialize)]
struct StatusOptionView {
    value: &'static str,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct ReportCardView {
    id: i64,
    short_id: String,
    status_options: Vec<StatusOptionView>,
    city: String,
    coordinates: String,
    severity: &'static str,
    severity_class: String,
    comments: String,
    timestamp: String,
    photo_url: Option<String>,
    photo_file: String,
}

impl From<&Report> for ReportCardView {
    fn from(report: &Report) -> Self {
        let id = report.id.to_string();
        let short_id = id[id.len().saturating_sub(4)..].to_string();

        Self {
            id: report.id,
            short_id,
            status_options: ReportStatus::ALL
                .iter()
                .map(|s| StatusOptionView {
                    value: s.label(),
                    selected: *s == report.status,
                })
                .collect(),
            city: non_empty_or_placeholder(report.city.as_deref()),
            coordinates: format!("{:.4}, {:.4}", report.lat, report.lng),
            severity: report.severity.as_str(),
            severity_class: format!("severity-{}", report.severity.as_str().to_lowercase()),
            comments: non_empty_or_placeholder(Some(report.comments.as_str())),
            timestamp: report.timestamp.clone(),
            photo_url: report.has_photo().then(|| report.photo_url.clone()),
            photo_file: report.photo_file.clone().unwrap_or_default(),
        }
    }
}

fn non_empty_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn list_context(reports: &[Report]) -> (usize, Value) {
    let cards: Vec<ReportCardView> = reports.iter().map(ReportCardView::from).collect();
    (reports.len(), Value::from_serialize(&cards))
}

/// Render the reports list fragment from scratch
pub fn render_reports_list(reports: &[Report]) -> Result<String, TemplateError> {
    let (count, cards) = list_context(reports);
    render_template("reports_list.html", context! { count, reports => cards })
}

/// Render the full page: map container, report form and reports list
pub fn render_page(
    reports: &[Report],
    pending_location: Option<&str>,
) -> Result<String, TemplateError> {
    let (count, cards) = list_context(reports);
    let severities = [Severity::Low, Severity::Medium, Severity::High].map(|s| s.as_str());

    render_template(
        "page.html",
        context! {
            count,
            reports => cards,
            severities,
            location => pending_location.unwrap_or_default(),
        },
    )
}

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::page::render_reports_list;
use crate::features::reports::ReportService;
use crate::features::submissions::dtos::{
    SubmissionResponseDto, SubmissionStateDto, SubmitReportDto,
};
use crate::features::submissions::models::{PhotoAttachment, PhotoContent, SubmissionForm};
use crate::features::submissions::services::{SubmissionError, SubmissionService};
use crate::shared::constants::{MSG_PHOTO_TOO_LARGE, MSG_SUBMITTED};
use crate::shared::types::ApiResponse;

/// State for submission handlers
#[derive(Clone)]
pub struct SubmissionState {
    pub submission_service: Arc<SubmissionService>,
    pub report_service: Arc<ReportService>,
}

/// Submit a new waterlogging report
///
/// Accepts multipart/form-data with `name`, `phone`, `email`, `location`,
/// `severity`, `description` and `photo`. The report is forwarded to the form
/// endpoint and added to the list only if the endpoint accepts it.
#[utoipa::path(
    post,
    path = "/api/submissions",
    tag = "submissions",
    request_body(
        content = SubmitReportDto,
        content_type = "multipart/form-data",
        description = "Report form with photo",
    ),
    responses(
        (status = 201, description = "Report accepted", body = ApiResponse<SubmissionResponseDto>),
        (status = 400, description = "Missing location, severity or photo, photo too large or unreadable"),
        (status = 409, description = "Another submission is in progress"),
        (status = 422, description = "Form endpoint rejected the report"),
        (status = 502, description = "Form endpoint unreachable")
    )
)]
pub async fn submit_report(
    State(state): State<SubmissionState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionResponseDto>>)> {
    let form = read_form(multipart).await?;

    let receipt = state.submission_service.submit(form).await?;

    let reports = state.report_service.list().await;
    let reports_html =
        render_reports_list(&reports).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(SubmissionResponseDto {
                report: receipt.report.into(),
                marker: receipt.marker,
                reports_html,
                form_reset: true,
            }),
            Some(MSG_SUBMITTED.to_string()),
            None,
        )),
    ))
}

/// Current phase of the submission flow
#[utoipa::path(
    get,
    path = "/api/submissions/state",
    tag = "submissions",
    responses(
        (status = 200, description = "Submission phase", body = ApiResponse<SubmissionStateDto>)
    )
)]
pub async fn get_submission_state(
    State(state): State<SubmissionState>,
) -> Result<Json<ApiResponse<SubmissionStateDto>>> {
    let service = &state.submission_service;
    Ok(Json(ApiResponse::success(
        Some(SubmissionStateDto {
            phase: service.phase(),
            last_outcome: service.last_outcome(),
        }),
        None,
        None,
    )))
}

async fn read_form(mut multipart: Multipart) -> Result<SubmissionForm> {
    let mut form = SubmissionForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // Only the photo can push the body past the route limit. The
            // remaining fields are unreadable, so report the size right away.
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                debug!("Multipart body exceeded the limit: {}", e);
                return Err(SubmissionError::Validation(MSG_PHOTO_TOO_LARGE).into());
            }
            Err(e) => {
                debug!("Failed to read multipart field: {}", e);
                return Err(AppError::BadRequest(format!(
                    "Failed to read multipart data: {}",
                    e
                )));
            }
        };
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "photo" => {
                let photo = read_photo(field).await;
                let failed = photo
                    .as_ref()
                    .is_some_and(|p| !matches!(p.content, PhotoContent::Loaded(_)));
                form.photo = photo;
                // The stream is unusable once a file read failed
                if failed {
                    break;
                }
            }
            "name" => form.name = read_text(field).await?,
            "phone" => form.phone = read_text(field).await?,
            "email" => form.email = read_text(field).await?,
            "location" => form.location = Some(read_text(field).await?),
            "severity" => form.severity = Some(read_text(field).await?),
            "description" => form.description = read_text(field).await?,
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok(form)
}

async fn read_text(field: Field<'_>) -> Result<String> {
    let name = field.name().unwrap_or("").to_string();
    field.text().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SubmissionError::Validation(MSG_PHOTO_TOO_LARGE).into()
        } else {
            AppError::BadRequest(format!("Failed to read {} field: {}", name, e))
        }
    })
}

/// Browsers send an empty, nameless file part when nothing was attached
async fn read_photo(field: Field<'_>) -> Option<PhotoAttachment> {
    let file_name = field.file_name().unwrap_or("").to_string();
    let content_type = field
        .content_type()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let content = match field.bytes().await {
        Ok(bytes) if bytes.is_empty() && file_name.is_empty() => return None,
        Ok(bytes) => PhotoContent::Loaded(bytes),
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => PhotoContent::TooLarge,
        Err(e) => {
            debug!("Failed to read photo bytes: {}", e);
            PhotoContent::Unreadable(e.body_text())
        }
    };

    Some(PhotoAttachment {
        file_name,
        content_type,
        content,
    })
}

use base64::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::core::error::AppError;
use crate::features::map::models::Marker;
use crate::features::map::MapService;
use crate::features::reports::models::{CreateReport, Report, Severity, StoredPhoto};
use crate::features::reports::ReportService;
use crate::features::submissions::clients::{FormEndpoint, FormEndpointError};
use crate::features::submissions::dtos::{EncodedImage, SubmissionPayload};
use crate::features::submissions::models::{
    PhotoAttachment, PhotoContent, SubmissionForm, SubmissionPhase,
};
use crate::shared::constants::{
    FORM_ENDPOINT_SUCCESS, MSG_ATTACH_PHOTO, MSG_NETWORK_ERROR, MSG_PHOTO_TOO_LARGE,
    MSG_PHOTO_UNREADABLE, MSG_PICK_LOCATION, MSG_PICK_SEVERITY, MSG_SUBMISSION_IN_PROGRESS,
};
use crate::shared::validation::parse_location;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("submission already in progress")]
    InProgress,

    #[error("photo could not be read: {0}")]
    PhotoUnreadable(String),

    #[error("form endpoint unreachable: {0}")]
    Network(#[from] FormEndpointError),

    #[error("Error: {0}")]
    Rejected(String),

    #[error("failed to store report: {0}")]
    Store(String),
}

impl SubmissionError {
    /// Text shown to the user in the alert
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Validation(msg) => msg.to_string(),
            SubmissionError::InProgress => MSG_SUBMISSION_IN_PROGRESS.to_string(),
            SubmissionError::PhotoUnreadable(_) => MSG_PHOTO_UNREADABLE.to_string(),
            SubmissionError::Network(_) => MSG_NETWORK_ERROR.to_string(),
            SubmissionError::Rejected(body) => format!("Error: {}", body),
            SubmissionError::Store(_) => "Internal server error".to_string(),
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        let message = err.user_message();
        match err {
            SubmissionError::Validation(_) => AppError::Validation(message),
            SubmissionError::InProgress => AppError::Conflict(message),
            SubmissionError::PhotoUnreadable(reason) => {
                tracing::warn!("Photo read failed: {}", reason);
                AppError::BadRequest(message)
            }
            SubmissionError::Network(e) => {
                tracing::error!("Submission transport error: {}", e);
                AppError::ExternalServiceError(message)
            }
            SubmissionError::Rejected(_) => AppError::Rejected(message),
            SubmissionError::Store(reason) => AppError::Internal(reason),
        }
    }
}

/// A stored submission
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub report: Report,
    pub marker: Marker,
}

/// Form values that passed validation
#[derive(Debug)]
struct ValidatedSubmission {
    name: String,
    phone: String,
    email: String,
    location: String,
    lat: f64,
    lng: f64,
    severity: Severity,
    description: String,
    photo: PhotoAttachment,
}

#[derive(Debug)]
struct SubmissionTracker {
    phase: SubmissionPhase,
    last_outcome: Option<SubmissionPhase>,
}

/// Returns the flow to `Idle` however the submission ends, including when
/// the request future is dropped mid-flight.
struct PhaseGuard<'a> {
    tracker: &'a Mutex<SubmissionTracker>,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        lock(self.tracker).phase = SubmissionPhase::Idle;
    }
}

fn lock(tracker: &Mutex<SubmissionTracker>) -> MutexGuard<'_, SubmissionTracker> {
    tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drives one report from the form to the remote endpoint and into the collection
pub struct SubmissionService {
    endpoint: Arc<dyn FormEndpoint>,
    report_service: Arc<ReportService>,
    map_service: Arc<MapService>,
    tracker: Mutex<SubmissionTracker>,
}

impl SubmissionService {
    pub fn new(
        endpoint: Arc<dyn FormEndpoint>,
        report_service: Arc<ReportService>,
        map_service: Arc<MapService>,
    ) -> Self {
        Self {
            endpoint,
            report_service,
            map_service,
            tracker: Mutex::new(SubmissionTracker {
                phase: SubmissionPhase::Idle,
                last_outcome: None,
            }),
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        lock(&self.tracker).phase.clone()
    }

    pub fn last_outcome(&self) -> Option<SubmissionPhase> {
        lock(&self.tracker).last_outcome.clone()
    }

    /// Run a submission through validate, encode and post.
    ///
    /// Only one submission runs at a time; a second one while the first is
    /// pending fails with `InProgress` and has no side effects. The collection
    /// changes only when the endpoint answers with its success marker.
    pub async fn submit(&self, form: SubmissionForm) -> Result<SubmissionReceipt, SubmissionError> {
        let _guard = self.begin()?;

        let result = self.run(form).await;

        let outcome = match &result {
            Ok(receipt) => SubmissionPhase::Succeeded {
                report_id: receipt.report.id,
            },
            Err(e) => SubmissionPhase::Failed {
                reason: e.user_message(),
            },
        };
        let mut tracker = lock(&self.tracker);
        tracker.phase = outcome.clone();
        tracker.last_outcome = Some(outcome);
        drop(tracker);

        match &result {
            Ok(receipt) => tracing::info!("Submission stored as report {}", receipt.report.id),
            Err(e) => tracing::info!("Submission failed: {}", e),
        }

        result
    }

    fn begin(&self) -> Result<PhaseGuard<'_>, SubmissionError> {
        let mut tracker = lock(&self.tracker);
        if tracker.phase != SubmissionPhase::Idle {
            tracing::warn!("Rejected submission while {:?}", tracker.phase);
            return Err(SubmissionError::InProgress);
        }
        tracker.phase = SubmissionPhase::Validating;

        Ok(PhaseGuard {
            tracker: &self.tracker,
        })
    }

    fn transition(&self, phase: SubmissionPhase) {
        tracing::debug!("Submission phase -> {:?}", phase);
        lock(&self.tracker).phase = phase;
    }

    async fn run(&self, form: SubmissionForm) -> Result<SubmissionReceipt, SubmissionError> {
        let pending_location = self.map_service.pending_location().await;
        let submission = validate(form, pending_location)?;

        self.transition(SubmissionPhase::Encoding);
        let (image, bytes) = encode_photo(&submission.photo)?;

        self.transition(SubmissionPhase::Submitting);
        let payload = SubmissionPayload {
            name: submission.name,
            email: submission.email,
            number: submission.phone,
            location: submission.location,
            severity: submission.severity.to_string(),
            description: submission.description.clone(),
            image,
        };
        let body = self.endpoint.submit(&payload).await?;

        if body != FORM_ENDPOINT_SUCCESS {
            return Err(SubmissionError::Rejected(body));
        }

        let report = self
            .report_service
            .create(CreateReport {
                lat: submission.lat,
                lng: submission.lng,
                severity: submission.severity,
                comments: submission.description,
                photo: StoredPhoto {
                    file_name: payload.image.name,
                    content_type: payload.image.media_type,
                    bytes,
                },
            })
            .await
            .map_err(|e| SubmissionError::Store(e.to_string()))?;

        let marker = self.map_service.place_submitted_marker(&report).await;
        self.map_service.clear_pending_pin().await;

        Ok(SubmissionReceipt { report, marker })
    }
}

/// Presence and size checks, in the order the user sees them
fn validate(
    form: SubmissionForm,
    pending_location: Option<String>,
) -> Result<ValidatedSubmission, SubmissionError> {
    let location = form
        .location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .or(pending_location)
        .ok_or(SubmissionError::Validation(MSG_PICK_LOCATION))?;
    let (lat, lng) =
        parse_location(&location).ok_or(SubmissionError::Validation(MSG_PICK_LOCATION))?;

    let severity = form
        .severity
        .as_deref()
        .and_then(Severity::parse)
        .ok_or(SubmissionError::Validation(MSG_PICK_SEVERITY))?;

    let photo = form
        .photo
        .ok_or(SubmissionError::Validation(MSG_ATTACH_PHOTO))?;
    if photo.exceeds_size_limit() {
        return Err(SubmissionError::Validation(MSG_PHOTO_TOO_LARGE));
    }

    Ok(ValidatedSubmission {
        name: form.name.trim().to_string(),
        phone: form.phone.trim().to_string(),
        email: form.email.trim().to_string(),
        location,
        lat,
        lng,
        severity,
        description: form.description.trim().to_string(),
        photo,
    })
}

fn encode_photo(
    photo: &PhotoAttachment,
) -> Result<(EncodedImage, axum::body::Bytes), SubmissionError> {
    match &photo.content {
        PhotoContent::Loaded(bytes) => Ok((
            EncodedImage {
                data: BASE64_STANDARD.encode(bytes),
                media_type: photo.content_type.clone(),
                name: photo.file_name.clone(),
            },
            bytes.clone(),
        )),
        PhotoContent::Unreadable(reason) => Err(SubmissionError::PhotoUnreadable(reason.clone())),
        PhotoContent::TooLarge => Err(SubmissionError::Validation(MSG_PHOTO_TOO_LARGE)),
    }
}

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::MAX_PHOTO_SIZE;

/// Where the submission flow currently is.
///
/// `Idle -> Validating -> Encoding -> Submitting -> Succeeded | Failed -> Idle`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Encoding,
    Submitting,
    Succeeded { report_id: i64 },
    Failed { reason: String },
}

/// Raw values posted by the report form
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    /// "lat, lng" written by a map click
    pub location: Option<String>,
    pub severity: Option<String>,
    pub description: String,
    pub photo: Option<PhotoAttachment>,
}

#[derive(Debug, Clone)]
pub struct PhotoAttachment {
    pub file_name: String,
    pub content_type: String,
    pub content: PhotoContent,
}

#[derive(Debug, Clone)]
pub enum PhotoContent {
    Loaded(Bytes),
    /// Upload stopped at the request body limit
    TooLarge,
    /// Reading the upload failed
    Unreadable(String),
}

impl PhotoAttachment {
    pub fn loaded(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            content: PhotoContent::Loaded(bytes.into()),
        }
    }

    pub fn exceeds_size_limit(&self) -> bool {
        match &self.content {
            PhotoContent::Loaded(bytes) => bytes.len() > MAX_PHOTO_SIZE,
            PhotoContent::TooLarge => true,
            PhotoContent::Unreadable(_) => false,
        }
    }
}

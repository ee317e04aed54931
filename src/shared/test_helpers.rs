#[cfg(test)]
use crate::features::submissions::clients::{FormEndpoint, FormEndpointError};
#[cfg(test)]
use crate::features::submissions::dtos::SubmissionPayload;
#[cfg(test)]
use crate::features::submissions::models::{PhotoAttachment, SubmissionForm};

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use fake::{
    faker::{internet::en::SafeEmail, name::en::Name, phone_number::en::PhoneNumber},
    Fake,
};
#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use tokio::sync::Notify;

#[cfg(test)]
enum FakeReply {
    Body(String),
    Timeout,
}

/// Stand-in for the remote form endpoint that records every payload
#[cfg(test)]
pub struct FakeFormEndpoint {
    reply: FakeReply,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<SubmissionPayload>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl FakeFormEndpoint {
    pub fn replying(body: &str) -> Self {
        Self {
            reply: FakeReply::Body(body.to_string()),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn timing_out() -> Self {
        Self {
            reply: FakeReply::Timeout,
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Holds every request until `gate` is notified
    pub fn gated(body: &str, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::replying(body)
        }
    }

    pub fn calls(&self) -> Vec<SubmissionPayload> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl FormEndpoint for FakeFormEndpoint {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<String, FormEndpointError> {
        self.calls.lock().unwrap().push(payload.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            FakeReply::Body(body) => Ok(body.clone()),
            FakeReply::Timeout => Err(FormEndpointError::Timeout(
                std::time::Duration::from_secs(30),
            )),
        }
    }
}

/// A complete, valid report form carrying `photo` as a JPEG
#[cfg(test)]
pub fn sample_form(photo: &[u8]) -> SubmissionForm {
    SubmissionForm {
        name: Name().fake(),
        phone: PhoneNumber().fake(),
        email: SafeEmail().fake(),
        location: Some("19.07600, 72.87770".to_string()),
        severity: Some("High".to_string()),
        description: "Knee-deep water near the station".to_string(),
        photo: Some(PhotoAttachment::loaded(
            "street.jpg",
            "image/jpeg",
            photo.to_vec(),
        )),
    }
}

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::core::config::FormEndpointConfig;
use crate::features::submissions::dtos::SubmissionPayload;

#[derive(Debug, Error)]
pub enum FormEndpointError {
    #[error("request to form endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("form endpoint did not answer within {0:?}")]
    Timeout(Duration),
}

/// Remote form-processing endpoint that stores new reports.
///
/// Returns the raw response body; the caller decides what counts as success.
#[async_trait]
pub trait FormEndpoint: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<String, FormEndpointError>;
}

/// Posts submissions as JSON over HTTP
pub struct HttpFormEndpoint {
    http_client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpFormEndpoint {
    pub fn new(config: &FormEndpointConfig) -> Result<Self, FormEndpointError> {
        let http_client = reqwest::Client::builder()
            .user_agent("WaterlogCore/1.0 (waterlogging-report-map)")
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
            timeout: config.timeout,
        })
    }
}

impl HttpFormEndpoint {
    fn classify(&self, error: reqwest::Error) -> FormEndpointError {
        if error.is_timeout() {
            FormEndpointError::Timeout(self.timeout)
        } else {
            FormEndpointError::Transport(error)
        }
    }
}

#[async_trait]
impl FormEndpoint for HttpFormEndpoint {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<String, FormEndpointError> {
        tracing::debug!("Posting submission to {}", self.url);

        let response = self
            .http_client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        // The endpoint reports its outcome in the body, not the status code
        tracing::debug!("Form endpoint answered {} with {} bytes", status, body.len());

        Ok(body)
    }
}

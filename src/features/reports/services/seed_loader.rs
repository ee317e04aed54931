use std::time::Duration;
use thiserror::Error;

use crate::features::reports::models::SeedRecord;

/// Errors while reading the static report data
#[derive(Debug, Error)]
pub enum SeedLoadError {
    #[error("failed to read {source_path}: {error}")]
    Io {
        source_path: String,
        error: std::io::Error,
    },

    #[error("request for {0} failed: {1}")]
    Http(String, reqwest::Error),

    #[error("HTTP error! Status: {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed report data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Reads the JSON array of initial reports from a file path or an http(s) URL
pub struct SeedLoader {
    client: reqwest::Client,
}

impl SeedLoader {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent("WaterlogCore/1.0 (waterlogging-report-map)")
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    pub async fn load(&self, source: &str) -> Result<Vec<SeedRecord>, SeedLoadError> {
        let body = if source.starts_with("http://") || source.starts_with("https://") {
            self.fetch(source).await?
        } else {
            tokio::fs::read_to_string(source)
                .await
                .map_err(|error| SeedLoadError::Io {
                    source_path: source.to_string(),
                    error,
                })?
        };

        Ok(parse_seed(&body)?)
    }

    async fn fetch(&self, url: &str) -> Result<String, SeedLoadError> {
        tracing::debug!("Fetching report data from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SeedLoadError::Http(url.to_string(), e))?;

        if !response.status().is_success() {
            return Err(SeedLoadError::Status(response.status()));
        }

        response
            .text()
            .await
            .map_err(|e| SeedLoadError::Http(url.to_string(), e))
    }
}

pub fn parse_seed(body: &str) -> Result<Vec<SeedRecord>, serde_json::Error> {
    serde_json::from_str(body)
}

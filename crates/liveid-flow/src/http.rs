//! Verification HTTP client.
//!
//! Two calls back the pipeline: a plain GET for the document face crop and
//! a multipart POST to the verification endpoint. A response only counts
//! as success when the status is 200-class and the body parses as a JSON
//! object — anything else is a [`BackendError`] and the pipeline run
//! aborts without retrying.

use std::future::Future;

use reqwest::multipart::{Form, Part};
use reqwest::Url;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("response body is not a JSON object")]
    MalformedBody,
}

/// Network seam of the capture & upload pipeline. Implemented by
/// [`VerifyApiClient`] in production and by in-memory doubles in tests.
///
/// Methods are declared in desugared form so the returned futures carry a
/// `Send` bound — the engine awaits them inside a spawned task.
pub trait VerificationBackend {
    /// Fetch the previously stored reference face image.
    fn fetch_reference_image(
        &self,
        url: &Url,
    ) -> impl Future<Output = Result<Vec<u8>, BackendError>> + Send;

    /// Submit both images and the reference identifier for matching.
    /// Returns the parsed JSON object on a 200 response.
    fn submit(
        &self,
        reference_image: &[u8],
        candidate_image: &[u8],
        reference_id: &str,
    ) -> impl Future<Output = Result<serde_json::Value, BackendError>> + Send;
}

/// reqwest-backed client for the verification API.
#[derive(Debug)]
pub struct VerifyApiClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl VerifyApiClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, BackendError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| BackendError::InvalidEndpoint(e.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &crate::config::Config) -> Result<Self, BackendError> {
        Self::new(&config.verify_endpoint, &config.api_key)
    }
}

impl VerificationBackend for VerifyApiClient {
    async fn fetch_reference_image(&self, url: &Url) -> Result<Vec<u8>, BackendError> {
        tracing::debug!(url = %url, "downloading reference image");
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        tracing::debug!(len = bytes.len(), "reference image downloaded");
        Ok(bytes.to_vec())
    }

    async fn submit(
        &self,
        reference_image: &[u8],
        candidate_image: &[u8],
        reference_id: &str,
    ) -> Result<serde_json::Value, BackendError> {
        let form = Form::new()
            .part(
                "reference_image",
                Part::bytes(reference_image.to_vec())
                    .file_name("reference.jpg")
                    .mime_str("image/jpeg")?,
            )
            .part(
                "candidate_image",
                Part::bytes(candidate_image.to_vec())
                    .file_name("candidate.jpg")
                    .mime_str("image/jpeg")?,
            )
            .text("reference_id", reference_id.to_string());

        tracing::info!(reference_id, endpoint = %self.endpoint, "submitting verification request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "verification request rejected");
            return Err(BackendError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        if !body.is_object() {
            return Err(BackendError::MalformedBody);
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_endpoint() {
        let err = VerifyApiClient::new("not a url", "key").unwrap_err();
        assert!(matches!(err, BackendError::InvalidEndpoint(_)));
    }

    #[test]
    fn accepts_https_endpoint() {
        assert!(VerifyApiClient::new("https://api.example/verify", "key").is_ok());
    }
}

//! The HTTP backend client.
//!
//! `health` and `recognize` never return `Err`: transport failures and
//! unparseable payloads collapse into offline / unknown results so that
//! a flaky network can never crash or wedge the UI. Only `register`
//! surfaces errors, because the operator needs the server's message.

use crate::types::{BackendStatus, Identity, RecognitionResult};
use crate::wire::{HealthResponse, RecognizeResponse, RegisterResponse};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    InvalidIdentity(&'static str),
    #[error("{0}")]
    Server(String),
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the external recognition service.
pub struct Backend {
    http: reqwest::Client,
    base_url: String,
}

impl Backend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `/health`. Any transport failure, non-2xx status or
    /// unexpected payload uniformly reads as offline.
    pub async fn health(&self) -> BackendStatus {
        let url = format!("{}/health", self.base_url);
        let resp = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(error = %e, "health probe failed");
                return BackendStatus::offline("backend offline");
            }
        };
        if !resp.status().is_success() {
            return BackendStatus::offline(format!("backend returned {}", resp.status()));
        }
        match resp.json::<HealthResponse>().await {
            Ok(health) => health.into_status(),
            Err(_) => BackendStatus::offline("unexpected health payload"),
        }
    }

    /// Register an identity against a JPEG capture via multipart POST.
    ///
    /// Empty identity fields fail validation here, before any request is
    /// issued. Server rejections carry the backend's message verbatim.
    pub async fn register(
        &self,
        identity: &Identity,
        image: Vec<u8>,
    ) -> Result<String, ClientError> {
        identity.validate().map_err(ClientError::InvalidIdentity)?;

        let mut form = Form::new();
        match identity {
            Identity::Name(name) => {
                form = form.text("name", name.clone());
            }
            Identity::Badge {
                hospital_id,
                employee_id,
            } => {
                form = form
                    .text("hospital_id", hospital_id.clone())
                    .text("employee_id", employee_id.clone());
            }
        }
        form = form.part("image", jpeg_part(image)?);

        let resp = self
            .http
            .post(format!("{}/register", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let body: RegisterResponse = resp.json().await?;
        tracing::info!(identity = %identity.label(), "register response received");
        body.into_outcome().map_err(ClientError::Server)
    }

    /// Submit a JPEG capture to `/recognize`.
    ///
    /// Always resolves to a result: no match, transport failure and
    /// malformed 2xx payloads all map to the unknown sentinel and are
    /// distinguished only by message text.
    pub async fn recognize(&self, image: Vec<u8>) -> RecognitionResult {
        match self.try_recognize(image).await {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(error = %e, "recognize failed");
                RecognitionResult::unknown("connection error")
            }
        }
    }

    async fn try_recognize(&self, image: Vec<u8>) -> Result<RecognitionResult, ClientError> {
        let form = Form::new().part("image", jpeg_part(image)?);
        let resp = self
            .http
            .post(format!("{}/recognize", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Ok(RecognitionResult::unknown(format!(
                "backend returned {}",
                resp.status()
            )));
        }
        // A 2xx body that fails to parse is treated as no usable match.
        match resp.json::<RecognizeResponse>().await {
            Ok(body) => Ok(body.into_result()),
            Err(_) => Ok(RecognitionResult::unknown("malformed response")),
        }
    }
}

fn jpeg_part(image: Vec<u8>) -> Result<Part, ClientError> {
    Ok(Part::bytes(image)
        .file_name("capture.jpg")
        .mime_str("image/jpeg")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_backend() -> Backend {
        // Port 9 (discard) refuses connections on loopback.
        Backend::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let b = Backend::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(b.base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn test_register_empty_identity_never_hits_network() {
        let backend = unreachable_backend();
        let identity = Identity::Badge {
            hospital_id: String::new(),
            employee_id: String::new(),
        };
        let err = backend.register(&identity, vec![0xFF, 0xD8]).await;
        assert!(matches!(err, Err(ClientError::InvalidIdentity(_))));
    }

    #[tokio::test]
    async fn test_health_collapses_transport_failure_to_offline() {
        let status = unreachable_backend().health().await;
        assert!(!status.connected);
    }

    #[tokio::test]
    async fn test_recognize_collapses_transport_failure_to_unknown() {
        let result = unreachable_backend().recognize(vec![0xFF, 0xD8]).await;
        assert!(result.is_unknown());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.message, "connection error");
    }
}

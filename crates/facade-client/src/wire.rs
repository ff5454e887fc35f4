//! Wire-format types for the backend's JSON responses.
//!
//! Every field is optional; the mapping functions decide what a missing
//! discriminator means so that call sites never branch on raw JSON.

use crate::types::{BackendStatus, RecognitionResult};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthResponse {
    /// Connected iff the payload carries a recognized status marker.
    pub fn into_status(self) -> BackendStatus {
        let marker = self.status.as_deref().unwrap_or("");
        if matches!(marker, "healthy" | "ok" | "connected") {
            BackendStatus::online(self.message.unwrap_or_else(|| "backend online".into()))
        } else {
            BackendStatus::offline("unexpected health payload")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RegisterResponse {
    /// Success discriminator decides; on failure the server-provided
    /// message is surfaced verbatim.
    pub fn into_outcome(self) -> Result<String, String> {
        if self.success == Some(true) {
            Ok(self.message.unwrap_or_else(|| "registered".into()))
        } else {
            Err(self
                .error
                .or(self.message)
                .unwrap_or_else(|| "registration rejected".into()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecognizeResponse {
    #[serde(default)]
    pub found: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hospital_id: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl RecognizeResponse {
    /// A missing or false `found` discriminator always yields the unknown
    /// sentinel with zero confidence, never a partial result.
    pub fn into_result(self) -> RecognitionResult {
        if self.found != Some(true) {
            return RecognitionResult::unknown("no match");
        }
        RecognitionResult {
            name: self.name,
            hospital_id: self.hospital_id,
            employee_id: self.employee_id,
            confidence: self.confidence.unwrap_or(0.0).clamp(0.0, 100.0),
            message: "match".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_healthy() {
        let h: HealthResponse =
            serde_json::from_str(r#"{"status":"healthy","message":"all good"}"#).unwrap();
        let s = h.into_status();
        assert!(s.connected);
        assert_eq!(s.message, "all good");
    }

    #[test]
    fn test_health_unexpected_payload_is_offline() {
        let h: HealthResponse = serde_json::from_str(r#"{"uptime": 12}"#).unwrap();
        assert!(!h.into_status().connected);
    }

    #[test]
    fn test_register_success() {
        let r: RegisterResponse =
            serde_json::from_str(r#"{"success":true,"message":"stored"}"#).unwrap();
        assert_eq!(r.into_outcome().unwrap(), "stored");
    }

    #[test]
    fn test_register_error_verbatim() {
        let r: RegisterResponse =
            serde_json::from_str(r#"{"success":false,"error":"face not detected"}"#).unwrap();
        assert_eq!(r.into_outcome().unwrap_err(), "face not detected");
    }

    #[test]
    fn test_register_missing_discriminator_is_failure() {
        let r: RegisterResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(r.into_outcome().is_err());
    }

    #[test]
    fn test_recognize_found() {
        let r: RecognizeResponse = serde_json::from_str(
            r#"{"found":true,"hospital_id":"H123","employee_id":"E456","confidence":91.5}"#,
        )
        .unwrap();
        let result = r.into_result();
        assert!(!result.is_unknown());
        assert_eq!(result.label(), "H123 / E456");
        assert!((result.confidence - 91.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_recognize_not_found_is_unknown_zero() {
        // A stale confidence must never leak through a found=false response.
        let r: RecognizeResponse =
            serde_json::from_str(r#"{"found":false,"confidence":88.0}"#).unwrap();
        let result = r.into_result();
        assert!(result.is_unknown());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.message, "no match");
    }

    #[test]
    fn test_recognize_missing_discriminator_is_unknown() {
        let r: RecognizeResponse =
            serde_json::from_str(r#"{"name":"Alice","confidence":99.0}"#).unwrap();
        assert!(r.into_result().is_unknown());
    }

    #[test]
    fn test_recognize_confidence_clamped() {
        let r: RecognizeResponse =
            serde_json::from_str(r#"{"found":true,"name":"Alice","confidence":250.0}"#).unwrap();
        assert_eq!(r.into_result().confidence, 100.0);
    }
}

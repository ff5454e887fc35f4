use serde::{Deserialize, Serialize};

/// Sentinel identity name shown when nothing matched. A sentinel value,
/// not a distinct type: every response yields a `RecognitionResult`.
pub const UNKNOWN: &str = "unknown";

/// Confidence below this displays as unrecognized. Presentational only;
/// the backend's own match threshold is its business.
pub const UNKNOWN_THRESHOLD: f32 = 50.0;

/// The subject a captured face is registered under or matched against,
/// in one of the two deployment variants: plain name, or a hospital /
/// employee badge pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identity {
    Name(String),
    Badge {
        hospital_id: String,
        employee_id: String,
    },
}

impl Identity {
    /// Every field must be non-blank. Checked before any network I/O.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            Identity::Name(name) if name.trim().is_empty() => Err("name must not be empty"),
            Identity::Badge {
                hospital_id,
                employee_id,
            } if hospital_id.trim().is_empty() || employee_id.trim().is_empty() => {
                Err("hospital ID and employee ID must not be empty")
            }
            _ => Ok(()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Identity::Name(name) => name.clone(),
            Identity::Badge {
                hospital_id,
                employee_id,
            } => format!("{hospital_id} / {employee_id}"),
        }
    }
}

/// Backend connectivity as last probed. One per probe, overwritten.
#[derive(Debug, Clone)]
pub struct BackendStatus {
    pub connected: bool,
    pub message: String,
}

impl BackendStatus {
    pub fn online(message: impl Into<String>) -> Self {
        Self {
            connected: true,
            message: message.into(),
        }
    }

    pub fn offline(message: impl Into<String>) -> Self {
        Self {
            connected: false,
            message: message.into(),
        }
    }
}

/// Latest recognition outcome. Overwritten on every response; "no match"
/// and transport errors both land here as the unknown sentinel and are
/// distinguished only by `message`.
#[derive(Debug, Clone)]
pub struct RecognitionResult {
    pub name: Option<String>,
    pub hospital_id: Option<String>,
    pub employee_id: Option<String>,
    /// Match strength, 0–100.
    pub confidence: f32,
    /// Human-readable note: "no match", "connection error", etc.
    pub message: String,
}

impl RecognitionResult {
    /// The unknown sentinel with zero confidence.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            name: Some(UNKNOWN.to_string()),
            hospital_id: None,
            employee_id: None,
            confidence: 0.0,
            message: message.into(),
        }
    }

    /// Display label: name, badge pair, or the sentinel.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            if !name.trim().is_empty() {
                return name.clone();
            }
        }
        match (&self.hospital_id, &self.employee_id) {
            (Some(h), Some(e)) => format!("{h} / {e}"),
            _ => UNKNOWN.to_string(),
        }
    }

    /// True when the result should display as unrecognized: sentinel
    /// identity, no identity at all, or confidence below the threshold.
    pub fn is_unknown(&self) -> bool {
        self.label().eq_ignore_ascii_case(UNKNOWN) || self.confidence < UNKNOWN_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_name_validation() {
        assert!(Identity::Name("Alice".into()).validate().is_ok());
        assert!(Identity::Name("   ".into()).validate().is_err());
    }

    #[test]
    fn test_identity_badge_validation() {
        let full = Identity::Badge {
            hospital_id: "H123".into(),
            employee_id: "E456".into(),
        };
        assert!(full.validate().is_ok());

        let half = Identity::Badge {
            hospital_id: "H123".into(),
            employee_id: "".into(),
        };
        assert!(half.validate().is_err());
    }

    #[test]
    fn test_unknown_sentinel() {
        let r = RecognitionResult::unknown("no match");
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.label(), UNKNOWN);
        assert!(r.is_unknown());
    }

    #[test]
    fn test_low_confidence_displays_unknown() {
        let r = RecognitionResult {
            name: Some("Alice".into()),
            hospital_id: None,
            employee_id: None,
            confidence: 49.9,
            message: String::new(),
        };
        assert!(r.is_unknown());
    }

    #[test]
    fn test_confident_match_is_not_unknown() {
        let r = RecognitionResult {
            name: None,
            hospital_id: Some("H123".into()),
            employee_id: Some("E456".into()),
            confidence: 87.0,
            message: "match".into(),
        };
        assert!(!r.is_unknown());
        assert_eq!(r.label(), "H123 / E456");
    }
}

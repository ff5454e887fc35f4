//! Observable kiosk state — everything the view renders, plus the state
//! transitions that enforce the camera/recognition ordering invariants.

use facade_client::{BackendStatus, Identity, RecognitionResult};
use std::time::{Duration, Instant};

/// How long a successful registration notice stays on screen.
pub const REGISTER_NOTICE_TTL: Duration = Duration::from_secs(5);

/// Severity of the transient registration notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    None,
    Info,
    Success,
    Error,
}

/// Transient registration feedback. Success notices expire
/// [`REGISTER_NOTICE_TTL`] after being set; the rest stay until
/// overwritten.
#[derive(Debug, Clone)]
pub struct RegisterStatus {
    pub kind: NoticeKind,
    pub message: String,
    expires_at: Option<Instant>,
}

impl RegisterStatus {
    pub fn none() -> Self {
        Self {
            kind: NoticeKind::None,
            message: String::new(),
            expires_at: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
            expires_at: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            expires_at: None,
        }
    }

    pub fn success(message: impl Into<String>, now: Instant) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            expires_at: Some(now + REGISTER_NOTICE_TTL),
        }
    }

    /// Clear an expired notice. Called once per rendered frame.
    pub fn tick(&mut self, now: Instant) {
        if let Some(expires_at) = self.expires_at {
            if now >= expires_at {
                *self = Self::none();
            }
        }
    }

    /// Pending expiry, if any — used to schedule a repaint.
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }
}

/// Confidence presentation band. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Strong,
    Moderate,
    Weak,
}

pub fn confidence_band(confidence: f32) -> Band {
    if confidence >= 70.0 {
        Band::Strong
    } else if confidence >= 50.0 {
        Band::Moderate
    } else {
        Band::Weak
    }
}

/// All observable UI state.
pub struct KioskState {
    pub camera_on: bool,
    pub recognizing: bool,
    pub backend: BackendStatus,
    pub register: RegisterStatus,
    pub result: RecognitionResult,
    /// Device-acquisition failures, shown until the next camera action.
    pub camera_notice: Option<String>,
    // Registration form fields.
    pub name: String,
    pub hospital_id: String,
    pub employee_id: String,
    /// Which identity variant the form submits.
    pub use_badge: bool,
}

impl KioskState {
    pub fn new() -> Self {
        Self {
            camera_on: false,
            recognizing: false,
            backend: BackendStatus::offline("not checked yet"),
            register: RegisterStatus::none(),
            result: RecognitionResult::unknown("idle"),
            camera_notice: None,
            name: String::new(),
            hospital_id: String::new(),
            employee_id: String::new(),
            use_badge: true,
        }
    }

    /// Transition to camera ON. Returns false (no-op) if already ON, so
    /// a second start never acquires a duplicate device handle.
    pub fn camera_started(&mut self) -> bool {
        if self.camera_on {
            return false;
        }
        self.camera_on = true;
        true
    }

    /// Transition to camera OFF. Recognition is forced Idle first:
    /// it can never be active while the camera is OFF.
    pub fn camera_stopped(&mut self) {
        self.recognizing = false;
        self.camera_on = false;
    }

    /// Transition to Running. Guarded by the camera being ON and by not
    /// already running.
    pub fn recognition_started(&mut self) -> bool {
        if !self.camera_on || self.recognizing {
            return false;
        }
        self.recognizing = true;
        true
    }

    pub fn recognition_stopped(&mut self) {
        self.recognizing = false;
    }

    /// The identity the form currently describes.
    pub fn identity(&self) -> Identity {
        if self.use_badge {
            Identity::Badge {
                hospital_id: self.hospital_id.trim().to_string(),
                employee_id: self.employee_id.trim().to_string(),
            }
        } else {
            Identity::Name(self.name.trim().to_string())
        }
    }

    /// Clear the form after a successful registration.
    pub fn clear_identity_fields(&mut self) {
        self.name.clear();
        self.hospital_id.clear();
        self.employee_id.clear();
    }
}

//! facade-client — HTTP client for the external recognition service.
//!
//! The backend owns detection, matching and persistence; this crate only
//! issues the three REST calls (health, register, recognize) and maps
//! their JSON responses onto the kiosk's domain types.

pub mod backend;
pub mod types;
pub mod wire;

pub use backend::{Backend, ClientError};
pub use types::{BackendStatus, Identity, RecognitionResult, UNKNOWN, UNKNOWN_THRESHOLD};

//! facade-hw — Hardware abstraction for camera capture.
//!
//! Provides V4L2-based camera access, pixel-format conversion to RGB,
//! and the still-image capture policies used for backend submission.

pub mod camera;
pub mod capture;
pub mod frame;

pub use camera::{Camera, CameraError, PixelFormat};
pub use capture::{to_jpeg, CaptureError, CapturePolicy};
pub use frame::Frame;

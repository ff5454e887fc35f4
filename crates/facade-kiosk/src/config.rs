use facade_hw::CapturePolicy;
use std::time::Duration;

/// Kiosk configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the recognition backend.
    pub backend_url: String,
    /// V4L2 device path (default: /dev/video0).
    pub camera_device: String,
    /// Recognition poll period while the loop is running.
    pub recognize_interval: Duration,
    /// JPEG quality for submitted captures.
    pub jpeg_quality: u8,
    /// Full-frame or center-crop submission.
    pub capture_policy: CapturePolicy,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from `FACADE_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let capture_policy = match std::env::var("FACADE_CAPTURE_POLICY").as_deref() {
            Ok("full") => CapturePolicy::Full,
            _ => CapturePolicy::CenterCrop(env_u32("FACADE_CROP_SIZE", 300)),
        };

        Self {
            backend_url: std::env::var("FACADE_BACKEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            camera_device: std::env::var("FACADE_CAMERA_DEVICE")
                .unwrap_or_else(|_| "/dev/video0".to_string()),
            recognize_interval: Duration::from_millis(env_u64(
                "FACADE_RECOGNIZE_INTERVAL_MS",
                1500,
            )),
            jpeg_quality: env_u8("FACADE_JPEG_QUALITY", 92),
            capture_policy,
            request_timeout: Duration::from_secs(env_u64("FACADE_REQUEST_TIMEOUT_SECS", 10)),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u8(key: &str, default: u8) -> u8 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

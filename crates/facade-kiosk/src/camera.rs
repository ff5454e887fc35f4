//! Camera worker thread — owns the device handle and publishes the most
//! recent frame for the preview and the frame capturer.

use facade_hw::{Camera, CameraError, Frame};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Shared slot holding the latest decoded frame.
pub type FrameSlot = Arc<Mutex<Option<Frame>>>;

/// Owns the open device for its lifetime; stopping (or dropping) the
/// worker joins the thread and releases the device handle.
pub struct CameraWorker {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
    latest: FrameSlot,
}

impl CameraWorker {
    /// Open the device and start streaming. Fails fast if the device
    /// cannot be acquired, leaving camera state OFF.
    pub fn start(device_path: &str) -> Result<Self, CameraError> {
        let camera = Camera::open(device_path)?;
        let stop = Arc::new(AtomicBool::new(false));
        let latest: FrameSlot = Arc::new(Mutex::new(None));

        let thread_stop = stop.clone();
        let thread_latest = latest.clone();
        let path = device_path.to_string();
        let join = std::thread::Builder::new()
            .name("facade-camera".into())
            .spawn(move || {
                let result = camera.capture_loop(&thread_stop, |frame| {
                    if let Ok(mut slot) = thread_latest.lock() {
                        *slot = Some(frame);
                    }
                });
                if let Err(e) = result {
                    tracing::error!(device = %path, error = %e, "camera stream ended");
                }
                // `camera` drops here, releasing the device.
            })
            .map_err(|e| CameraError::CaptureFailed(format!("failed to spawn camera thread: {e}")))?;

        Ok(Self {
            stop,
            join: Some(join),
            latest,
        })
    }

    /// Copy of the most recent frame, if one has arrived yet.
    pub fn latest_frame(&self) -> Option<Frame> {
        self.latest.lock().ok().and_then(|slot| slot.clone())
    }

    /// Handle to the frame slot, for borrowing by the recognition loop.
    pub fn frame_slot(&self) -> FrameSlot {
        self.latest.clone()
    }

    /// Signal the thread and wait for it; the device is released on return.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for CameraWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

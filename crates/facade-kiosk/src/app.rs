//! Kiosk application — owns the camera worker, the recognition loop and
//! the network tasks, and applies their results to the UI state.
//!
//! Network tasks run on a tokio runtime and post results back to the UI
//! thread over a channel; every task resolves to an event on both the
//! success and failure branch, so the UI can never be left hanging.

use crate::camera::CameraWorker;
use crate::config::Config;
use crate::poll::RecognitionTask;
use crate::state::{KioskState, RegisterStatus};
use crate::ui;
use eframe::egui;
use facade_client::{Backend, BackendStatus, RecognitionResult};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

/// Results posted back to the UI thread by async tasks.
pub enum KioskEvent {
    Health(BackendStatus),
    RegisterDone(Result<String, String>),
    Recognized(RecognitionResult),
}

pub struct KioskApp {
    pub(crate) state: KioskState,
    pub(crate) config: Config,
    runtime: tokio::runtime::Runtime,
    backend: Arc<Backend>,
    pub(crate) camera: Option<CameraWorker>,
    pub(crate) recognition: Option<RecognitionTask>,
    events_tx: Sender<KioskEvent>,
    events_rx: Receiver<KioskEvent>,
    pub(crate) preview: Option<egui::TextureHandle>,
}

impl KioskApp {
    pub fn new(config: Config, runtime: tokio::runtime::Runtime) -> anyhow::Result<Self> {
        let backend = Arc::new(Backend::new(&config.backend_url, config.request_timeout)?);
        let (events_tx, events_rx) = mpsc::channel();
        Ok(Self {
            state: KioskState::new(),
            config,
            runtime,
            backend,
            camera: None,
            recognition: None,
            events_tx,
            events_rx,
            preview: None,
        })
    }

    /// Probe backend connectivity in the background.
    pub fn refresh_health(&self, ctx: Option<egui::Context>) {
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let status = backend.health().await;
            let _ = tx.send(KioskEvent::Health(status));
            if let Some(ctx) = ctx {
                ctx.request_repaint();
            }
        });
    }

    /// Acquire the camera. A no-op while already ON — one device handle,
    /// ever. Acquisition failure surfaces as a notice, never a panic.
    pub(crate) fn start_camera(&mut self) {
        if self.camera.is_some() {
            return;
        }
        match CameraWorker::start(&self.config.camera_device) {
            Ok(worker) => {
                self.camera = Some(worker);
                self.state.camera_started();
                self.state.camera_notice = None;
            }
            Err(e) => {
                tracing::warn!(device = %self.config.camera_device, error = %e, "camera start failed");
                self.state.camera_notice = Some(format!("camera unavailable: {e}"));
            }
        }
    }

    /// Release the camera. Recognition is always stopped first, then the
    /// worker is joined, which releases the device handle.
    pub(crate) fn stop_camera(&mut self) {
        self.stop_recognition();
        if let Some(worker) = self.camera.take() {
            worker.stop();
        }
        self.state.camera_stopped();
        self.preview = None;
    }

    /// Start the recognition loop: one pass immediately, then every
    /// configured interval. Guarded by the camera being ON.
    pub(crate) fn start_recognition(&mut self, ctx: &egui::Context) {
        if !self.state.recognition_started() {
            return;
        }
        let Some(worker) = &self.camera else {
            self.state.recognition_stopped();
            return;
        };

        let slot = worker.frame_slot();
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        let policy = self.config.capture_policy;
        let quality = self.config.jpeg_quality;

        let task = RecognitionTask::spawn(
            self.runtime.handle(),
            self.config.recognize_interval,
            move || {
                let backend = backend.clone();
                let tx = tx.clone();
                let ctx = ctx.clone();
                let frame = slot.lock().ok().and_then(|s| s.clone());
                async move {
                    // No live frame yet: nothing captured, skip this pass.
                    let Some(frame) = frame else { return };
                    let blob = match facade_hw::to_jpeg(&frame, policy, quality) {
                        Ok(blob) => blob,
                        Err(e) => {
                            tracing::warn!(error = %e, "capture failed");
                            return;
                        }
                    };
                    let result = backend.recognize(blob).await;
                    let _ = tx.send(KioskEvent::Recognized(result));
                    ctx.request_repaint();
                }
            },
        );
        self.recognition = Some(task);
    }

    pub(crate) fn stop_recognition(&mut self) {
        if let Some(task) = self.recognition.take() {
            task.stop();
        }
        self.state.recognition_stopped();
    }

    /// Submit the registration form with the current capture.
    ///
    /// Empty identity fields fail immediately with a validation notice
    /// and no network call; a missing live frame aborts with a notice.
    pub(crate) fn do_register(&mut self, ctx: &egui::Context) {
        let identity = self.state.identity();
        if let Err(msg) = identity.validate() {
            self.state.register = RegisterStatus::error(msg);
            return;
        }
        let Some(blob) = self.capture_blob() else {
            self.state.register = RegisterStatus::error("no live frame to capture");
            return;
        };

        self.state.register = RegisterStatus::info("registering…");
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            // Defensive probe: fail fast with a clear message when the
            // backend is gone, instead of a multipart transport error.
            let outcome = if !backend.health().await.connected {
                Err("backend offline".to_string())
            } else {
                backend
                    .register(&identity, blob)
                    .await
                    .map_err(|e| e.to_string())
            };
            let _ = tx.send(KioskEvent::RegisterDone(outcome));
            ctx.request_repaint();
        });
    }

    fn capture_blob(&self) -> Option<Vec<u8>> {
        let frame = self.camera.as_ref()?.latest_frame()?;
        facade_hw::to_jpeg(&frame, self.config.capture_policy, self.config.jpeg_quality).ok()
    }

    /// Apply pending task results and expire stale notices.
    pub(crate) fn drain_events(&mut self, now: Instant) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                KioskEvent::Health(status) => self.state.backend = status,
                KioskEvent::RegisterDone(Ok(message)) => {
                    self.state.clear_identity_fields();
                    self.state.register = RegisterStatus::success(message, now);
                }
                KioskEvent::RegisterDone(Err(message)) => {
                    self.state.register = RegisterStatus::error(message);
                }
                KioskEvent::Recognized(result) => self.state.result = result,
            }
        }
        self.state.register.tick(now);
    }

    #[cfg(test)]
    fn send_event(&self, event: KioskEvent) {
        let _ = self.events_tx.send(event);
    }

    #[cfg(test)]
    fn runtime_handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }
}

impl Drop for KioskApp {
    // Teardown: no timer survives, the device handle is released.
    fn drop(&mut self) {
        self.stop_recognition();
        if let Some(worker) = self.camera.take() {
            worker.stop();
        }
    }
}

impl eframe::App for KioskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.drain_events(now);

        // Wake up exactly when the success notice should disappear.
        if let Some(expires_at) = self.state.register.expires_at() {
            ctx.request_repaint_after(expires_at.saturating_duration_since(now));
        }

        ui::draw(self, ctx);
    }
}

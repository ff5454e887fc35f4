use eframe::egui;
use tracing_subscriber::EnvFilter;

mod app;
mod camera;
mod config;
mod poll;
mod state;
mod ui;

use app::KioskApp;
use config::Config;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    tracing::info!(
        backend = %config.backend_url,
        device = %config.camera_device,
        "facade kiosk starting"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Facade Kiosk",
        native_options,
        Box::new(move |cc| {
            let app = match KioskApp::new(config, runtime) {
                Ok(app) => app,
                Err(e) => return Err(e.into()),
            };
            // Startup connectivity probe.
            app.refresh_health(Some(cc.egui_ctx.clone()));
            Ok(Box::new(app))
        }),
    )
}

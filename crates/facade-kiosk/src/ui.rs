//! The view — a pure rendering of [`KioskState`] plus the controls that
//! drive the app. No state of its own beyond the preview texture.

use crate::app::KioskApp;
use crate::state::{confidence_band, Band, NoticeKind};
use eframe::egui::{self, Color32, RichText};
use std::time::Duration;

const STRONG: Color32 = Color32::from_rgb(0x2e, 0xcc, 0x71);
const MODERATE: Color32 = Color32::from_rgb(0xf1, 0xc4, 0x0f);
const WEAK: Color32 = Color32::GRAY;
const ERROR: Color32 = Color32::from_rgb(0xe7, 0x4c, 0x3c);

pub fn draw(app: &mut KioskApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let (dot, color) = if app.state.backend.connected {
                ("●", STRONG)
            } else {
                ("●", ERROR)
            };
            ui.label(RichText::new(dot).color(color));
            ui.label(&app.state.backend.message);
            if ui.button("Check backend").clicked() {
                app.refresh_health(Some(ctx.clone()));
            }
            ui.separator();
            if let Some(notice) = &app.state.camera_notice {
                ui.label(RichText::new(notice).color(ERROR));
            }
        });
    });

    egui::SidePanel::right("controls")
        .min_width(280.0)
        .show(ctx, |ui| {
            draw_controls(app, ui, ctx);
            ui.separator();
            draw_register_form(app, ui, ctx);
            ui.separator();
            draw_result(app, ui);
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        draw_preview(app, ui, ctx);
    });
}

fn draw_controls(app: &mut KioskApp, ui: &mut egui::Ui, ctx: &egui::Context) {
    ui.heading("Camera");
    ui.horizontal(|ui| {
        if app.state.camera_on {
            if ui.button("Stop camera").clicked() {
                app.stop_camera();
            }
        } else if ui.button("Start camera").clicked() {
            app.start_camera();
        }
    });

    ui.add_space(8.0);
    ui.heading("Recognition");
    ui.horizontal(|ui| {
        if app.state.recognizing {
            if ui.button("Stop recognition").clicked() {
                app.stop_recognition();
            }
        } else {
            let start = egui::Button::new("Start recognition");
            if ui.add_enabled(app.state.camera_on, start).clicked() {
                app.start_recognition(ctx);
            }
        }
    });
}

fn draw_register_form(app: &mut KioskApp, ui: &mut egui::Ui, ctx: &egui::Context) {
    ui.heading("Register");
    ui.horizontal(|ui| {
        ui.selectable_value(&mut app.state.use_badge, true, "Badge");
        ui.selectable_value(&mut app.state.use_badge, false, "Name");
    });

    if app.state.use_badge {
        ui.horizontal(|ui| {
            ui.label("Hospital ID:");
            ui.text_edit_singleline(&mut app.state.hospital_id);
        });
        ui.horizontal(|ui| {
            ui.label("Employee ID:");
            ui.text_edit_singleline(&mut app.state.employee_id);
        });
    } else {
        ui.horizontal(|ui| {
            ui.label("Name:");
            ui.text_edit_singleline(&mut app.state.name);
        });
    }

    let register = egui::Button::new("Register face");
    if ui.add_enabled(app.state.camera_on, register).clicked() {
        app.do_register(ctx);
    }

    match app.state.register.kind {
        NoticeKind::None => {}
        NoticeKind::Info => {
            ui.label(&app.state.register.message);
        }
        NoticeKind::Success => {
            ui.label(RichText::new(&app.state.register.message).color(STRONG));
        }
        NoticeKind::Error => {
            ui.label(RichText::new(&app.state.register.message).color(ERROR));
        }
    }
}

fn draw_result(app: &KioskApp, ui: &mut egui::Ui) {
    ui.heading("Last match");
    let result = &app.state.result;
    if result.is_unknown() {
        ui.label(RichText::new("Unknown").size(22.0).color(WEAK));
        if !result.message.is_empty() {
            ui.label(RichText::new(&result.message).color(WEAK));
        }
        return;
    }

    let color = match confidence_band(result.confidence) {
        Band::Strong => STRONG,
        Band::Moderate => MODERATE,
        Band::Weak => WEAK,
    };
    ui.label(RichText::new(result.label()).size(22.0).color(color));
    ui.add(
        egui::ProgressBar::new(result.confidence / 100.0)
            .fill(color)
            .text(format!("{:.0}%", result.confidence)),
    );
}

fn draw_preview(app: &mut KioskApp, ui: &mut egui::Ui, ctx: &egui::Context) {
    if !app.state.camera_on {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("Camera off").color(WEAK));
        });
        return;
    }

    if let Some(frame) = app.camera.as_ref().and_then(|c| c.latest_frame()) {
        let image = egui::ColorImage::from_rgb(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        match &mut app.preview {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                app.preview =
                    Some(ctx.load_texture("preview", image, egui::TextureOptions::LINEAR));
            }
        }
        // ~30 fps preview refresh while the camera is live.
        ctx.request_repaint_after(Duration::from_millis(33));
    }

    if let Some(texture) = &app.preview {
        let size = texture.size_vec2();
        let scale = (ui.available_width() / size.x).min(ui.available_height() / size.y);
        // Mirror-like preview via flipped UVs; the capture policy decides
        // the orientation of what is actually submitted.
        ui.centered_and_justified(|ui| {
            ui.add(
                egui::Image::new((texture.id(), size * scale)).uv(egui::Rect::from_min_max(
                    egui::pos2(1.0, 0.0),
                    egui::pos2(0.0, 1.0),
                )),
            );
        });
    } else {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("Waiting for first frame…").color(WEAK));
        });
    }
}

use crate::app::DashApp;
use eframe::egui::{self, Color32, RichText};

/// Error banner above the charts; dismissable unless the load itself failed
pub fn render_banner(app: &mut DashApp, ui: &mut egui::Ui) {
    let Some(banner) = &app.state.ui.banner else {
        return;
    };
    let dismissable = app.state.ui.is_ready();

    let mut dismiss = false;
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .stroke(egui::Stroke::new(1.0, Color32::from_rgb(220, 80, 80)))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("⚠").color(Color32::from_rgb(220, 80, 80)).size(18.0));
                ui.vertical(|ui| {
                    ui.strong(&banner.title);
                    ui.label(&banner.message);
                });
                if dismissable {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                        if ui.small_button("✖").on_hover_text("Dismiss").clicked() {
                            dismiss = true;
                        }
                    });
                }
            });
        });
    ui.add_space(6.0);

    if dismiss {
        app.state.ui.clear_error();
    }
}

/// Load status, active chart and the last notice
pub fn render_status_bar(app: &mut DashApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label(app.state.ui.status_text());
        if let Some(config) = app.controller.active_config() {
            ui.separator();
            ui.label(format!("📊 {}", config.title));
        }
        if let Some(view) = app.controller.active_view() {
            let k = view.zoom().transform().k;
            if k > 1.0 {
                ui.separator();
                ui.label(format!("Zoom: {:.1}×", k));
            }
        }
        if let Some(notice) = &app.state.ui.notice {
            ui.separator();
            ui.weak(notice);
        }
    });
}

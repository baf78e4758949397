use crate::app::DashApp;
use crate::widgets::FilterControls;
use eframe::egui;
use std::time::Instant;

/// Filters declared by the active chart
pub fn render_filter_panel(app: &mut DashApp, ui: &mut egui::Ui) {
    profiling::scope!("render_filter_panel");

    ui.heading("Filters");
    ui.separator();

    let mut actions = Vec::new();
    egui::ScrollArea::vertical()
        .id_salt("filter_panel")
        .show(ui, |ui| {
            let widgets = app.controller.registry().widgets();
            if widgets.is_empty() {
                ui.weak("No filters for this chart");
            }
            for widget in widgets {
                if let Some(action) = FilterControls::new(widget).show(ui) {
                    actions.push((widget.id().to_string(), action));
                }
                ui.add_space(8.0);
            }
        });

    let now = Instant::now();
    for (filter_id, action) in actions {
        app.apply_filter(&filter_id, action, now);
    }
}

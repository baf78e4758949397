use crate::app::DashApp;
use eframe::egui;

/// One button per chart plus the panel toggles
pub fn render_nav_bar(app: &mut DashApp, ui: &mut egui::Ui) {
    let mut target = None;

    ui.horizontal_wrapped(|ui| {
        let config = app.controller.config();
        ui.strong(&config.title);
        ui.separator();

        for chart in &config.charts {
            let mut response = ui.selectable_label(app.controller.is_active(&chart.id), &chart.title);
            if let Some(n) = config.shortcuts.iter().position(|s| *s == chart.id) {
                response = response.on_hover_text(format!("Shortcut: {}", n + 1));
            }
            if response.clicked() {
                target = Some(chart.id.clone());
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("❓").on_hover_text("Keyboard shortcuts (H)").clicked() {
                app.state.view.toggle_help();
            }
            let theme = if app.state.view.dark_mode { "☀" } else { "🌙" };
            if ui.button(theme).on_hover_text("Toggle theme (T)").clicked() {
                app.state.view.toggle_dark_mode();
            }
            ui.toggle_value(&mut app.state.view.show_data_table, "📋 Data")
                .on_hover_text("Aggregated rows (D)");
            ui.toggle_value(&mut app.state.view.show_filters, "🔍 Filters");
        });
    });

    if let Some(chart_id) = target {
        app.switch_chart(&chart_id);
    }
}

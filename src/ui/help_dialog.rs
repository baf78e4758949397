use crate::app::DashApp;

pub fn render_help_dialog(app: &mut DashApp, ctx: &eframe::egui::Context) {
    if app.state.view.show_help {
        let shortcuts: Vec<String> = app
            .controller
            .config()
            .shortcuts
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let title = app.controller.config().chart(id).map_or(id.as_str(), |c| c.title.as_str());
                format!("{} - {}", i + 1, title)
            })
            .collect();

        eframe::egui::Window::new("⌨ Keyboard Shortcuts")
            .anchor(eframe::egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .show(ctx, |ui| {
                ui.heading("Navigation");
                for line in &shortcuts {
                    ui.label(line);
                }
                ui.label("R - Reset view");
                ui.label("T - Toggle dark/light theme");
                ui.label("D - Toggle data table");
                ui.label("H / F1 - Toggle help");
                ui.label("ESC - Close help");

                ui.separator();
                ui.heading("Mouse Controls");
                ui.label("Scroll - Zoom in/out");
                ui.label("Drag - Pan view");
                ui.label("Hover - Show values");

                ui.separator();
                if ui.button("Close").clicked() {
                    app.state.view.show_help = false;
                }
            });
    }
}

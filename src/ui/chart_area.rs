use crate::app::DashApp;
use crate::constants::zoom::WHEEL_SENSITIVITY;
use crate::scene::paint::paint_scene;
use eframe::egui::{self, pos2, vec2, Rect, Sense};
use std::time::Instant;

/// Active chart: title row, canvas, tooltips, pan/zoom and the reset control
pub fn render_chart_area(app: &mut DashApp, ui: &mut egui::Ui) {
    profiling::scope!("render_chart_area");
    let now = Instant::now();

    let Some(title) = app.controller.active_config().map(|c| c.title.clone()) else {
        ui.centered_and_justified(|ui| {
            ui.label(app.state.ui.status_text());
        });
        return;
    };

    let mut export = false;
    ui.horizontal(|ui| {
        ui.heading(&title);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("💾 SVG").on_hover_text("Export chart as SVG").clicked() {
                export = true;
            }
        });
    });
    ui.separator();

    app.controller.on_resize(ui.available_size(), now);

    let Some(view) = app.controller.active_view() else {
        return;
    };
    let frame = view.frame();
    let (Some(canvas), Some(plot)) = (frame.canvas(), frame.plot_size()) else {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
        return;
    };

    let (response, painter) = ui.allocate_painter(canvas, Sense::click_and_drag());
    let plot_rect = Rect::from_min_size(
        response.rect.min + vec2(frame.margins.left, frame.margins.top),
        plot,
    );

    let t = view.zoom().transform();
    let axes = view.axes(&t);
    paint_scene(&painter, plot_rect, view.scene(), &t, &axes, ui.visuals().text_color());

    let interactive = view.interactive();
    let show_reset = view.zoom().show_reset();
    let pointer = response.hover_pos().filter(|p| interactive && plot_rect.contains(*p));
    let hovered = match pointer {
        Some(p) => view.scene().hit_test((p - plot_rect.min).to_pos2(), &t),
        None => Vec::new(),
    };

    if !hovered.is_empty() {
        response.clone().on_hover_ui_at_pointer(|ui| {
            for (i, text) in hovered.iter().enumerate() {
                if i > 0 {
                    ui.separator();
                }
                ui.label(text);
            }
        });
    }

    if interactive {
        if response.dragged() {
            app.controller.pan(response.drag_delta());
        }
        if let Some(p) = pointer {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                let anchor = (p - plot_rect.min).to_pos2();
                app.controller.zoom_at(anchor, (scroll * WHEEL_SENSITIVITY).exp());
            }
        }
    }

    if show_reset {
        let button_rect = Rect::from_min_size(
            pos2(plot_rect.right() - 96.0, plot_rect.top() + 6.0),
            vec2(90.0, 22.0),
        );
        if ui
            .put(button_rect, egui::Button::new("⟲ Reset view"))
            .on_hover_text("Reset zoom (R)")
            .clicked()
        {
            app.controller.reset_zoom(now);
        }
    }

    if export {
        app.export_svg();
    }
}

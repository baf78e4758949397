//! Dashboard application: owns the controller, the loader worker and window state

use chrono::Local;
use egui::{pos2, Pos2, Rect};
use egui_extras::{Size, StripBuilder};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::charts::GeoStatus;
use crate::config::{ChartKind, DashboardConfig};
use crate::constants::config::GEO_URL;
use crate::constants::layout::{DATA_PANEL_WIDTH, FILTER_PANEL_WIDTH};
use crate::controller::ChartController;
use crate::data::GeoSource;
use crate::error::{DashError, Result};
use crate::perf::{BackgroundWorker, WorkerRequest, WorkerResult};
use crate::scene::svg;
use crate::state::{AppState, LoadStatus};
use crate::ui;
use crate::widgets::FilterAction;

/// Poll interval for the loader while nothing else needs a frame
const LOAD_POLL: Duration = Duration::from_millis(50);

pub struct DashApp {
    pub state: AppState,
    pub controller: ChartController,
    worker: BackgroundWorker,
    /// Worker requests still awaiting a result
    pending: usize,
}

impl DashApp {
    /// Start loading every source, and the boundary file when a map is configured
    pub fn new(config: DashboardConfig, data_dir: PathBuf, geo: Option<GeoSource>) -> Self {
        let worker = BackgroundWorker::spawn();
        worker.request(WorkerRequest::LoadData {
            sources: config.sources.clone(),
            base_dir: data_dir,
        });
        let mut pending = 1;

        let has_map = config
            .charts
            .iter()
            .any(|c| matches!(c.kind, ChartKind::Choropleth { .. }));
        if has_map {
            let source = geo.unwrap_or_else(|| GeoSource::parse(config.geo.as_deref().unwrap_or(GEO_URL)));
            worker.request(WorkerRequest::LoadGeo { source });
            pending += 1;
        }

        Self {
            state: AppState::new(),
            controller: ChartController::new(config),
            worker,
            pending,
        }
    }

    fn poll_worker(&mut self) {
        while let Some(result) = self.worker.poll() {
            self.pending = self.pending.saturating_sub(1);
            match result {
                WorkerResult::DataLoaded { store, ready } => {
                    self.state.ui.on_data_ready(&ready, Local::now());
                    let result = self.controller.on_data_ready(store, ready);
                    self.report(result);
                }
                WorkerResult::DataFailed(e) => {
                    tracing::error!(error = %e, "data load failed");
                    self.state.ui.on_load_failed(&e);
                }
                WorkerResult::GeoLoaded(geo) => {
                    tracing::info!(features = geo.features.len(), "boundaries ready");
                    let result = self.controller.on_geo(GeoStatus::Ready(geo));
                    self.report(result);
                }
                WorkerResult::GeoFailed(e) => {
                    let result = self.controller.on_geo(GeoStatus::Failed(e.user_message()));
                    self.report(result);
                }
            }
        }
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::error!(error = %e, "chart update failed");
            self.state.ui.set_error(&e);
        }
    }

    pub fn switch_chart(&mut self, chart_id: &str) {
        let result = self.controller.switch_to(chart_id);
        self.report(result);
    }

    pub fn apply_filter(&mut self, filter_id: &str, action: FilterAction, now: Instant) {
        match action {
            FilterAction::Toggle(item) => self.controller.toggle_item(filter_id, &item, now),
            FilterAction::SelectAll(all) => self.controller.set_select_all(filter_id, all, now),
            FilterAction::Single(value) => self.controller.select_single(filter_id, &value, now),
        }
    }

    /// Ask for a destination and write the active chart as SVG
    pub fn export_svg(&mut self) {
        let Some(chart_id) = self.controller.active_id().map(str::to_string) else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG image", &["svg"])
            .set_file_name(format!("{}.svg", chart_id))
            .save_file()
        else {
            return;
        };

        match self.write_svg(&path) {
            Ok(()) => self.state.ui.set_notice(format!("Exported {}", path.display())),
            Err(e) => self.state.ui.set_error(&e),
        }
    }

    fn write_svg(&self, path: &Path) -> Result<()> {
        let view = self
            .controller
            .active_view()
            .ok_or_else(|| DashError::Custom("No chart is active".into()))?;
        let frame = view.frame();
        let (Some(canvas), Some(plot)) = (frame.canvas(), frame.plot_size()) else {
            return Err(DashError::Custom("Chart has not been laid out yet".into()));
        };
        let t = view.zoom().transform();
        let plot_rect = Rect::from_min_size(pos2(frame.margins.left, frame.margins.top), plot);
        svg::export(
            path,
            view.scene(),
            &view.axes(&t),
            Rect::from_min_size(Pos2::ZERO, canvas),
            plot_rect,
            &t,
        )
    }

    /// Put the active chart's rows on the clipboard as tab-separated text
    pub fn copy_table(&mut self) {
        let Some(view) = self.controller.active_view() else {
            return;
        };
        let header = self
            .controller
            .active_config()
            .map(|c| c.metric_label.as_str())
            .unwrap_or("Value");
        let rows = &view.scene().table;
        let text = ui::table_tsv(header, rows);
        let count = rows.len();

        match copy_to_clipboard(text) {
            Ok(()) => self.state.ui.set_notice(format!("Copied {} rows", count)),
            Err(e) => self.state.ui.set_error(&e),
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        const DIGITS: [egui::Key; 9] = [
            egui::Key::Num1,
            egui::Key::Num2,
            egui::Key::Num3,
            egui::Key::Num4,
            egui::Key::Num5,
            egui::Key::Num6,
            egui::Key::Num7,
            egui::Key::Num8,
            egui::Key::Num9,
        ];

        let mut reset = false;
        let mut shortcut = None;
        ctx.input(|i| {
            if i.key_pressed(egui::Key::R) {
                reset = true;
            }
            if i.key_pressed(egui::Key::T) {
                self.state.view.toggle_dark_mode();
            }
            if i.key_pressed(egui::Key::D) {
                self.state.view.toggle_data_table();
            }
            if i.key_pressed(egui::Key::H) || i.key_pressed(egui::Key::F1) {
                self.state.view.toggle_help();
            }
            if i.key_pressed(egui::Key::Escape) {
                self.state.view.show_help = false;
            }
            shortcut = DIGITS.iter().position(|k| i.key_pressed(*k));
        });

        if reset {
            self.controller.reset_zoom(Instant::now());
        }
        let target = shortcut.and_then(|n| self.controller.config().shortcuts.get(n).cloned());
        if let Some(chart_id) = target {
            self.switch_chart(&chart_id);
        }
    }
}

fn copy_to_clipboard(text: String) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| DashError::Custom(format!("Clipboard unavailable: {}", e)))?;
    clipboard
        .set_text(text)
        .map_err(|e| DashError::Custom(format!("Clipboard copy failed: {}", e)))
}

impl eframe::App for DashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        profiling::finish_frame!();

        // Set theme
        if self.state.view.dark_mode {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }
        self.controller.set_ink(ctx.style().visuals.text_color());

        self.poll_worker();
        self.handle_keys(ctx);

        let result = self.controller.pump(Instant::now());
        self.report(result);

        egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
            ui::render_nav_bar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui::render_status_bar(self, ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui::render_banner(self, ui);

            // A failed load leaves only the banner
            if self.state.ui.status == LoadStatus::Failed {
                return;
            }

            let mut horizontal_strip = StripBuilder::new(ui);
            if self.state.view.show_filters {
                horizontal_strip = horizontal_strip.size(Size::exact(FILTER_PANEL_WIDTH));
            }
            horizontal_strip = horizontal_strip.size(Size::remainder());
            if self.state.view.show_data_table {
                horizontal_strip = horizontal_strip.size(Size::exact(DATA_PANEL_WIDTH));
            }

            horizontal_strip.horizontal(|mut strip| {
                if self.state.view.show_filters {
                    strip.cell(|ui| {
                        ui::render_filter_panel(self, ui);
                    });
                }

                strip.cell(|ui| {
                    ui::render_chart_area(self, ui);
                });

                if self.state.view.show_data_table {
                    strip.cell(|ui| {
                        ui::render_data_table_panel(self, ui);
                    });
                }
            });
        });

        ui::render_help_dialog(self, ctx);

        match self.controller.next_wakeup() {
            Some(deadline) => {
                ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
            }
            None if self.pending > 0 => {
                ctx.request_repaint_after(LOAD_POLL);
            }
            None => {}
        }
    }
}

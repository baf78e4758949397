//! Active-chart state and redraw dispatch
//!
//! The controller owns the store, the filter registry and one view per
//! configured chart. Filter changes and resizes only schedule work; the
//! frame loop calls [`ChartController::pump`] to run whatever is due.

use egui::{Color32, Pos2, Vec2};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crate::charts::{build_view, ChartContext, ChartView, Geometry, GeoStatus};
use crate::config::{ChartConfig, ChartKind, DashboardConfig};
use crate::data::{DataReady, DataStore};
use crate::error::{DashError, Result};
use crate::perf::{RedrawScheduler, Trigger};
use crate::registry::FilterRegistry;

pub struct ChartController {
    config: DashboardConfig,
    store: DataStore,
    registry: FilterRegistry,
    /// Same order as `config.charts`
    views: Vec<(String, Box<dyn ChartView>)>,
    active: Option<String>,
    geo: GeoStatus,
    scheduler: RedrawScheduler,
    /// Filter ids reported by the registry callback, drained after each interaction
    changed: Rc<RefCell<Vec<String>>>,
    bounds: Option<Vec2>,
    ink: Color32,
}

impl ChartController {
    pub fn new(config: DashboardConfig) -> Self {
        let changed: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = changed.clone();
        let registry = FilterRegistry::new(&config.charts, move |id| {
            sink.borrow_mut().push(id.to_string());
        });
        let views = config
            .charts
            .iter()
            .map(|c| (c.id.clone(), build_view(c)))
            .collect();
        Self {
            config,
            store: DataStore::new(),
            registry,
            views,
            active: None,
            geo: GeoStatus::Pending,
            scheduler: RedrawScheduler::new(),
            changed,
            bounds: None,
            ink: Color32::GRAY,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_config(&self) -> Option<&ChartConfig> {
        self.active.as_deref().and_then(|id| self.config.chart(id))
    }

    pub fn active_view(&self) -> Option<&dyn ChartView> {
        let id = self.active.as_deref()?;
        self.views
            .iter()
            .find(|(v, _)| v == id)
            .map(|(_, view)| &**view)
    }

    fn active_view_mut(&mut self) -> Option<&mut Box<dyn ChartView>> {
        let id = self.active.as_deref()?;
        self.views.iter_mut().find(|(v, _)| v == id).map(|(_, view)| view)
    }

    /// Whether the section for `chart_id` is the visible one
    pub fn is_active(&self, chart_id: &str) -> bool {
        self.active.as_deref() == Some(chart_id)
    }

    /// Install the loaded store and show the initial chart
    pub fn on_data_ready(&mut self, store: DataStore, ready: DataReady) -> Result<()> {
        if self.store.is_loaded() {
            return Err(DashError::AlreadyLoaded);
        }
        tracing::info!(datasets = ready.datasets, rows = ready.rows, "installing data");
        self.store = store;

        let target = self
            .active
            .clone()
            .or_else(|| self.config.initial_chart().map(str::to_string));
        match target {
            Some(id) => self.switch_to(&id),
            None => Ok(()),
        }
    }

    /// Boundary file arrived or failed; only map charts care
    pub fn on_geo(&mut self, geo: GeoStatus) -> Result<()> {
        self.geo = geo;
        let is_map = self
            .active_config()
            .is_some_and(|c| matches!(c.kind, ChartKind::Choropleth { .. }));
        if is_map {
            self.redraw_active()?;
        }
        Ok(())
    }

    /// Make `chart_id` the visible chart and rebuild its filter panel
    pub fn switch_to(&mut self, chart_id: &str) -> Result<()> {
        profiling::scope!("ChartController::switch_to");
        if !self.views.iter().any(|(id, _)| id == chart_id) {
            return Err(DashError::UnknownChart(chart_id.to_string()));
        }

        if let Some(previous) = self.active.replace(chart_id.to_string()) {
            tracing::debug!(chart = %previous, "deactivated chart");
        }
        tracing::info!(chart = chart_id, "activated chart");

        self.registry.render(chart_id, &self.store);
        self.changed.borrow_mut().clear();
        self.scheduler.cancel();

        if self.apply_geometry(Instant::now()) && self.store.is_loaded() {
            self.redraw_active()?;
        }
        Ok(())
    }

    /// Recompute the active chart from the current store and filters
    pub fn redraw_active(&mut self) -> Result<()> {
        profiling::scope!("ChartController::redraw_active");
        if !self.store.is_loaded() {
            return Ok(());
        }
        let Some(id) = self.active.clone() else {
            return Ok(());
        };
        let Some(config) = self.config.chart(&id) else {
            return Err(DashError::UnknownChart(id));
        };
        let Some((_, view)) = self.views.iter_mut().find(|(v, _)| *v == id) else {
            return Err(DashError::UnknownChart(id));
        };

        let ctx = ChartContext {
            store: &self.store,
            filters: self.registry.scoped(&config.id, config.empty_selection),
            geo: &self.geo,
            config,
            ink: self.ink,
        };
        view.update(&ctx)
    }

    pub fn on_filter_changed(&mut self, now: Instant) {
        self.scheduler.schedule(Trigger::Filter, now);
    }

    /// Record the container size; a change schedules a debounced redraw
    pub fn on_resize(&mut self, bounds: Vec2, now: Instant) {
        if self.bounds == Some(bounds) {
            return;
        }
        let first = self.bounds.is_none();
        self.bounds = Some(bounds);
        if first {
            // Nothing drawn yet, no reason to wait
            if self.apply_geometry(now) {
                log_failure(self.redraw_active());
            }
        } else {
            self.scheduler.schedule(Trigger::Resize, now);
        }
    }

    /// Fit the active view into the last known bounds; schedules a retry when
    /// the container has no usable size yet
    fn apply_geometry(&mut self, now: Instant) -> bool {
        let bounds = self.bounds.unwrap_or(Vec2::ZERO);
        let Some(view) = self.active_view_mut() else {
            return false;
        };
        match view.resize(bounds) {
            Geometry::Ready { .. } => true,
            Geometry::Deferred => {
                tracing::trace!(?bounds, "chart container has no size yet");
                self.scheduler.retry_geometry(now);
                false
            }
        }
    }

    /// Run due redraws and advance animations
    pub fn pump(&mut self, now: Instant) -> Result<()> {
        if let Some(view) = self.active_view_mut() {
            view.zoom_mut().tick(now);
        }
        let due = self.scheduler.due(now);
        if (due.redraw || due.geometry) && self.apply_geometry(now) {
            self.redraw_active()?;
        }
        Ok(())
    }

    /// When the frame loop must run again, `None` if nothing is pending
    pub fn next_wakeup(&self) -> Option<Instant> {
        let animating = self.active_view().is_some_and(|v| v.zoom().is_animating());
        if animating {
            return Some(Instant::now());
        }
        self.scheduler.next_deadline()
    }

    pub fn toggle_item(&mut self, filter_id: &str, item: &str, now: Instant) {
        self.registry.toggle_item(filter_id, item);
        self.drain_changes(now);
    }

    pub fn set_select_all(&mut self, filter_id: &str, all: bool, now: Instant) {
        self.registry.set_select_all(filter_id, all);
        self.drain_changes(now);
    }

    pub fn select_single(&mut self, filter_id: &str, value: &str, now: Instant) {
        self.registry.select_single(filter_id, value);
        self.drain_changes(now);
    }

    fn drain_changes(&mut self, now: Instant) {
        let changed: Vec<String> = self.changed.borrow_mut().drain(..).collect();
        for id in &changed {
            tracing::debug!(filter = %id, "filter changed");
        }
        if !changed.is_empty() {
            self.on_filter_changed(now);
        }
    }

    /// Foreground colour changed with the theme; labels need repainting
    pub fn set_ink(&mut self, ink: Color32) {
        if self.ink != ink {
            self.ink = ink;
            log_failure(self.redraw_active());
        }
    }

    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        if let Some(view) = self.active_view_mut().filter(|v| v.interactive()) {
            view.zoom_mut().zoom_at(anchor, factor);
        }
    }

    pub fn pan(&mut self, delta: Vec2) {
        if let Some(view) = self.active_view_mut().filter(|v| v.interactive()) {
            view.zoom_mut().pan(delta);
        }
    }

    /// Animate the active chart back to the identity transform
    pub fn reset_zoom(&mut self, now: Instant) {
        if let Some(view) = self.active_view_mut() {
            view.zoom_mut().reset(now);
        }
    }
}

fn log_failure(result: Result<()>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "chart update failed");
    }
}

//! Chart views
//!
//! Each chart kind turns filtered records into a [`Scene`]. Views own their
//! geometry and pan/zoom state; everything they read comes in through a
//! borrowed [`ChartContext`] on each redraw.

pub mod axis;
pub mod palette;

mod bar;
mod choropleth;
mod grouped_bar;
mod line;
mod pie;
mod radar;
mod trend;

use egui::{vec2, Color32, Vec2};

use crate::config::{ChartConfig, ChartKind};
use crate::constants::plot::{
    MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_PLOT_HEIGHT, MIN_PLOT_WIDTH, MIN_WIDTH,
};
use crate::data::{DataStore, Dataset, GeoCollection, Record};
use crate::error::{DashError, Result};
use crate::pipeline::filter;
use crate::registry::ScopedFilters;
use crate::scene::{Item, Scene};
use crate::state::{ZoomState, ZoomTransform};

pub use bar::BarChart;
pub use choropleth::ChoroplethChart;
pub use grouped_bar::GroupedBarChart;
pub use line::LineChart;
pub use pie::PieChart;
pub use radar::RadarChart;
pub use trend::TrendChart;

pub const NO_DATA: &str = "No data available";
pub const MAP_UNAVAILABLE: &str = "Map data unavailable";
pub const MAP_LOADING: &str = "Loading map data…";

/// Progress of the boundary resource used by map charts
#[derive(Debug, Clone, Default)]
pub enum GeoStatus {
    #[default]
    Pending,
    Ready(GeoCollection),
    Failed(String),
}

/// Everything a view may read during one redraw
pub struct ChartContext<'a> {
    pub store: &'a DataStore,
    pub filters: ScopedFilters<'a>,
    pub geo: &'a GeoStatus,
    pub config: &'a ChartConfig,
    /// Foreground colour for axes and labels
    pub ink: Color32,
}

impl<'a> ChartContext<'a> {
    /// The chart's dataset and its records passing every declared filter
    pub fn filtered(&self) -> Result<(&'a Dataset, Vec<&'a Record>)> {
        let dataset = self
            .store
            .dataset(&self.config.dataset)
            .ok_or_else(|| DashError::UnknownDataset(self.config.dataset.clone()))?;
        let records = filter::apply(dataset, &self.filters.constraints());
        Ok((dataset, records))
    }
}

/// Space reserved around the plot area for axes and legends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.left + self.right, self.top + self.bottom)
    }
}

/// Outcome of fitting a view into its container
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Ready { canvas: Vec2, plot: Vec2 },
    /// Container has no usable size yet; retry shortly
    Deferred,
}

/// Geometry, zoom and the last scene of one view
#[derive(Debug, Clone)]
pub struct ChartFrame {
    pub margins: Margins,
    plot: Option<Vec2>,
    pub zoom: ZoomState,
    pub scene: Scene,
}

impl ChartFrame {
    pub fn new(margins: Margins, max_scale: f32) -> Self {
        Self {
            margins,
            plot: None,
            zoom: ZoomState::new(max_scale),
            scene: Scene::default(),
        }
    }

    /// Fit into `bounds`: the canvas is clamped to the min/max chart size,
    /// the plot is what remains inside the margins, never below the minimum
    pub fn resize(&mut self, bounds: Vec2) -> Geometry {
        if !(bounds.x > 0.0 && bounds.y > 0.0) {
            return Geometry::Deferred;
        }
        let outer = vec2(
            bounds.x.clamp(MIN_WIDTH, MAX_WIDTH),
            bounds.y.clamp(MIN_HEIGHT, MAX_HEIGHT),
        );
        let plot = (outer - self.margins.size()).max(vec2(MIN_PLOT_WIDTH, MIN_PLOT_HEIGHT));
        self.plot = Some(plot);
        Geometry::Ready {
            canvas: self.canvas_size(plot),
            plot,
        }
    }

    fn canvas_size(&self, plot: Vec2) -> Vec2 {
        plot + self.margins.size()
    }

    pub fn plot_size(&self) -> Option<Vec2> {
        self.plot.filter(|p| p.x > 0.0 && p.y > 0.0)
    }

    pub fn canvas(&self) -> Option<Vec2> {
        self.plot_size().map(|p| self.canvas_size(p))
    }
}

/// One chart kind
pub trait ChartView {
    fn frame(&self) -> &ChartFrame;
    fn frame_mut(&mut self) -> &mut ChartFrame;

    /// Compute a fresh scene for a plot of `size`
    fn build(&mut self, ctx: &ChartContext, size: Vec2) -> Result<Scene>;

    /// Axes that follow zoom on rescaled scales instead of scaling with content
    fn axes(&self, _t: &ZoomTransform) -> Vec<Item> {
        Vec::new()
    }

    fn resize(&mut self, bounds: Vec2) -> Geometry {
        self.frame_mut().resize(bounds)
    }

    /// Recompute the scene; a no-op until data is loaded and geometry is known
    fn update(&mut self, ctx: &ChartContext) -> Result<()> {
        profiling::scope!("ChartView::update");
        if !ctx.store.is_loaded() {
            return Ok(());
        }
        let Some(size) = self.frame().plot_size() else {
            tracing::debug!(chart = %ctx.config.id, "skipping redraw without geometry");
            return Ok(());
        };
        let scene = self.build(ctx, size)?;
        tracing::debug!(
            chart = %ctx.config.id,
            shapes = scene.content.len(),
            placeholder = scene.placeholder.is_some(),
            "redrew chart"
        );
        self.frame_mut().scene = scene;
        Ok(())
    }

    fn scene(&self) -> &Scene {
        &self.frame().scene
    }

    /// Zoom and tooltips are off while a placeholder is shown
    fn interactive(&self) -> bool {
        self.frame().scene.placeholder.is_none()
    }

    fn zoom(&self) -> &ZoomState {
        &self.frame().zoom
    }

    fn zoom_mut(&mut self) -> &mut ZoomState {
        &mut self.frame_mut().zoom
    }
}

/// Construct the view for a configured chart
pub fn build_view(config: &ChartConfig) -> Box<dyn ChartView> {
    let max_scale = config.kind.max_scale();
    match &config.kind {
        ChartKind::Line { series } => Box::new(LineChart::new(series, max_scale)),
        ChartKind::Bar { group_by, top_n } => Box::new(BarChart::new(group_by, *top_n, max_scale)),
        ChartKind::Pie { category } => Box::new(PieChart::new(category, max_scale)),
        ChartKind::Radar { category } => Box::new(RadarChart::new(category, max_scale)),
        ChartKind::GroupedBar { category } => Box::new(GroupedBarChart::new(category, max_scale)),
        ChartKind::Trend => Box::new(TrendChart::new(max_scale)),
        ChartKind::Choropleth {
            region,
            region_property,
            region_names,
        } => Box::new(ChoroplethChart::new(
            region,
            region_property,
            region_names.clone(),
            max_scale,
        )),
    }
}

/// Shared test harness: render one built-in chart against the full fixture store
#[cfg(test)]
pub(crate) mod harness {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::fixtures::full_store;
    use crate::registry::FilterRegistry;
    use crate::scene::Shape;

    pub struct Harness {
        pub config: DashboardConfig,
        pub store: DataStore,
        pub registry: FilterRegistry,
        pub geo: GeoStatus,
    }

    impl Harness {
        pub fn new(chart_id: &str) -> Self {
            let config = DashboardConfig::builtin().unwrap();
            let store = full_store();
            let mut registry = FilterRegistry::new(&config.charts, |_| {});
            registry.render(chart_id, &store);
            Self {
                config,
                store,
                registry,
                geo: GeoStatus::Pending,
            }
        }

        pub fn draw(&self, chart_id: &str) -> Box<dyn ChartView> {
            let chart = self.config.chart(chart_id).unwrap();
            let mut view = build_view(chart);
            view.resize(vec2(800.0, 600.0));
            let ctx = ChartContext {
                store: &self.store,
                filters: self.registry.scoped(&chart.id, chart.empty_selection),
                geo: &self.geo,
                config: chart,
                ink: Color32::BLACK,
            };
            view.update(&ctx).unwrap();
            view
        }
    }

    /// Hover texts of the scene, in paint order
    pub fn hovers(scene: &Scene) -> Vec<String> {
        scene.content.iter().filter_map(|i| i.hover.clone()).collect()
    }

    pub fn texts(items: &[Item]) -> Vec<String> {
        items
            .iter()
            .filter_map(|i| match &i.shape {
                Shape::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

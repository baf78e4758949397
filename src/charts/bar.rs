use egui::{pos2, Align2, Color32, Rect, Stroke, Vec2};

use super::{axis, palette, ChartContext, ChartFrame, ChartView, Margins, NO_DATA};
use crate::config::Unit;
use crate::constants::aggregate::AXIS_TICKS;
use crate::data::Field;
use crate::error::Result;
use crate::pipeline::aggregate::top_n;
use crate::pipeline::{format, BandScale, LinearScale};
use crate::scene::{Item, Scene, Shape};
use crate::state::ZoomTransform;

const MARGINS: Margins = Margins::new(20.0, 30.0, 50.0, 180.0);

/// Horizontal bars of the top groups by summed metric
pub struct BarChart {
    frame: ChartFrame,
    group_by: Vec<Field>,
    top_n: usize,
    scales: Option<(LinearScale, BandScale)>,
    unit: Unit,
    ink: Color32,
}

impl BarChart {
    pub fn new(group_by: &[String], top_n: usize, max_scale: f32) -> Self {
        Self {
            frame: ChartFrame::new(MARGINS, max_scale),
            group_by: group_by.iter().map(|f| Field::from(f.as_str())).collect(),
            top_n,
            scales: None,
            unit: Unit::Count,
            ink: Color32::GRAY,
        }
    }
}

impl ChartView for BarChart {
    fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ChartFrame {
        &mut self.frame
    }

    fn build(&mut self, ctx: &ChartContext, size: Vec2) -> Result<Scene> {
        profiling::scope!("BarChart::build");
        let (dataset, records) = ctx.filtered()?;
        let groups = top_n(dataset, &records, &self.group_by, self.top_n);
        self.unit = ctx.config.unit;
        self.ink = ctx.ink;

        if groups.is_empty() {
            self.scales = None;
            return Ok(Scene::placeholder(NO_DATA));
        }

        let max = groups.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let x = LinearScale::new((0.0, max), (0.0, size.x)).nice(AXIS_TICKS);
        let y = BandScale::new(
            groups.iter().map(|(k, _)| k.clone()).collect(),
            (0.0, size.y),
            0.1,
        );

        let mut scene = Scene::default();
        for (i, (key, v)) in groups.iter().enumerate() {
            let top = y.position(i);
            let rect = Rect::from_min_max(pos2(0.0, top), pos2(x.map(*v), top + y.bandwidth()));
            scene.content.push(Item::with_hover(
                Shape::Rect {
                    rect,
                    fill: palette::ACCENT,
                    stroke: Stroke::NONE,
                },
                format!("{}\n{}: {}", key, ctx.config.metric_label, format::value(*v, self.unit)),
            ));
            scene.table.push((key.clone(), format::value(*v, self.unit)));
        }
        scene.chrome.push(axis::caption(
            &ctx.config.metric_label,
            pos2(size.x / 2.0, size.y + 40.0),
            Align2::CENTER_CENTER,
            ctx.ink,
        ));

        self.scales = Some((x, y));
        Ok(scene)
    }

    fn axes(&self, t: &ZoomTransform) -> Vec<Item> {
        let Some((x, y)) = &self.scales else {
            return Vec::new();
        };
        let unit = self.unit;
        let zx = x.rescale(t.k, t.x);
        let mut items = axis::bottom(
            &axis::linear_ticks(&zx, AXIS_TICKS, |v| format::compact(v, unit)),
            y.range.1,
            x.range,
            self.ink,
        );
        items.extend(axis::left(&axis::band_ticks(y, t.k, t.y), 0.0, y.range, self.ink));
        items
    }
}

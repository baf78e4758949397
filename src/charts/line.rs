use egui::{pos2, Align2, Color32, Stroke, Vec2};

use super::{axis, palette, ChartContext, ChartFrame, ChartView, Margins, NO_DATA};
use crate::config::Unit;
use crate::constants::aggregate::AXIS_TICKS;
use crate::constants::plot::{DOT_RADIUS, HOVER_RADIUS};
use crate::data::Field;
use crate::error::Result;
use crate::pipeline::aggregate::line_series;
use crate::pipeline::{format, LinearScale};
use crate::scene::{Item, Scene, Shape};
use crate::state::ZoomTransform;

const MARGINS: Margins = Margins::new(20.0, 160.0, 50.0, 70.0);

/// One series per category value over years, with dots and merged tooltips
pub struct LineChart {
    frame: ChartFrame,
    series_field: Field,
    scales: Option<(LinearScale, LinearScale)>,
    unit: Unit,
    ink: Color32,
}

impl LineChart {
    pub fn new(series: &str, max_scale: f32) -> Self {
        Self {
            frame: ChartFrame::new(MARGINS, max_scale),
            series_field: Field::from(series),
            scales: None,
            unit: Unit::Count,
            ink: Color32::GRAY,
        }
    }
}

impl ChartView for LineChart {
    fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ChartFrame {
        &mut self.frame
    }

    fn build(&mut self, ctx: &ChartContext, size: Vec2) -> Result<Scene> {
        profiling::scope!("LineChart::build");
        let (dataset, records) = ctx.filtered()?;
        let series = line_series(dataset, &records, &self.series_field);
        self.unit = ctx.config.unit;
        self.ink = ctx.ink;

        let points = series.iter().flat_map(|s| s.points.iter());
        let Some((min_year, max_year)) = points.clone().map(|&(y, _)| y).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        }) else {
            self.scales = None;
            return Ok(Scene::placeholder(NO_DATA));
        };
        let max_value = points.map(|&(_, v)| v).fold(0.0, f64::max);

        let x = LinearScale::new((min_year as f64, max_year as f64), (0.0, size.x));
        let y = LinearScale::new((0.0, max_value), (size.y, 0.0)).nice(AXIS_TICKS);
        self.scales = Some((x, y));

        let mut scene = Scene {
            merge_radius: Some(HOVER_RADIUS),
            ..Scene::default()
        };
        let label = &ctx.config.metric_label;

        for (i, s) in series.iter().enumerate() {
            let color = palette::category(i);
            let pts: Vec<_> = s
                .points
                .iter()
                .map(|&(year, v)| pos2(x.map(year as f64), y.map(v)))
                .collect();
            scene.content.push(Item::new(Shape::Polyline {
                points: pts.clone(),
                stroke: Stroke::new(2.0, color),
            }));
            for (p, &(year, v)) in pts.into_iter().zip(&s.points) {
                scene.content.push(Item::with_hover(
                    Shape::Circle {
                        center: p,
                        radius: DOT_RADIUS,
                        fill: color,
                        stroke: Stroke::new(1.0, Color32::WHITE),
                    },
                    format!("{}\nYear: {}\n{}: {}", s.name, year, label, format::value(v, self.unit)),
                ));
                scene.table.push((format!("{} {}", s.name, year), format::value(v, self.unit)));
            }
        }

        let entries: Vec<(String, Color32)> = series
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), palette::category(i)))
            .collect();
        scene.chrome = axis::legend(&entries, pos2(size.x + 20.0, 0.0), ctx.ink);
        scene.chrome.push(axis::caption("Year", pos2(size.x / 2.0, size.y + 40.0), Align2::CENTER_CENTER, ctx.ink));
        scene.chrome.push(axis::caption(label, pos2(-MARGINS.left + 4.0, -8.0), Align2::LEFT_BOTTOM, ctx.ink));
        Ok(scene)
    }

    fn axes(&self, t: &ZoomTransform) -> Vec<Item> {
        let Some((x, y)) = &self.scales else {
            return Vec::new();
        };
        let x = x.rescale(t.k, t.x);
        let y = y.rescale(t.k, t.y);
        let unit = self.unit;
        let mut items = axis::bottom(&axis::year_ticks(&x, AXIS_TICKS), y.range.0, x.range, self.ink);
        items.extend(axis::left(
            &axis::linear_ticks(&y, AXIS_TICKS, |v| format::compact(v, unit)),
            0.0,
            (y.range.1, y.range.0),
            self.ink,
        ));
        items
    }
}

use egui::{pos2, Align2, Color32, Stroke, Vec2};

use super::{axis, palette, ChartContext, ChartFrame, ChartView, Margins, NO_DATA};
use crate::constants::aggregate::AXIS_TICKS;
use crate::error::Result;
use crate::pipeline::aggregate::per_year;
use crate::pipeline::{format, LinearScale};
use crate::scene::{Item, Scene, Shape};

const MARGINS: Margins = Margins::new(20.0, 30.0, 50.0, 80.0);

/// Summed metric per year within the selected year range
pub struct TrendChart {
    frame: ChartFrame,
}

impl TrendChart {
    pub fn new(max_scale: f32) -> Self {
        Self {
            frame: ChartFrame::new(MARGINS, max_scale),
        }
    }
}

impl ChartView for TrendChart {
    fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ChartFrame {
        &mut self.frame
    }

    fn build(&mut self, ctx: &ChartContext, size: Vec2) -> Result<Scene> {
        profiling::scope!("TrendChart::build");
        let (_, records) = ctx.filtered()?;
        let years = per_year(&records);
        let (Some(first), Some(last)) = (years.first(), years.last()) else {
            return Ok(Scene::placeholder(NO_DATA));
        };

        let unit = ctx.config.unit;
        let label = &ctx.config.metric_label;
        let max = years.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        // A single year sits in the middle of the axis
        let x = LinearScale::new((first.0 as f64, last.0 as f64), (0.0, size.x));
        let y = LinearScale::new((0.0, max), (size.y, 0.0)).nice(AXIS_TICKS);

        let mut scene = Scene {
            geometric: true,
            ..Scene::default()
        };
        let points: Vec<_> = years
            .iter()
            .map(|&(year, v)| pos2(x.map(year as f64), y.map(v)))
            .collect();
        scene.content.push(Item::new(Shape::Polyline {
            points: points.clone(),
            stroke: Stroke::new(2.0, palette::ACCENT),
        }));
        for (p, &(year, v)) in points.into_iter().zip(&years) {
            scene.content.push(Item::with_hover(
                Shape::Circle {
                    center: p,
                    radius: 5.0,
                    fill: palette::ACCENT,
                    stroke: Stroke::new(1.0, Color32::WHITE),
                },
                format!("Year: {}\n{}: {}", year, label, format::value(v, unit)),
            ));
            scene.table.push((year.to_string(), format::value(v, unit)));
        }

        scene
            .content
            .extend(axis::bottom(&axis::year_ticks(&x, AXIS_TICKS), size.y, x.range, ctx.ink));
        scene.content.extend(axis::left(
            &axis::linear_ticks(&y, AXIS_TICKS, |v| format::compact(v, unit)),
            0.0,
            (size.y, 0.0),
            ctx.ink,
        ));
        scene.chrome.push(axis::caption("Year", pos2(size.x / 2.0, size.y + 40.0), Align2::CENTER_CENTER, ctx.ink));
        scene.chrome.push(axis::caption(label, pos2(-MARGINS.left + 4.0, -8.0), Align2::LEFT_BOTTOM, ctx.ink));
        Ok(scene)
    }
}

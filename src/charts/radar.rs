use egui::{pos2, Align2, Color32, Stroke, Vec2};
use std::f32::consts::TAU;

use super::{palette, ChartContext, ChartFrame, ChartView, Margins, NO_DATA};
use crate::constants::aggregate::RADAR_LEVELS;
use crate::data::Field;
use crate::error::Result;
use crate::pipeline::aggregate::sum_by_field;
use crate::pipeline::format;
use crate::scene::{polar, Item, Scene, Shape};

const MARGINS: Margins = Margins::new(40.0, 40.0, 40.0, 40.0);
const LABEL_GAP: f32 = 14.0;

/// Summed metric per category on radial axes
pub struct RadarChart {
    frame: ChartFrame,
    category: Field,
}

impl RadarChart {
    pub fn new(category: &str, max_scale: f32) -> Self {
        Self {
            frame: ChartFrame::new(MARGINS, max_scale),
            category: Field::from(category),
        }
    }
}

impl ChartView for RadarChart {
    fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ChartFrame {
        &mut self.frame
    }

    fn build(&mut self, ctx: &ChartContext, size: Vec2) -> Result<Scene> {
        profiling::scope!("RadarChart::build");
        let (dataset, records) = ctx.filtered()?;
        let axes = sum_by_field(dataset, &records, &self.category);
        if axes.is_empty() {
            return Ok(Scene::placeholder(NO_DATA));
        }

        let unit = ctx.config.unit;
        let center = pos2(size.x / 2.0, size.y / 2.0);
        let radius = (size.x.min(size.y) / 2.0 - 40.0).max(20.0);
        let max = axes.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let max = if max > 0.0 { max } else { 1.0 };
        let n = axes.len();
        let angle = |i: usize| i as f32 * TAU / n as f32;
        let grid = Stroke::new(1.0, ctx.ink.gamma_multiply(0.3));

        let mut scene = Scene {
            geometric: true,
            ..Scene::default()
        };

        for level in 1..=RADAR_LEVELS {
            let r = radius * level as f32 / RADAR_LEVELS as f32;
            let ring: Vec<_> = (0..n).map(|i| polar(center, r, angle(i))).collect();
            scene.content.push(Item::new(Shape::polygon(ring, Color32::TRANSPARENT, grid)));
            scene.content.push(Item::new(Shape::Text {
                pos: pos2(center.x + 4.0, center.y - r),
                text: format::compact(max * level as f64 / RADAR_LEVELS as f64, unit),
                anchor: Align2::LEFT_BOTTOM,
                size: 10.0,
                color: ctx.ink,
            }));
        }

        for (i, (name, _)) in axes.iter().enumerate() {
            scene.content.push(Item::new(Shape::Line {
                from: center,
                to: polar(center, radius, angle(i)),
                stroke: grid,
            }));
            let a = angle(i);
            let anchor = if a.sin().abs() < 1e-3 {
                Align2::CENTER_CENTER
            } else if a.sin() > 0.0 {
                Align2::LEFT_CENTER
            } else {
                Align2::RIGHT_CENTER
            };
            scene.content.push(Item::new(Shape::Text {
                pos: polar(center, radius + LABEL_GAP, a),
                text: name.clone(),
                anchor,
                size: 12.0,
                color: ctx.ink,
            }));
        }

        let vertices: Vec<_> = axes
            .iter()
            .enumerate()
            .map(|(i, (_, v))| polar(center, radius * (*v / max) as f32, angle(i)))
            .collect();
        let color = palette::category(0);
        scene.content.push(Item::new(Shape::polygon(
            vertices.clone(),
            palette::translucent(color, 90),
            Stroke::new(2.0, color),
        )));
        for (p, (name, v)) in vertices.into_iter().zip(&axes) {
            scene.content.push(Item::with_hover(
                Shape::Circle {
                    center: p,
                    radius: 4.0,
                    fill: color,
                    stroke: Stroke::NONE,
                },
                format!("{}\n{}: {}", name, ctx.config.metric_label, format::value(*v, unit)),
            ));
            scene.table.push((name.clone(), format::value(*v, unit)));
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::{hovers, Harness};
    use super::*;

    #[test]
    fn test_axes_in_first_appearance_order() {
        let h = Harness::new("radar");
        let view = h.draw("radar");
        assert_eq!(
            hovers(view.scene()),
            vec!["Camera\nFines: $500", "Police\nFines: $300", "Radar\nFines: $200"]
        );
    }

    #[test]
    fn test_five_rings() {
        let h = Harness::new("radar");
        let view = h.draw("radar");
        let rings = view
            .scene()
            .content
            .iter()
            .filter(|i| matches!(&i.shape, Shape::Polygon { fill, .. } if *fill == Color32::TRANSPARENT))
            .count();
        assert_eq!(rings, RADAR_LEVELS);
    }

    #[test]
    fn test_largest_value_reaches_outer_ring() {
        let h = Harness::new("radar");
        let view = h.draw("radar");
        let size = view.frame().plot_size().unwrap();
        let center = pos2(size.x / 2.0, size.y / 2.0);
        let radius = size.x.min(size.y) / 2.0 - 40.0;
        let Shape::Circle { center: top, .. } = view
            .scene()
            .content
            .iter()
            .find(|i| i.hover.is_some())
            .unwrap()
            .shape
        else {
            panic!("expected a dot");
        };
        assert!((center.distance(top) - radius).abs() < 1e-3);
    }
}

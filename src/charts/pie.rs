use egui::{pos2, Align2, Color32, Stroke, Vec2};
use std::f32::consts::TAU;

use super::{axis, palette, ChartContext, ChartFrame, ChartView, Margins, NO_DATA};
use crate::constants::aggregate::PIE_LABEL_MIN_PCT;
use crate::data::Field;
use crate::error::Result;
use crate::pipeline::aggregate::{sort_descending, sum_by_field};
use crate::pipeline::format;
use crate::scene::{polar, Item, Scene, Shape};

const MARGINS: Margins = Margins::new(20.0, 180.0, 40.0, 20.0);

/// Share of the summed metric per category
pub struct PieChart {
    frame: ChartFrame,
    category: Field,
}

impl PieChart {
    pub fn new(category: &str, max_scale: f32) -> Self {
        Self {
            frame: ChartFrame::new(MARGINS, max_scale),
            category: Field::from(category),
        }
    }
}

impl ChartView for PieChart {
    fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ChartFrame {
        &mut self.frame
    }

    fn build(&mut self, ctx: &ChartContext, size: Vec2) -> Result<Scene> {
        profiling::scope!("PieChart::build");
        let (dataset, records) = ctx.filtered()?;
        let mut slices = sum_by_field(dataset, &records, &self.category);
        sort_descending(&mut slices);
        slices.retain(|(_, v)| *v > 0.0);

        let total: f64 = slices.iter().map(|(_, v)| v).sum();
        if slices.is_empty() || total <= 0.0 {
            return Ok(Scene::placeholder(NO_DATA));
        }

        let unit = ctx.config.unit;
        let center = pos2(size.x / 2.0, size.y / 2.0);
        let radius = (size.x.min(size.y) / 2.0 - 10.0).max(10.0);
        let mut scene = Scene {
            geometric: true,
            ..Scene::default()
        };

        let mut start = 0.0f32;
        let mut labels = Vec::new();
        for (i, (name, v)) in slices.iter().enumerate() {
            let end = start + (*v / total) as f32 * TAU;
            scene.content.push(Item::with_hover(
                Shape::Wedge {
                    center,
                    inner: 0.0,
                    outer: radius,
                    start,
                    end,
                    fill: palette::pastel(i),
                    stroke: Stroke::new(1.0, Color32::WHITE),
                },
                format!(
                    "{}\n{}: {}\nShare: {}",
                    name,
                    ctx.config.metric_label,
                    format::value(*v, unit),
                    format::percent(*v, total)
                ),
            ));
            if v / total * 100.0 > PIE_LABEL_MIN_PCT {
                labels.push(Item::new(Shape::Text {
                    pos: polar(center, radius * 0.7, (start + end) / 2.0),
                    text: format::percent(*v, total),
                    anchor: Align2::CENTER_CENTER,
                    size: 12.0,
                    color: Color32::BLACK,
                }));
            }
            scene.table.push((name.clone(), format::value(*v, unit)));
            start = end;
        }
        // Labels on top of every wedge
        scene.content.extend(labels);

        let entries: Vec<(String, Color32)> = slices
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), palette::pastel(i)))
            .collect();
        scene.chrome = axis::legend(&entries, pos2(size.x + 20.0, 0.0), ctx.ink);
        scene.chrome.push(axis::caption(
            &format!("Total: {}", format::compact(total, unit)),
            pos2(size.x / 2.0, size.y + 20.0),
            Align2::CENTER_CENTER,
            ctx.ink,
        ));
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::{hovers, texts, Harness};
    use super::*;

    #[test]
    fn test_slices_and_total() {
        let h = Harness::new("age");
        let view = h.draw("age");
        let scene = view.scene();
        assert!(scene.geometric);

        let hover = hovers(scene);
        assert_eq!(hover.len(), 3);
        assert_eq!(hover[0], "17-25\nFines: $7,000,000\nShare: 68.6%");
        assert!(texts(&scene.chrome).contains(&"Total: $10.2M".to_string()));
    }

    #[test]
    fn test_small_slices_unlabelled() {
        let h = Harness::new("age");
        let view = h.draw("age");
        let labels = texts(&view.scene().content);
        // 65 and over is 2.0% of the total
        assert_eq!(labels, vec!["68.6%", "29.4%"]);
    }

    #[test]
    fn test_wedges_cover_full_circle() {
        let h = Harness::new("age");
        let view = h.draw("age");
        let last_end = view
            .scene()
            .content
            .iter()
            .filter_map(|i| match i.shape {
                Shape::Wedge { end, .. } => Some(end),
                _ => None,
            })
            .last()
            .unwrap();
        assert!((last_end - TAU).abs() < 1e-4);
    }
}

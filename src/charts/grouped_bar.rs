use egui::{pos2, Align2, Color32, Rect, Stroke, Vec2};

use super::{axis, palette, ChartContext, ChartFrame, ChartView, Margins, NO_DATA};
use crate::constants::aggregate::AXIS_TICKS;
use crate::data::Field;
use crate::error::Result;
use crate::pipeline::aggregate::YearMatrix;
use crate::pipeline::{format, BandScale, LinearScale};
use crate::scene::{Item, Scene, Shape};

const MARGINS: Margins = Margins::new(20.0, 180.0, 80.0, 80.0);

/// Bars per category within each year, plus the yearly total as a line
pub struct GroupedBarChart {
    frame: ChartFrame,
    category: Field,
}

impl GroupedBarChart {
    pub fn new(category: &str, max_scale: f32) -> Self {
        Self {
            frame: ChartFrame::new(MARGINS, max_scale),
            category: Field::from(category),
        }
    }
}

impl ChartView for GroupedBarChart {
    fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ChartFrame {
        &mut self.frame
    }

    fn build(&mut self, ctx: &ChartContext, size: Vec2) -> Result<Scene> {
        profiling::scope!("GroupedBarChart::build");
        let (dataset, records) = ctx.filtered()?;
        let matrix = YearMatrix::build(dataset, &records, &self.category);
        if matrix.is_empty() {
            return Ok(Scene::placeholder(NO_DATA));
        }

        let unit = ctx.config.unit;
        let label = &ctx.config.metric_label;
        let x0 = BandScale::new(
            matrix.years.iter().map(|y| y.to_string()).collect(),
            (0.0, size.x),
            0.2,
        );
        let x1 = BandScale::new(matrix.categories.clone(), (0.0, x0.bandwidth()), 0.05);
        let y = LinearScale::new((0.0, matrix.y_max()), (size.y, 0.0)).nice(AXIS_TICKS);

        let mut scene = Scene {
            geometric: true,
            ..Scene::default()
        };

        for (yi, year) in matrix.years.iter().enumerate() {
            for (ci, category) in matrix.categories.iter().enumerate() {
                let v = matrix.values[yi][ci];
                let left = x0.position(yi) + x1.position(ci);
                let rect = Rect::from_min_max(
                    pos2(left, y.map(v)),
                    pos2(left + x1.bandwidth(), size.y),
                );
                scene.content.push(Item::with_hover(
                    Shape::Rect {
                        rect,
                        fill: palette::category(ci),
                        stroke: Stroke::NONE,
                    },
                    format!("{}\nYear: {}\n{}: {}", category, year, label, format::value(v, unit)),
                ));
                scene.table.push((format!("{} {}", year, category), format::value(v, unit)));
            }
        }

        let centers: Vec<_> = matrix
            .totals()
            .into_iter()
            .enumerate()
            .map(|(yi, total)| (pos2(x0.position(yi) + x0.bandwidth() / 2.0, y.map(total)), total))
            .collect();
        scene.content.push(Item::new(Shape::Polyline {
            points: centers.iter().map(|(p, _)| *p).collect(),
            stroke: Stroke::new(2.0, palette::TOTAL),
        }));
        for ((p, total), year) in centers.iter().zip(&matrix.years) {
            scene.content.push(Item::with_hover(
                Shape::Circle {
                    center: *p,
                    radius: 4.0,
                    fill: palette::TOTAL,
                    stroke: Stroke::NONE,
                },
                format!("Total\nYear: {}\n{}: {}", year, label, format::value(*total, unit)),
            ));
            scene.table.push((format!("{} Total", year), format::value(*total, unit)));
        }

        // Axes zoom with the bars
        scene
            .content
            .extend(axis::bottom(&axis::band_ticks(&x0, 1.0, 0.0), size.y, x0.range, ctx.ink));
        scene.content.extend(axis::left(
            &axis::linear_ticks(&y, AXIS_TICKS, |v| format::compact(v, unit)),
            0.0,
            (size.y, 0.0),
            ctx.ink,
        ));

        let mut entries: Vec<(String, Color32)> = matrix
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), palette::category(i)))
            .collect();
        entries.push(("Total".to_string(), palette::TOTAL));
        scene.chrome = axis::legend(&entries, pos2(size.x + 20.0, 0.0), ctx.ink);
        scene.chrome.push(axis::caption("Year", pos2(size.x / 2.0, size.y + 50.0), Align2::CENTER_CENTER, ctx.ink));
        scene.chrome.push(axis::caption(label, pos2(-MARGINS.left + 4.0, -8.0), Align2::LEFT_BOTTOM, ctx.ink));
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::{hovers, texts, Harness};
    use super::*;

    #[test]
    fn test_matrix_bars_and_totals() {
        let h = Harness::new("grouped");
        let view = h.draw("grouped");
        let scene = view.scene();
        assert_eq!(
            hovers(scene),
            vec![
                "Radar\nYear: 2019\nOffences: 100",
                "Camera\nYear: 2019\nOffences: 50",
                "Radar\nYear: 2020\nOffences: 150",
                "Camera\nYear: 2020\nOffences: 0",
                "Total\nYear: 2019\nOffences: 150",
                "Total\nYear: 2020\nOffences: 150",
            ]
        );
        let legend = texts(&scene.chrome);
        assert_eq!(legend[..3], ["Radar".to_string(), "Camera".to_string(), "Total".to_string()]);
    }

    #[test]
    fn test_missing_cell_has_zero_height() {
        let h = Harness::new("grouped");
        let view = h.draw("grouped");
        let heights: Vec<f32> = view
            .scene()
            .content
            .iter()
            .filter_map(|i| match i.shape {
                Shape::Rect { rect, .. } if i.hover.is_some() => Some(rect.height()),
                _ => None,
            })
            .collect();
        assert_eq!(heights.len(), 4);
        assert_eq!(heights[3], 0.0);
        assert!(heights[2] > heights[0]);
    }
}

//! Retained chart scenes
//!
//! A chart redraw produces a [`Scene`]: plain shapes in plot-local pixel
//! coordinates plus their hover texts. Painting, SVG export and hit testing
//! all read the same scene, so the chart pipeline can be tested without a
//! window.

pub mod paint;
pub mod svg;

use egui::{Align2, Color32, Pos2, Rect, Stroke};
use geo::{Contains, Point};
use std::f32::consts::TAU;

use crate::state::ZoomTransform;

/// Drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        rect: Rect,
        fill: Color32,
        stroke: Stroke,
    },
    Circle {
        center: Pos2,
        radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Line {
        from: Pos2,
        to: Pos2,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Pos2>,
        stroke: Stroke,
    },
    /// Closed polygon, may be concave. Built with [`Shape::polygon`].
    Polygon {
        points: Vec<Pos2>,
        /// Fill triangulation; survives any zoom transform unchanged
        triangles: Vec<[u32; 3]>,
        fill: Color32,
        stroke: Stroke,
    },
    /// Annular sector; angles in radians clockwise from 12 o'clock
    Wedge {
        center: Pos2,
        inner: f32,
        outer: f32,
        start: f32,
        end: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Text {
        pos: Pos2,
        text: String,
        anchor: Align2,
        size: f32,
        color: Color32,
    },
}

/// Point on a circle at `angle` (clockwise from 12 o'clock)
pub fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    Pos2::new(center.x + radius * angle.sin(), center.y - radius * angle.cos())
}

impl Shape {
    pub fn polygon(points: Vec<Pos2>, fill: Color32, stroke: Stroke) -> Self {
        let triangles = paint::triangulate(&points);
        Shape::Polygon {
            points,
            triangles,
            fill,
            stroke,
        }
    }

    /// Shape as seen through `t`. Geometric zoom scales sizes too; otherwise
    /// only positions move, like an axis rescale.
    pub fn transformed(&self, t: &ZoomTransform, geometric: bool) -> Shape {
        let s = if geometric { t.k } else { 1.0 };
        let stroke = |st: &Stroke| Stroke::new(st.width * s, st.color);
        match self {
            Shape::Rect { rect, fill, stroke: st } => Shape::Rect {
                rect: Rect::from_two_pos(t.apply(rect.min), t.apply(rect.max)),
                fill: *fill,
                stroke: stroke(st),
            },
            Shape::Circle {
                center,
                radius,
                fill,
                stroke: st,
            } => Shape::Circle {
                center: t.apply(*center),
                radius: radius * s,
                fill: *fill,
                stroke: stroke(st),
            },
            Shape::Line { from, to, stroke: st } => Shape::Line {
                from: t.apply(*from),
                to: t.apply(*to),
                stroke: stroke(st),
            },
            Shape::Polyline { points, stroke: st } => Shape::Polyline {
                points: points.iter().map(|p| t.apply(*p)).collect(),
                stroke: stroke(st),
            },
            Shape::Polygon {
                points,
                triangles,
                fill,
                stroke: st,
            } => Shape::Polygon {
                points: points.iter().map(|p| t.apply(*p)).collect(),
                triangles: triangles.clone(),
                fill: *fill,
                stroke: stroke(st),
            },
            Shape::Wedge {
                center,
                inner,
                outer,
                start,
                end,
                fill,
                stroke: st,
            } => Shape::Wedge {
                center: t.apply(*center),
                inner: inner * s,
                outer: outer * s,
                start: *start,
                end: *end,
                fill: *fill,
                stroke: stroke(st),
            },
            Shape::Text {
                pos,
                text,
                anchor,
                size,
                color,
            } => Shape::Text {
                pos: t.apply(*pos),
                text: text.clone(),
                anchor: *anchor,
                size: size * s,
                color: *color,
            },
        }
    }

    /// Whether `p` lies on the shape. Text never does.
    pub fn contains(&self, p: Pos2) -> bool {
        match self {
            Shape::Rect { rect, .. } => rect.contains(p),
            Shape::Circle { center, radius, .. } => center.distance(p) <= *radius,
            Shape::Line { from, to, stroke } => {
                segment_distance(p, *from, *to) <= stroke.width.max(3.0)
            }
            Shape::Polyline { points, stroke } => points
                .windows(2)
                .any(|w| segment_distance(p, w[0], w[1]) <= stroke.width.max(3.0)),
            Shape::Polygon { points, .. } => {
                points.len() >= 3 && to_geo(points).contains(&Point::new(p.x as f64, p.y as f64))
            }
            Shape::Wedge {
                center,
                inner,
                outer,
                start,
                end,
                ..
            } => {
                let d = center.distance(p);
                if d < *inner || d > *outer {
                    return false;
                }
                let mut angle = (p.x - center.x).atan2(center.y - p.y);
                if angle < 0.0 {
                    angle += TAU;
                }
                angle >= *start && angle <= *end
            }
            Shape::Text { .. } => false,
        }
    }
}

fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_sq();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Outline as a `geo` polygon; the ring is closed on construction
fn to_geo(points: &[Pos2]) -> geo::Polygon<f64> {
    let ring: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    geo::Polygon::new(ring.into(), Vec::new())
}

/// A shape and its tooltip
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub shape: Shape,
    pub hover: Option<String>,
}

impl Item {
    pub fn new(shape: Shape) -> Self {
        Self { shape, hover: None }
    }

    pub fn with_hover(shape: Shape, hover: impl Into<String>) -> Self {
        Self {
            shape,
            hover: Some(hover.into()),
        }
    }
}

/// Everything one redraw produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Zoomable marks
    pub content: Vec<Item>,
    /// Fixed marks: legend, titles. Zoom-dependent axes come from the view.
    pub chrome: Vec<Item>,
    /// Sizes scale with zoom (pie, map) instead of only positions (line)
    pub geometric: bool,
    /// Merge every hoverable dot within this radius into one tooltip
    pub merge_radius: Option<f32>,
    /// Message replacing the chart, e.g. when nothing matches the filters
    pub placeholder: Option<String>,
    /// Aggregated (label, value) rows behind the chart
    pub table: Vec<(String, String)>,
}

impl Scene {
    pub fn placeholder(message: impl Into<String>) -> Self {
        Self {
            placeholder: Some(message.into()),
            ..Self::default()
        }
    }

    /// Tooltip sections for a plot-local pointer position
    pub fn hit_test(&self, pointer: Pos2, t: &ZoomTransform) -> Vec<String> {
        if self.placeholder.is_some() {
            return Vec::new();
        }

        if let Some(radius) = self.merge_radius {
            let merged: Vec<String> = self
                .content
                .iter()
                .filter_map(|item| match (&item.shape, &item.hover) {
                    (Shape::Circle { center, .. }, Some(text))
                        if t.apply(*center).distance(pointer) <= radius =>
                    {
                        Some(text.clone())
                    }
                    _ => None,
                })
                .collect();
            if !merged.is_empty() {
                return merged;
            }
        }

        // Geometric zoom is affine on the whole shape, so the pointer can be
        // mapped back instead of transforming every shape
        let local = t.invert(pointer);
        let hit = |shape: &Shape| {
            if self.geometric {
                shape.contains(local)
            } else {
                shape.transformed(t, false).contains(pointer)
            }
        };

        // Topmost shape wins
        self.content
            .iter()
            .rev()
            .filter(|item| item.hover.is_some())
            .find(|item| hit(&item.shape))
            .and_then(|item| item.hover.clone())
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn dot(x: f32, y: f32, hover: &str) -> Item {
        Item::with_hover(
            Shape::Circle {
                center: pos2(x, y),
                radius: 6.0,
                fill: Color32::RED,
                stroke: Stroke::NONE,
            },
            hover,
        )
    }

    #[test]
    fn test_merged_tooltips_within_radius() {
        let scene = Scene {
            content: vec![dot(100.0, 100.0, "Radar 2019"), dot(104.0, 103.0, "Camera 2019"), dot(200.0, 100.0, "far")],
            merge_radius: Some(8.0),
            ..Scene::default()
        };
        let hits = scene.hit_test(pos2(101.0, 101.0), &ZoomTransform::IDENTITY);
        assert_eq!(hits, vec!["Radar 2019", "Camera 2019"]);
        assert!(scene.hit_test(pos2(150.0, 150.0), &ZoomTransform::IDENTITY).is_empty());
    }

    #[test]
    fn test_hit_test_follows_zoom() {
        let scene = Scene {
            content: vec![Item::with_hover(
                Shape::Rect {
                    rect: Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0)),
                    fill: Color32::BLUE,
                    stroke: Stroke::NONE,
                },
                "bar",
            )],
            ..Scene::default()
        };
        let t = ZoomTransform { k: 2.0, x: 0.0, y: 0.0 };
        assert_eq!(scene.hit_test(pos2(15.0, 15.0), &t), vec!["bar"]);
        assert!(scene.hit_test(pos2(15.0, 15.0), &ZoomTransform::IDENTITY).is_empty());
    }

    #[test]
    fn test_wedge_contains() {
        let wedge = Shape::Wedge {
            center: pos2(0.0, 0.0),
            inner: 0.0,
            outer: 10.0,
            start: 0.0,
            end: TAU / 4.0,
            fill: Color32::GREEN,
            stroke: Stroke::NONE,
        };
        // 1:30 o'clock is inside the first quarter
        assert!(wedge.contains(pos2(3.0, -3.0)));
        assert!(!wedge.contains(pos2(-3.0, -3.0)));
        assert!(!wedge.contains(pos2(30.0, 0.0)));
    }

    fn l_shape() -> Vec<Pos2> {
        vec![
            pos2(0.0, 0.0),
            pos2(10.0, 0.0),
            pos2(10.0, 4.0),
            pos2(4.0, 4.0),
            pos2(4.0, 10.0),
            pos2(0.0, 10.0),
        ]
    }

    #[test]
    fn test_concave_polygon() {
        let shape = Shape::polygon(l_shape(), Color32::BLUE, Stroke::NONE);
        assert!(shape.contains(pos2(2.0, 8.0)));
        assert!(!shape.contains(pos2(8.0, 8.0)));
        assert!(!Shape::polygon(vec![pos2(0.0, 0.0), pos2(5.0, 5.0)], Color32::BLUE, Stroke::NONE)
            .contains(pos2(2.0, 2.0)));
    }

    #[test]
    fn test_geometric_hit_test_maps_pointer_back() {
        let scene = Scene {
            content: vec![
                Item::with_hover(Shape::polygon(l_shape(), Color32::BLUE, Stroke::NONE), "west"),
                dot(30.0, 5.0, "town"),
            ],
            geometric: true,
            ..Scene::default()
        };
        let t = ZoomTransform { k: 2.0, x: 10.0, y: -5.0 };
        // (2, 8) in the notch's arm lands on (14, 11) on screen
        assert_eq!(scene.hit_test(pos2(14.0, 11.0), &t), vec!["west"]);
        // (8, 8) lies in the notch
        assert!(scene.hit_test(pos2(26.0, 11.0), &t).is_empty());
        // Dot radius scales with k: 10px on screen is 5 units away
        assert_eq!(scene.hit_test(pos2(70.0, 15.0), &t), vec!["town"]);
        for pointer in [pos2(14.0, 11.0), pos2(26.0, 11.0), pos2(70.0, 15.0)] {
            let by_clone = scene
                .content
                .iter()
                .rev()
                .filter(|item| item.shape.transformed(&t, true).contains(pointer))
                .find_map(|item| item.hover.clone());
            assert_eq!(scene.hit_test(pointer, &t), by_clone.into_iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_placeholder_has_no_hits() {
        let mut scene = Scene::placeholder("No data available");
        scene.content.push(dot(0.0, 0.0, "x"));
        assert!(scene.hit_test(pos2(0.0, 0.0), &ZoomTransform::IDENTITY).is_empty());
    }

    #[test]
    fn test_polar_clockwise_from_top() {
        let p = polar(pos2(0.0, 0.0), 10.0, TAU / 4.0);
        assert!((p.x - 10.0).abs() < 1e-4 && p.y.abs() < 1e-4);
    }
}

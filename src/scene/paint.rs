//! Painting scenes with the egui painter

use egui::epaint::Mesh;
use egui::{Color32, FontId, Painter, Pos2, Rect, Stroke, StrokeKind};
use geo::TriangulateEarcut;

use super::{polar, Item, Scene, Shape};
use crate::constants::plot::ARC_SEGMENTS_PER_RADIAN;
use crate::state::ZoomTransform;

/// Paint a scene into `plot_rect`. Content is clipped to the plot area and
/// drawn through `t`; chrome and `axes` are drawn unzoomed.
pub fn paint_scene(
    painter: &Painter,
    plot_rect: Rect,
    scene: &Scene,
    t: &ZoomTransform,
    axes: &[Item],
    text_color: Color32,
) {
    profiling::scope!("paint_scene");

    if let Some(message) = &scene.placeholder {
        painter.text(
            plot_rect.center(),
            egui::Align2::CENTER_CENTER,
            message,
            FontId::proportional(16.0),
            text_color,
        );
        return;
    }

    let origin = plot_rect.min.to_vec2();
    let to_screen = ZoomTransform {
        k: t.k,
        x: t.x + origin.x,
        y: t.y + origin.y,
    };
    let fixed = ZoomTransform {
        k: 1.0,
        x: origin.x,
        y: origin.y,
    };

    let clipped = painter.with_clip_rect(plot_rect.intersect(painter.clip_rect()));
    for item in &scene.content {
        paint_shape(&clipped, &item.shape.transformed(&to_screen, scene.geometric));
    }
    for item in axes.iter().chain(&scene.chrome) {
        paint_shape(painter, &item.shape.transformed(&fixed, false));
    }
}

/// Paint one shape already in screen coordinates
pub fn paint_shape(painter: &Painter, shape: &Shape) {
    match shape {
        Shape::Rect { rect, fill, stroke } => {
            painter.rect(*rect, 0.0, *fill, *stroke, StrokeKind::Inside);
        }
        Shape::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            painter.circle(*center, *radius, *fill, *stroke);
        }
        Shape::Line { from, to, stroke } => {
            painter.line_segment([*from, *to], *stroke);
        }
        Shape::Polyline { points, stroke } => {
            if points.len() >= 2 {
                painter.add(egui::Shape::line(points.clone(), *stroke));
            }
        }
        Shape::Polygon {
            points,
            triangles,
            fill,
            stroke,
        } => {
            painter.add(fill_mesh(points, triangles, *fill));
            if stroke.width > 0.0 {
                painter.add(egui::Shape::closed_line(points.clone(), *stroke));
            }
        }
        Shape::Wedge {
            center,
            inner,
            outer,
            start,
            end,
            fill,
            stroke,
        } => {
            let (points, triangles) = wedge_mesh(*center, *inner, *outer, *start, *end);
            painter.add(fill_mesh(&points, &triangles, *fill));
            if stroke.width > 0.0 {
                painter.add(egui::Shape::closed_line(points, *stroke));
            }
        }
        Shape::Text {
            pos,
            text,
            anchor,
            size,
            color,
        } => {
            painter.text(*pos, *anchor, text, FontId::proportional(*size), *color);
        }
    }
}

fn fill_mesh(points: &[Pos2], triangles: &[[u32; 3]], fill: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    for p in points {
        mesh.colored_vertex(*p, fill);
    }
    for [a, b, c] in triangles {
        mesh.add_triangle(*a, *b, *c);
    }
    mesh
}

/// Outline of an annular sector: outer arc forward, inner arc back
pub fn wedge_outline(center: Pos2, inner: f32, outer: f32, start: f32, end: f32) -> Vec<Pos2> {
    let sweep = (end - start).max(0.0);
    let segments = ((sweep * ARC_SEGMENTS_PER_RADIAN).ceil() as usize).max(1);
    let arc = |r: f32| {
        (0..=segments).map(move |i| polar(center, r, start + sweep * i as f32 / segments as f32))
    };

    let mut points: Vec<Pos2> = arc(outer).collect();
    if inner > 0.0 {
        let back: Vec<Pos2> = arc(inner).collect();
        points.extend(back.into_iter().rev());
    } else {
        points.push(center);
    }
    points
}

/// Outline plus strip/fan triangles of a wedge
fn wedge_mesh(center: Pos2, inner: f32, outer: f32, start: f32, end: f32) -> (Vec<Pos2>, Vec<[u32; 3]>) {
    let points = wedge_outline(center, inner, outer, start, end);
    let mut triangles = Vec::new();
    if inner > 0.0 {
        // outer arc 0..=n, inner arc reversed n+1..2n+1
        let n = points.len() / 2;
        for i in 0..n - 1 {
            let o0 = i as u32;
            let o1 = (i + 1) as u32;
            let i0 = (points.len() - 1 - i) as u32;
            let i1 = (points.len() - 2 - i) as u32;
            triangles.push([o0, o1, i0]);
            triangles.push([o1, i1, i0]);
        }
    } else {
        let c = (points.len() - 1) as u32;
        for i in 0..c.saturating_sub(1) {
            triangles.push([c, i, i + 1]);
        }
    }
    (points, triangles)
}

/// Ear-cut triangulation of a simple polygon outline, as indices into `points`
pub fn triangulate(points: &[Pos2]) -> Vec<[u32; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let raw = super::to_geo(points).earcut_triangles_raw();
    // geo may append a closing vertex; it coincides with the first point
    raw.triangle_indices
        .chunks_exact(3)
        .map(|tri| [(tri[0] % n) as u32, (tri[1] % n) as u32, (tri[2] % n) as u32])
        .collect()
}

/// Stroke drawn around map regions and bars
pub fn outline(color: Color32) -> Stroke {
    Stroke::new(0.5, color)
}

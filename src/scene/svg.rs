//! SVG export of the current scene

use egui::{Align, Color32, Pos2, Rect, Stroke};
use std::fmt::Write as _;
use std::path::Path;

use super::paint::wedge_outline;
use super::{Item, Scene, Shape};
use crate::error::Result;
use crate::state::ZoomTransform;

/// Serialize a scene as a standalone SVG document.
///
/// `canvas` is the full chart area and `plot_rect` the plot inside it, both
/// in screen coordinates; the document origin is `canvas.min`.
pub fn render(scene: &Scene, axes: &[Item], canvas: Rect, plot_rect: Rect, t: &ZoomTransform) -> String {
    profiling::scope!("svg::render");

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        canvas.width(),
        canvas.height(),
        canvas.width(),
        canvas.height()
    );
    let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#);

    let origin = plot_rect.min - canvas.min;
    if let Some(message) = &scene.placeholder {
        let c = plot_rect.center() - canvas.min.to_vec2();
        let _ = writeln!(
            out,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16" font-family="sans-serif">{}</text>"#,
            c.x,
            c.y,
            escape(message)
        );
    } else {
        let to_doc = ZoomTransform {
            k: t.k,
            x: t.x + origin.x,
            y: t.y + origin.y,
        };
        let fixed = ZoomTransform {
            k: 1.0,
            x: origin.x,
            y: origin.y,
        };
        let _ = writeln!(
            out,
            r#"<clipPath id="plot"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/></clipPath>"#,
            origin.x,
            origin.y,
            plot_rect.width(),
            plot_rect.height()
        );
        let _ = writeln!(out, r#"<g clip-path="url(#plot)">"#);
        for item in &scene.content {
            write_shape(&mut out, &item.shape.transformed(&to_doc, scene.geometric));
        }
        let _ = writeln!(out, "</g>");
        for item in axes.iter().chain(&scene.chrome) {
            write_shape(&mut out, &item.shape.transformed(&fixed, false));
        }
    }

    out.push_str("</svg>\n");
    out
}

/// Render and write to `path`
pub fn export(
    path: &Path,
    scene: &Scene,
    axes: &[Item],
    canvas: Rect,
    plot_rect: Rect,
    t: &ZoomTransform,
) -> Result<()> {
    std::fs::write(path, render(scene, axes, canvas, plot_rect, t))?;
    tracing::info!(path = %path.display(), "exported chart");
    Ok(())
}

fn write_shape(out: &mut String, shape: &Shape) {
    let _ = match shape {
        Shape::Rect { rect, fill, stroke } => writeln!(
            out,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" {}/>"#,
            rect.min.x,
            rect.min.y,
            rect.width(),
            rect.height(),
            paint_attrs(*fill, *stroke)
        ),
        Shape::Circle {
            center,
            radius,
            fill,
            stroke,
        } => writeln!(
            out,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
            center.x,
            center.y,
            radius,
            paint_attrs(*fill, *stroke)
        ),
        Shape::Line { from, to, stroke } => writeln!(
            out,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {}/>"#,
            from.x,
            from.y,
            to.x,
            to.y,
            paint_attrs(Color32::TRANSPARENT, *stroke)
        ),
        Shape::Polyline { points, stroke } => writeln!(
            out,
            r#"<polyline points="{}" {}/>"#,
            point_list(points),
            paint_attrs(Color32::TRANSPARENT, *stroke)
        ),
        Shape::Polygon {
            points,
            fill,
            stroke,
            ..
        } => writeln!(
            out,
            r#"<polygon points="{}" {}/>"#,
            point_list(points),
            paint_attrs(*fill, *stroke)
        ),
        Shape::Wedge {
            center,
            inner,
            outer,
            start,
            end,
            fill,
            stroke,
        } => writeln!(
            out,
            r#"<polygon points="{}" {}/>"#,
            point_list(&wedge_outline(*center, *inner, *outer, *start, *end)),
            paint_attrs(*fill, *stroke)
        ),
        Shape::Text {
            pos,
            text,
            anchor,
            size,
            color,
        } => {
            let text_anchor = match anchor.x() {
                Align::Min => "start",
                Align::Center => "middle",
                Align::Max => "end",
            };
            let baseline = match anchor.y() {
                Align::Min => "hanging",
                Align::Center => "middle",
                Align::Max => "alphabetic",
            };
            writeln!(
                out,
                r#"<text x="{:.2}" y="{:.2}" font-size="{:.1}" font-family="sans-serif" text-anchor="{}" dominant-baseline="{}" fill="{}">{}</text>"#,
                pos.x,
                pos.y,
                size,
                text_anchor,
                baseline,
                rgb(*color),
                escape(text)
            )
        }
    };
}

fn point_list(points: &[Pos2]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn rgb(c: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r(), c.g(), c.b())
}

fn paint_attrs(fill: Color32, stroke: Stroke) -> String {
    let fill = if fill.a() == 0 {
        r#"fill="none""#.to_string()
    } else {
        format!(
            r#"fill="{}" fill-opacity="{:.3}""#,
            rgb(fill),
            fill.a() as f32 / 255.0
        )
    };
    if stroke.width > 0.0 && stroke.color.a() > 0 {
        format!(
            r#"{} stroke="{}" stroke-width="{:.2}""#,
            fill,
            rgb(stroke.color),
            stroke.width
        )
    } else {
        fill
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Align2};

    fn canvas() -> (Rect, Rect) {
        let canvas = Rect::from_min_max(pos2(100.0, 50.0), pos2(500.0, 350.0));
        let plot = Rect::from_min_max(pos2(140.0, 70.0), pos2(480.0, 310.0));
        (canvas, plot)
    }

    #[test]
    fn test_render_shapes() {
        let scene = Scene {
            content: vec![Item::new(Shape::Rect {
                rect: Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 20.0)),
                fill: Color32::from_rgb(31, 119, 180),
                stroke: Stroke::NONE,
            })],
            chrome: vec![Item::new(Shape::Text {
                pos: pos2(0.0, -5.0),
                text: "A & B".into(),
                anchor: Align2::CENTER_BOTTOM,
                size: 12.0,
                color: Color32::BLACK,
            })],
            ..Scene::default()
        };
        let (canvas, plot) = canvas();
        let svg = render(&scene, &[], canvas, plot, &ZoomTransform::IDENTITY);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r##"<rect x="40.00" y="20.00" width="10.00" height="20.00" fill="#1f77b4""##));
        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_render_placeholder() {
        let (canvas, plot) = canvas();
        let svg = render(&Scene::placeholder("No data available"), &[], canvas, plot, &ZoomTransform::IDENTITY);
        assert!(svg.contains("No data available"));
        assert!(!svg.contains("clipPath"));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let (canvas, plot) = canvas();
        export(&path, &Scene::default(), &[], canvas, plot, &ZoomTransform::IDENTITY).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }
}

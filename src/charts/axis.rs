//! Axis lines, tick marks and labels as scene items

use egui::{pos2, Align2, Color32, Stroke};

use crate::pipeline::{BandScale, LinearScale};
use crate::scene::{Item, Shape};

const TICK_LEN: f32 = 6.0;
const LABEL_SIZE: f32 = 11.0;

/// A labelled position along an axis, in plot-local pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub pos: f32,
    pub label: String,
}

/// Round-valued ticks of a linear scale
pub fn linear_ticks(scale: &LinearScale, count: usize, label: impl Fn(f64) -> String) -> Vec<Tick> {
    scale
        .ticks(count)
        .into_iter()
        .map(|v| Tick {
            pos: scale.map(v),
            label: label(v),
        })
        .collect()
}

/// Integer-only ticks, for year axes
pub fn year_ticks(scale: &LinearScale, count: usize) -> Vec<Tick> {
    scale
        .ticks(count)
        .into_iter()
        .filter(|v| (v - v.round()).abs() < 1e-6)
        .map(|v| Tick {
            pos: scale.map(v.round()),
            label: format!("{}", v.round() as i64),
        })
        .collect()
}

/// Band centres, moved by a zoom scale `k` and offset along the axis
pub fn band_ticks(band: &BandScale, k: f32, offset: f32) -> Vec<Tick> {
    band.domain
        .iter()
        .enumerate()
        .map(|(i, label)| Tick {
            pos: (band.position(i) + band.bandwidth() / 2.0) * k + offset,
            label: label.clone(),
        })
        .collect()
}

fn within(pos: f32, span: (f32, f32)) -> bool {
    let (lo, hi) = if span.0 <= span.1 { span } else { (span.1, span.0) };
    pos >= lo - 0.5 && pos <= hi + 0.5
}

/// Horizontal axis at height `y` spanning `span` on x
pub fn bottom(ticks: &[Tick], y: f32, span: (f32, f32), ink: Color32) -> Vec<Item> {
    let stroke = Stroke::new(1.0, ink);
    let mut items = vec![Item::new(Shape::Line {
        from: pos2(span.0, y),
        to: pos2(span.1, y),
        stroke,
    })];
    for tick in ticks.iter().filter(|t| within(t.pos, span)) {
        items.push(Item::new(Shape::Line {
            from: pos2(tick.pos, y),
            to: pos2(tick.pos, y + TICK_LEN),
            stroke,
        }));
        items.push(Item::new(Shape::Text {
            pos: pos2(tick.pos, y + TICK_LEN + 2.0),
            text: tick.label.clone(),
            anchor: Align2::CENTER_TOP,
            size: LABEL_SIZE,
            color: ink,
        }));
    }
    items
}

/// Vertical axis at `x` spanning `span` on y
pub fn left(ticks: &[Tick], x: f32, span: (f32, f32), ink: Color32) -> Vec<Item> {
    let stroke = Stroke::new(1.0, ink);
    let mut items = vec![Item::new(Shape::Line {
        from: pos2(x, span.0),
        to: pos2(x, span.1),
        stroke,
    })];
    for tick in ticks.iter().filter(|t| within(t.pos, span)) {
        items.push(Item::new(Shape::Line {
            from: pos2(x - TICK_LEN, tick.pos),
            to: pos2(x, tick.pos),
            stroke,
        }));
        items.push(Item::new(Shape::Text {
            pos: pos2(x - TICK_LEN - 3.0, tick.pos),
            text: tick.label.clone(),
            anchor: Align2::RIGHT_CENTER,
            size: LABEL_SIZE,
            color: ink,
        }));
    }
    items
}

/// Axis caption
pub fn caption(text: &str, pos: egui::Pos2, anchor: Align2, ink: Color32) -> Item {
    Item::new(Shape::Text {
        pos,
        text: text.to_string(),
        anchor,
        size: 12.0,
        color: ink,
    })
}

/// Colour swatch plus label rows, starting at `origin`
pub fn legend(entries: &[(String, Color32)], origin: egui::Pos2, ink: Color32) -> Vec<Item> {
    let mut items = Vec::with_capacity(entries.len() * 2);
    for (i, (label, color)) in entries.iter().enumerate() {
        let y = origin.y + i as f32 * 20.0;
        items.push(Item::new(Shape::Rect {
            rect: egui::Rect::from_min_size(pos2(origin.x, y), egui::vec2(14.0, 14.0)),
            fill: *color,
            stroke: Stroke::NONE,
        }));
        items.push(Item::new(Shape::Text {
            pos: pos2(origin.x + 20.0, y + 7.0),
            text: label.clone(),
            anchor: Align2::LEFT_CENTER,
            size: LABEL_SIZE,
            color: ink,
        }));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[Item]) -> Vec<String> {
        items
            .iter()
            .filter_map(|i| match &i.shape {
                Shape::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_ticks_outside_span_dropped() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 200.0));
        let zoomed = scale.rescale(2.0, -100.0);
        let ticks = linear_ticks(&zoomed, 5, |v| format!("{v}"));
        let items = bottom(&ticks, 300.0, (0.0, 200.0), Color32::BLACK);
        let shown = labels(&items);
        assert!(shown.contains(&"50".to_string()));
        assert!(!shown.contains(&"0".to_string()));
    }

    #[test]
    fn test_year_ticks_are_integers() {
        let scale = LinearScale::new((2019.0, 2020.0), (0.0, 400.0));
        let ticks = year_ticks(&scale, 8);
        let years: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(years, vec!["2019", "2020"]);
    }

    #[test]
    fn test_band_ticks_follow_zoom() {
        let band = BandScale::new(vec!["a".into(), "b".into()], (0.0, 100.0), 0.0);
        let ticks = band_ticks(&band, 2.0, -10.0);
        assert_eq!(ticks[0].pos, 40.0);
        assert_eq!(ticks[1].pos, 140.0);
    }
}

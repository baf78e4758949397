use egui::{pos2, vec2, Align2, Color32, Pos2, Rect, Stroke, Vec2};
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::FRAC_PI_4;

use super::{axis, palette, ChartContext, ChartFrame, ChartView, GeoStatus, Margins, MAP_LOADING, MAP_UNAVAILABLE, NO_DATA};
use crate::config::Unit;
use crate::data::{Field, GeoCollection};
use crate::error::Result;
use crate::pipeline::aggregate::sum_by_field;
use crate::pipeline::format;
use crate::scene::paint::outline;
use crate::scene::{Item, Scene, Shape};

const MARGINS: Margins = Margins::new(20.0, 120.0, 20.0, 20.0);
const LEGEND_STEPS: usize = 10;

/// Regions of a boundary file coloured by summed metric
pub struct ChoroplethChart {
    frame: ChartFrame,
    region: Field,
    region_property: String,
    region_names: BTreeMap<String, String>,
}

impl ChoroplethChart {
    pub fn new(
        region: &str,
        region_property: &str,
        region_names: BTreeMap<String, String>,
        max_scale: f32,
    ) -> Self {
        Self {
            frame: ChartFrame::new(MARGINS, max_scale),
            region: Field::from(region),
            region_property: region_property.to_string(),
            region_names,
        }
    }

    /// Boundary name for a region code, the code itself when unmapped
    fn boundary_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.region_names.get(code).map(String::as_str).unwrap_or(code)
    }
}

/// Web-mercator projection of (longitude, latitude) degrees
fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-85.0, 85.0).to_radians();
    (lon.to_radians(), -(FRAC_PI_4 + lat / 2.0).tan().ln())
}

/// Projection scaled and centred to fill `size`
struct Fit {
    scale: f64,
    offset: (f64, f64),
}

impl Fit {
    fn new(geo: &GeoCollection, size: Vec2) -> Option<Self> {
        let bounds = geo.bounds()?;
        // Latitude grows north, projected y grows south
        let (x0, y1) = mercator(bounds.min().x, bounds.min().y);
        let (x1, y0) = mercator(bounds.max().x, bounds.max().y);
        let (w, h) = (x1 - x0, y1 - y0);
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        let scale = (size.x as f64 / w).min(size.y as f64 / h);
        let offset = (
            (size.x as f64 - w * scale) / 2.0 - x0 * scale,
            (size.y as f64 - h * scale) / 2.0 - y0 * scale,
        );
        Some(Self { scale, offset })
    }

    fn apply(&self, lon: f64, lat: f64) -> Pos2 {
        let (x, y) = mercator(lon, lat);
        pos2(
            (x * self.scale + self.offset.0) as f32,
            (y * self.scale + self.offset.1) as f32,
        )
    }
}

impl ChartView for ChoroplethChart {
    fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut ChartFrame {
        &mut self.frame
    }

    fn build(&mut self, ctx: &ChartContext, size: Vec2) -> Result<Scene> {
        profiling::scope!("ChoroplethChart::build");
        let geo = match ctx.geo {
            GeoStatus::Ready(geo) => geo,
            GeoStatus::Pending => return Ok(Scene::placeholder(MAP_LOADING)),
            GeoStatus::Failed(reason) => {
                tracing::debug!(chart = %ctx.config.id, reason = %reason, "map without boundaries");
                return Ok(Scene::placeholder(MAP_UNAVAILABLE));
            }
        };
        let Some(fit) = Fit::new(geo, size) else {
            return Ok(Scene::placeholder(MAP_UNAVAILABLE));
        };

        let (dataset, records) = ctx.filtered()?;
        if records.is_empty() {
            return Ok(Scene::placeholder(NO_DATA));
        }
        let sums: Vec<(String, f64)> = sum_by_field(dataset, &records, &self.region)
            .into_iter()
            .filter(|(_, v)| *v > 0.0)
            .collect();
        let by_name: HashMap<&str, f64> = sums
            .iter()
            .map(|(code, v)| (self.boundary_name(code), *v))
            .collect();

        let min = sums.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
        let max = sums.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let shade = |v: f64| {
            if max > min {
                palette::viridis((v - min) / (max - min))
            } else {
                palette::viridis(1.0)
            }
        };

        let unit = ctx.config.unit;
        let label = &ctx.config.metric_label;
        let mut scene = Scene {
            geometric: true,
            ..Scene::default()
        };

        for feature in &geo.features {
            let name = feature.property(&self.region_property).unwrap_or("Unknown");
            let (fill, hover) = match by_name.get(name) {
                Some(v) => (shade(*v), format!("{}\n{}: {}", name, label, format::value(*v, unit))),
                None => (palette::NO_DATA, format!("{}\nNo data", name)),
            };
            // Holes are not painted
            for polygon in &feature.geometry {
                let points: Vec<Pos2> = polygon
                    .exterior()
                    .coords()
                    .map(|c| fit.apply(c.x, c.y))
                    .collect();
                scene.content.push(Item::with_hover(
                    Shape::polygon(points, fill, outline(Color32::WHITE)),
                    hover.clone(),
                ));
            }
        }

        for (code, v) in &sums {
            scene.table.push((code.clone(), format::value(*v, unit)));
        }
        if !sums.is_empty() {
            scene.chrome = legend(min, max, unit, pos2(size.x + 20.0, 0.0), ctx.ink);
        }
        Ok(scene)
    }
}

/// Vertical colour ramp, maximum at the top
fn legend(min: f64, max: f64, unit: Unit, origin: Pos2, ink: Color32) -> Vec<Item> {
    let step = vec2(16.0, 14.0);
    let mut items: Vec<Item> = (0..LEGEND_STEPS)
        .map(|i| {
            let t = 1.0 - i as f64 / (LEGEND_STEPS - 1) as f64;
            Item::new(Shape::Rect {
                rect: Rect::from_min_size(origin + vec2(0.0, i as f32 * step.y), step),
                fill: palette::viridis(t),
                stroke: Stroke::NONE,
            })
        })
        .collect();
    let bottom = origin.y + LEGEND_STEPS as f32 * step.y;
    items.push(axis::caption(&format::compact(max, unit), origin + vec2(step.x + 6.0, 0.0), Align2::LEFT_TOP, ink));
    items.push(axis::caption(&format::compact(min, unit), pos2(origin.x + step.x + 6.0, bottom), Align2::LEFT_BOTTOM, ink));
    items
}

#[cfg(test)]
mod tests {
    use super::super::harness::{hovers, Harness};
    use super::*;

    const STATES: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"STATE_NAME": "New South Wales"},
         "geometry": {"type": "Polygon", "coordinates": [[[141,-29],[153,-28],[150,-37],[141,-34],[141,-29]]]}},
        {"type": "Feature", "properties": {"STATE_NAME": "Victoria"},
         "geometry": {"type": "Polygon", "coordinates": [[[141,-34],[150,-37],[141,-39],[141,-34]]]}},
        {"type": "Feature", "properties": {"STATE_NAME": "Queensland"},
         "geometry": {"type": "Polygon", "coordinates": [[[138,-10],[153,-28],[141,-29],[138,-26],[138,-10]]]}}
    ]}"#;

    fn with_map() -> Harness {
        let mut h = Harness::new("map");
        h.geo = GeoStatus::Ready(GeoCollection::from_json(STATES).unwrap());
        h
    }

    fn fill_of(scene: &Scene, hover_prefix: &str) -> Color32 {
        scene
            .content
            .iter()
            .find_map(|i| match (&i.shape, &i.hover) {
                (Shape::Polygon { fill, .. }, Some(h)) if h.starts_with(hover_prefix) => Some(*fill),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_regions_coloured_by_sum() {
        let h = with_map();
        let view = h.draw("map");
        let scene = view.scene();
        assert_eq!(
            hovers(scene),
            vec![
                "New South Wales\nOffences: 8",
                "Victoria\nOffences: 10",
                "Queensland\nNo data",
            ]
        );
        assert_eq!(fill_of(scene, "Victoria"), palette::viridis(1.0));
        assert_eq!(fill_of(scene, "New South Wales"), palette::viridis(0.0));
        // sums of zero are dropped, so Queensland is uncoloured
        assert_eq!(fill_of(scene, "Queensland"), palette::NO_DATA);
    }

    #[test]
    fn test_year_filter_applies() {
        let mut h = with_map();
        h.registry.select_single("map-year-filter", "2021");
        let view = h.draw("map");
        assert_eq!(hovers(view.scene())[0], "New South Wales\nOffences: 3");
        assert_eq!(hovers(view.scene())[1], "Victoria\nNo data");
    }

    #[test]
    fn test_missing_boundaries_degrade() {
        let mut h = Harness::new("map");
        h.geo = GeoStatus::Failed("offline".into());
        let view = h.draw("map");
        assert_eq!(view.scene().placeholder.as_deref(), Some(MAP_UNAVAILABLE));
        assert!(!view.interactive());
    }

    #[test]
    fn test_projection_fits_plot() {
        let h = with_map();
        let view = h.draw("map");
        let size = view.frame().plot_size().unwrap();
        let bounds = Rect::from_min_size(Pos2::ZERO, size).expand(0.5);
        for item in &view.scene().content {
            if let Shape::Polygon { points, .. } = &item.shape {
                assert!(points.iter().all(|p| bounds.contains(*p)));
            }
        }
    }
}

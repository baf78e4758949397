//! Boundary polygons for the choropleth map
//!
//! Only the subset of GeoJSON the map needs is modelled: a feature collection
//! whose features carry a name property and Polygon or MultiPolygon geometry,
//! held as `geo` multipolygons.

use geo::{coord, BoundingRect, LineString, MultiPolygon, Polygon, Rect};
use serde::Deserialize;

use crate::error::{DashError, Result};

/// Where the boundary file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoSource {
    Path(std::path::PathBuf),
    Url(String),
}

impl GeoSource {
    pub fn parse(spec: &str) -> Self {
        if spec.starts_with("http://") || spec.starts_with("https://") {
            GeoSource::Url(spec.to_string())
        } else {
            GeoSource::Path(spec.into())
        }
    }

    /// Fetch and parse the boundary file
    pub fn load(&self) -> Result<GeoCollection> {
        let text = match self {
            GeoSource::Path(path) => std::fs::read_to_string(path)?,
            GeoSource::Url(url) => reqwest::blocking::get(url.as_str())?
                .error_for_status()?
                .text()?,
        };
        GeoCollection::from_json(&text)
    }
}

impl std::fmt::Display for GeoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoSource::Path(p) => write!(f, "{}", p.display()),
            GeoSource::Url(u) => write!(f, "{}", u),
        }
    }
}

#[derive(Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

/// One region: its properties and boundary in (longitude, latitude) degrees
#[derive(Debug, Clone)]
pub struct GeoFeature {
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub geometry: MultiPolygon<f64>,
}

impl GeoFeature {
    /// String value of a property, if present
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}

/// Parsed feature collection
#[derive(Debug, Clone, Default)]
pub struct GeoCollection {
    pub features: Vec<GeoFeature>,
}

impl GeoCollection {
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawCollection = serde_json::from_str(text)?;
        let features: Vec<GeoFeature> = raw
            .features
            .into_iter()
            .filter_map(|f| {
                let polygons: Vec<Polygon<f64>> = match f.geometry? {
                    RawGeometry::Polygon { coordinates } => to_polygon(coordinates).into_iter().collect(),
                    RawGeometry::MultiPolygon { coordinates } => {
                        coordinates.into_iter().filter_map(to_polygon).collect()
                    }
                    RawGeometry::Unsupported => return None,
                };
                Some(GeoFeature {
                    properties: f.properties.unwrap_or_default(),
                    geometry: MultiPolygon::new(polygons),
                })
            })
            .collect();

        if features.is_empty() {
            return Err(DashError::Geo("no polygon features".to_string()));
        }
        Ok(Self { features })
    }

    /// Longitude/latitude bounding box over all features
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                    coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                )
            })
    }
}

/// First ring is the exterior, the rest are holes
fn to_polygon(rings: Vec<Vec<Vec<f64>>>) -> Option<Polygon<f64>> {
    let mut rings = rings.into_iter().map(to_line_string);
    let exterior = rings.next().filter(|ring| ring.0.len() >= 3)?;
    Some(Polygon::new(exterior, rings.collect()))
}

fn to_line_string(coords: Vec<Vec<f64>>) -> LineString<f64> {
    coords
        .into_iter()
        .filter(|c| c.len() >= 2)
        .map(|c| (c[0], c[1]))
        .collect::<Vec<_>>()
        .into()
}

//! Dashboard configuration
//!
//! Which sources to load, which charts exist, and which filters each chart
//! declares. The built-in configuration reproduces the road-safety dashboard;
//! `--config` swaps in a JSON file with the same shape.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::constants::aggregate::BAR_TOP_N;
use crate::constants::zoom::{LINE_MAX_SCALE, MAX_SCALE};
use crate::data::{Field, Schema, SourceSpec};
use crate::error::{DashError, Result};

const BUILTIN: &str = include_str!("../assets/roadwatch.json");

/// How a filter's selection constrains records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterRole {
    /// Keep records whose field is one of the selected values
    #[default]
    Membership,
    /// Keep records whose year is at or after the selected year
    RangeStart,
    /// Keep records whose year is at or before the selected year
    RangeEnd,
}

/// Initial selection of a single-select widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDefault {
    #[default]
    All,
    Min,
    Max,
}

/// Declares one filter widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    /// Unique across every chart
    pub id: String,
    pub label: String,
    pub field: Field,
    /// Dataset the option list is drawn from
    pub dataset: String,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub role: FilterRole,
    #[serde(default)]
    pub default: FilterDefault,
}

/// What an empty multi-select means for a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelection {
    /// Nothing checked restricts nothing
    #[default]
    Unrestricted,
    /// Nothing checked shows nothing
    Nothing,
}

/// How metric values are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    #[default]
    Count,
    Currency,
}

fn default_top_n() -> usize {
    BAR_TOP_N
}

fn default_region_property() -> String {
    "STATE_NAME".to_string()
}

/// Closed set of chart kinds and their aggregation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// One series per category value over years
    Line { series: String },
    /// Horizontal bars of summed metric per joined group key
    Bar {
        group_by: Vec<String>,
        #[serde(default = "default_top_n")]
        top_n: usize,
    },
    /// Share of summed metric per category
    Pie { category: String },
    /// Summed metric per category on radial axes
    Radar { category: String },
    /// Year × category matrix plus a per-year total line
    GroupedBar { category: String },
    /// Summed metric per year inside a start/end year range
    Trend,
    /// Summed metric per region painted on boundary polygons
    Choropleth {
        region: String,
        #[serde(default = "default_region_property")]
        region_property: String,
        /// Region code → boundary name (e.g. `NSW` → `New South Wales`)
        #[serde(default)]
        region_names: BTreeMap<String, String>,
    },
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Line { .. } => "line",
            ChartKind::Bar { .. } => "bar",
            ChartKind::Pie { .. } => "pie",
            ChartKind::Radar { .. } => "radar",
            ChartKind::GroupedBar { .. } => "grouped_bar",
            ChartKind::Trend => "trend",
            ChartKind::Choropleth { .. } => "choropleth",
        }
    }

    /// Upper bound of the zoom scale factor
    pub fn max_scale(&self) -> f32 {
        match self {
            ChartKind::Line { .. } => LINE_MAX_SCALE,
            _ => MAX_SCALE,
        }
    }

    /// Category fields the aggregation reads
    pub fn category_fields(&self) -> Vec<&str> {
        match self {
            ChartKind::Line { series } => vec![series.as_str()],
            ChartKind::Bar { group_by, .. } => group_by.iter().map(String::as_str).collect(),
            ChartKind::Pie { category }
            | ChartKind::Radar { category }
            | ChartKind::GroupedBar { category } => vec![category.as_str()],
            ChartKind::Trend => vec![],
            ChartKind::Choropleth { region, .. } => vec![region.as_str()],
        }
    }

    /// Whether aggregation groups by year
    pub fn needs_year(&self) -> bool {
        matches!(
            self,
            ChartKind::Line { .. } | ChartKind::GroupedBar { .. } | ChartKind::Trend
        )
    }
}

fn default_metric_label() -> String {
    "Value".to_string()
}

/// One chart section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub id: String,
    pub title: String,
    /// Dataset whose records the chart aggregates
    pub dataset: String,
    pub kind: ChartKind,
    #[serde(default)]
    pub filters: Vec<FilterDescriptor>,
    #[serde(default)]
    pub empty_selection: EmptySelection,
    #[serde(default = "default_metric_label")]
    pub metric_label: String,
    #[serde(default)]
    pub unit: Unit,
}

fn default_title() -> String {
    "Road Safety Dashboard".to_string()
}

/// Complete dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,
    pub sources: Vec<SourceSpec>,
    pub charts: Vec<ChartConfig>,
    /// Boundary file path or URL for choropleth charts
    #[serde(default)]
    pub geo: Option<String>,
    /// Chart shown once data is ready; the first chart when absent
    #[serde(default)]
    pub default_chart: Option<String>,
    /// Chart ids bound to digit keys 1..=9, in order
    #[serde(default)]
    pub shortcuts: Vec<String>,
}

impl DashboardConfig {
    /// Configuration compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), charts = config.charts.len(), "loaded configuration");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn chart(&self, id: &str) -> Option<&ChartConfig> {
        self.charts.iter().find(|c| c.id == id)
    }

    pub fn source(&self, name: &str) -> Option<&SourceSpec> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Chart activated when data becomes ready
    pub fn initial_chart(&self) -> Option<&str> {
        self.default_chart
            .as_deref()
            .or_else(|| self.charts.first().map(|c| c.id.as_str()))
    }

    /// Reject configurations that would fail at redraw time
    pub fn validate(&self) -> Result<()> {
        let mut source_names = HashSet::new();
        for source in &self.sources {
            if !source_names.insert(source.name.as_str()) {
                return Err(config_err(format!("duplicate source '{}'", source.name)));
            }
        }

        if self.charts.is_empty() {
            return Err(config_err("no charts configured"));
        }

        let mut chart_ids = HashSet::new();
        let mut filter_ids = HashSet::new();
        for chart in &self.charts {
            if !chart_ids.insert(chart.id.as_str()) {
                return Err(config_err(format!("duplicate chart '{}'", chart.id)));
            }

            let schema = self.schema_of(&chart.dataset, &chart.id)?;
            for field in chart.kind.category_fields() {
                if schema.category_index(field).is_none() {
                    return Err(config_err(format!(
                        "chart '{}' groups by '{}' which dataset '{}' does not have",
                        chart.id, field, chart.dataset
                    )));
                }
            }
            if chart.kind.needs_year() && schema.year_column.is_none() {
                return Err(config_err(format!(
                    "{} chart '{}' needs a year column in '{}'",
                    chart.kind.name(),
                    chart.id,
                    chart.dataset
                )));
            }

            for filter in &chart.filters {
                if !filter_ids.insert(filter.id.as_str()) {
                    return Err(config_err(format!("duplicate filter id '{}'", filter.id)));
                }
                self.validate_filter(chart, filter, schema)?;
            }
        }

        if let Some(id) = &self.default_chart {
            if !chart_ids.contains(id.as_str()) {
                return Err(config_err(format!("default chart '{}' is not configured", id)));
            }
        }

        if self.shortcuts.len() > 9 {
            return Err(config_err("at most 9 shortcuts are supported"));
        }
        for id in &self.shortcuts {
            if !chart_ids.contains(id.as_str()) {
                return Err(config_err(format!("shortcut chart '{}' is not configured", id)));
            }
        }

        Ok(())
    }

    fn validate_filter(
        &self,
        chart: &ChartConfig,
        filter: &FilterDescriptor,
        chart_schema: &Schema,
    ) -> Result<()> {
        let options = self.schema_of(&filter.dataset, &filter.id)?;
        if !options.has_field(&filter.field) {
            return Err(config_err(format!(
                "filter '{}' reads '{}' which dataset '{}' does not have",
                filter.id, filter.field, filter.dataset
            )));
        }
        if !chart_schema.has_field(&filter.field) {
            return Err(config_err(format!(
                "filter '{}' reads '{}' which chart '{}' cannot filter on",
                filter.id, filter.field, chart.id
            )));
        }

        if filter.role != FilterRole::Membership {
            if filter.multiple || filter.field != Field::Year {
                return Err(config_err(format!(
                    "range filter '{}' must be a single-select year filter",
                    filter.id
                )));
            }
        }
        if filter.multiple && filter.default != FilterDefault::All {
            return Err(config_err(format!(
                "multi-select filter '{}' can only default to all",
                filter.id
            )));
        }
        Ok(())
    }

    fn schema_of(&self, dataset: &str, owner: &str) -> Result<&Schema> {
        self.source(dataset)
            .map(|s| &s.schema)
            .ok_or_else(|| config_err(format!("'{}' refers to unknown dataset '{}'", owner, dataset)))
    }
}

fn config_err(msg: impl Into<String>) -> DashError {
    DashError::Config(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn minimal() -> serde_json::Value {
        serde_json::json!({
            "sources": [{
                "name": "detection",
                "file": "Detection_method_trend.csv",
                "year_column": "YEAR",
                "categories": [{"field": "method", "column": "DETECTION_METHOD"}],
                "metric": "Count*(OffenceNo)"
            }],
            "charts": [{
                "id": "detection",
                "title": "Detection Methods",
                "dataset": "detection",
                "kind": {"type": "line", "series": "method"},
                "filters": [
                    {"id": "detection-year-filter", "label": "Filter by Year", "field": "year",
                     "dataset": "detection", "multiple": true},
                    {"id": "detection-method-filter", "label": "Filter by Method", "field": "method",
                     "dataset": "detection", "multiple": true}
                ]
            }]
        })
    }

    fn parse(value: serde_json::Value) -> Result<DashboardConfig> {
        DashboardConfig::from_json(&value.to_string())
    }

    #[test]
    fn test_builtin_config_is_valid() {
        let config = DashboardConfig::builtin().unwrap();
        assert_eq!(config.initial_chart(), Some("detection"));
        assert_eq!(config.shortcuts, vec!["detection", "fines", "age", "jurisdiction"]);

        let kinds: Vec<&str> = config.charts.iter().map(|c| c.kind.name()).collect();
        for kind in ["line", "bar", "pie", "radar", "grouped_bar", "trend", "choropleth"] {
            assert!(kinds.contains(&kind), "missing {kind}");
        }

        let fines = config.chart("fines").unwrap();
        assert_eq!(fines.filters[0].role, FilterRole::RangeStart);
        assert_eq!(fines.filters[1].default, FilterDefault::Max);
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = parse(minimal()).unwrap();
        let chart = config.chart("detection").unwrap();
        assert_eq!(chart.empty_selection, EmptySelection::Unrestricted);
        assert_eq!(chart.metric_label, "Value");
        assert_eq!(chart.filters[0].field, Field::Year);
        assert_eq!(chart.filters[0].role, FilterRole::Membership);
        assert_eq!(chart.kind.max_scale(), LINE_MAX_SCALE);
        assert_eq!(config.title, "Road Safety Dashboard");
    }

    #[test]
    fn test_duplicate_filter_ids_rejected() {
        let mut value = minimal();
        value["charts"][0]["filters"][1]["id"] = "detection-year-filter".into();
        let err = parse(value).unwrap_err();
        assert!(matches!(err, DashError::Config(ref m) if m.contains("duplicate filter id")));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut value = minimal();
        value["charts"][0]["filters"][1]["field"] = "location".into();
        assert!(matches!(parse(value), Err(DashError::Config(_))));

        let mut value = minimal();
        value["charts"][0]["kind"]["series"] = "location".into();
        assert!(matches!(parse(value), Err(DashError::Config(_))));
    }

    #[test]
    fn test_unknown_dataset_and_shortcut_rejected() {
        let mut value = minimal();
        value["charts"][0]["dataset"] = "nope".into();
        assert!(matches!(parse(value), Err(DashError::Config(_))));

        let mut value = minimal();
        value["shortcuts"] = serde_json::json!(["detection", "age"]);
        assert!(matches!(parse(value), Err(DashError::Config(ref m)) if m.contains("'age'")));
    }

    #[test]
    fn test_range_filter_must_be_single_year() {
        let mut value = minimal();
        value["charts"][0]["filters"][1]["role"] = "range_start".into();
        assert!(matches!(parse(value), Err(DashError::Config(_))));
    }

    #[test]
    fn test_bar_top_n_default() {
        let kind: ChartKind =
            serde_json::from_str(r#"{"type": "bar", "group_by": ["jurisdiction"]}"#).unwrap();
        assert_eq!(
            kind,
            ChartKind::Bar {
                group_by: vec!["jurisdiction".into()],
                top_n: BAR_TOP_N
            }
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(minimal().to_string().as_bytes()).unwrap();
        file.flush().unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.charts.len(), 1);
    }
}

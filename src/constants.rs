//! Application-wide constants and default values
//!
//! This module centralizes all magic numbers and default values used throughout
//! the application, making them easier to maintain and configure.

/// Redraw scheduling
pub mod timing {
    use std::time::Duration;

    /// Delay before a filter change triggers a redraw
    pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(60);

    /// Delay before a resize triggers a redraw (coalesces window drags)
    pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

    /// Retry interval while the chart container has no usable size
    pub const GEOMETRY_RETRY: Duration = Duration::from_millis(100);

    /// Duration of the animated return to the identity transform
    pub const ZOOM_RESET: Duration = Duration::from_millis(750);
}

/// Aggregation defaults
pub mod aggregate {
    /// Number of groups kept by the bar chart
    pub const BAR_TOP_N: usize = 20;

    /// Number of concentric rings on the radar chart
    pub const RADAR_LEVELS: usize = 5;

    /// Pie slices at or below this percentage get no label
    pub const PIE_LABEL_MIN_PCT: f64 = 5.0;

    /// Target tick count for linear axes
    pub const AXIS_TICKS: usize = 8;
}

/// Pan/zoom limits
pub mod zoom {
    /// Default maximum scale factor
    pub const MAX_SCALE: f32 = 8.0;

    /// Line chart allows a deeper zoom
    pub const LINE_MAX_SCALE: f32 = 10.0;

    /// Scale multiplier per scroll point
    pub const WHEEL_SENSITIVITY: f32 = 0.002;
}

/// Chart geometry
pub mod plot {
    /// Hover radius for merged line-chart tooltips (pixels)
    pub const HOVER_RADIUS: f32 = 8.0;

    /// Dot radius on line charts
    pub const DOT_RADIUS: f32 = 6.0;

    /// Chart canvas is clamped between these sizes
    pub const MIN_WIDTH: f32 = 600.0;
    pub const MIN_HEIGHT: f32 = 400.0;
    pub const MAX_WIDTH: f32 = 1200.0;
    pub const MAX_HEIGHT: f32 = 800.0;

    /// Smallest plot area inside the margins
    pub const MIN_PLOT_WIDTH: f32 = 400.0;
    pub const MIN_PLOT_HEIGHT: f32 = 300.0;

    /// Arc segments per radian when tessellating pie wedges
    pub const ARC_SEGMENTS_PER_RADIAN: f32 = 16.0;
}

/// UI layout defaults
pub mod layout {
    /// Left panel (filters) default width
    pub const FILTER_PANEL_WIDTH: f32 = 240.0;

    /// Right panel (data table) default width
    pub const DATA_PANEL_WIDTH: f32 = 320.0;

    /// Table header row height
    pub const TABLE_HEADER_HEIGHT: f32 = 20.0;

    /// Table body row height
    pub const TABLE_ROW_HEIGHT: f32 = 18.0;
}

/// Sentinel values
pub mod sentinel {
    /// Single-select value meaning "no restriction"
    pub const ALL: &str = "all";

    /// Year assigned to rows whose year cell cannot be parsed
    pub const UNKNOWN_YEAR: i32 = 0;
}

/// Configuration file paths
pub mod config {
    /// Default configuration file name looked up in the working directory
    pub const CONFIG_FILE: &str = "roadwatch.json";

    /// Default data directory for relative CSV paths
    pub const DATA_DIR: &str = "data";

    /// Public boundary file for Australian states
    pub const GEO_URL: &str =
        "https://raw.githubusercontent.com/rowanhogan/australian-states/master/states.geojson";
}

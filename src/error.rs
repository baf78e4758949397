//! Error types for Roadwatch
//!
//! Every fallible operation in the dashboard funnels into [`DashError`] so the
//! UI can render a single banner with a title and a user-facing message.

use thiserror::Error;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashError {
    /// File I/O error
    #[error("Failed to access file: {0}")]
    FileIo(#[from] std::io::Error),

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote resource could not be fetched
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Column not found in a source file
    #[error("Column '{column}' not found in '{source_name}'")]
    ColumnNotFound { source_name: String, column: String },

    /// Dataset name not registered in the store
    #[error("Unknown dataset '{0}'")]
    UnknownDataset(String),

    /// Chart id not registered with the controller
    #[error("Unknown chart '{0}'")]
    UnknownChart(String),

    /// A chart asked for a filter it does not declare
    #[error("Chart '{chart}' read undeclared filter '{filter}'")]
    UndeclaredFilter { chart: String, filter: String },

    /// Store was already populated
    #[error("Data has already been loaded")]
    AlreadyLoaded,

    /// Geographic boundary data is malformed
    #[error("Invalid boundary data: {0}")]
    Geo(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashError>;

/// UI-friendly error message formatting
impl DashError {
    /// Get a user-friendly error message suitable for displaying in UI
    pub fn user_message(&self) -> String {
        match self {
            DashError::FileIo(e) => format!("File error: {}", e),
            DashError::Polars(e) => format!("Data error: {}", e),
            DashError::Json(e) => format!("JSON error: {}", e),
            DashError::Http(e) => format!("Download failed: {}", e),
            DashError::Config(msg) => format!("Config error: {}", msg),
            DashError::ColumnNotFound { source_name, column } => {
                format!("Column '{}' missing from {}", column, source_name)
            }
            DashError::UnknownDataset(name) => format!("No dataset named '{}'", name),
            DashError::UnknownChart(id) => format!("No chart named '{}'", id),
            DashError::UndeclaredFilter { chart, filter } => {
                format!("Filter '{}' is not configured for chart '{}'", filter, chart)
            }
            DashError::AlreadyLoaded => "Data is already loaded".to_string(),
            DashError::Geo(msg) => format!("Map data error: {}", msg),
            DashError::Custom(msg) => msg.clone(),
        }
    }

    /// Get a short title for the error (for the banner)
    pub fn title(&self) -> &'static str {
        match self {
            DashError::FileIo(_) => "File Error",
            DashError::Polars(_) => "Data Error",
            DashError::Json(_) => "JSON Error",
            DashError::Http(_) => "Network Error",
            DashError::Config(_) => "Configuration Error",
            DashError::ColumnNotFound { .. } => "Column Not Found",
            DashError::UnknownDataset(_) => "Unknown Dataset",
            DashError::UnknownChart(_) => "Unknown Chart",
            DashError::UndeclaredFilter { .. } => "Filter Error",
            DashError::AlreadyLoaded => "Already Loaded",
            DashError::Geo(_) => "Map Error",
            DashError::Custom(_) => "Error",
        }
    }
}

//! Application state management
//!
//! Display toggles, load status, filter widget models and pan/zoom state live
//! in small focused modules; the chart pipeline itself is owned by the
//! controller.

mod filters;
mod ui;
mod view;
mod zoom;

pub use filters::{FilterSelection, FilterWidget};
pub use ui::{LoadStatus, UiState};
pub use view::ViewState;
pub use zoom::{ZoomState, ZoomTransform};

/// Window-level state outside the chart pipeline
#[derive(Debug, Default)]
pub struct AppState {
    /// View and visualization state
    pub view: ViewState,

    /// UI interaction state
    pub ui: UiState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

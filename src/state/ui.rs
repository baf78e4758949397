//! Load status and error banner

use chrono::{DateTime, Local};

use crate::data::DataReady;
use crate::error::DashError;

/// Where the background load currently stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready {
        datasets: usize,
        rows: usize,
        at: DateTime<Local>,
    },
    Failed,
}

/// Banner shown above the chart area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub title: String,
    pub message: String,
}

/// Load progress and user-facing messages
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub status: LoadStatus,

    /// Error message to display in UI
    pub banner: Option<Banner>,

    /// Last status-line notice (exports, copies)
    pub notice: Option<String>,
}

impl UiState {
    pub fn on_data_ready(&mut self, ready: &DataReady, at: DateTime<Local>) {
        self.status = LoadStatus::Ready {
            datasets: ready.datasets,
            rows: ready.rows,
            at,
        };
    }

    /// Load failures replace the whole dashboard with one banner
    pub fn on_load_failed(&mut self, error: &DashError) {
        self.status = LoadStatus::Failed;
        self.set_error(error);
    }

    pub fn set_error(&mut self, error: &DashError) {
        self.banner = Some(Banner {
            title: error.title().to_string(),
            message: error.user_message(),
        });
    }

    pub fn clear_error(&mut self) {
        self.banner = None;
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.status, LoadStatus::Ready { .. })
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Status-line text
    pub fn status_text(&self) -> String {
        match &self.status {
            LoadStatus::Loading => "Loading data…".to_string(),
            LoadStatus::Ready { datasets, rows, at } => format!(
                "{} datasets, {} rows, loaded at {}",
                datasets,
                rows,
                at.format("%H:%M:%S")
            ),
            LoadStatus::Failed => "Data failed to load".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_failure_sets_banner() {
        let mut ui = UiState::default();
        assert_eq!(ui.status_text(), "Loading data…");

        ui.on_load_failed(&DashError::Config("bad".into()));
        assert_eq!(ui.status, LoadStatus::Failed);
        let banner = ui.banner.clone().unwrap();
        assert_eq!(banner.title, "Configuration Error");
        assert_eq!(banner.message, "Config error: bad");

        ui.clear_error();
        assert!(ui.banner.is_none());
    }
}

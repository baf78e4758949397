//! Display toggles

/// Theme and panel visibility
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Dark mode theme toggle
    pub dark_mode: bool,

    /// Show keyboard shortcut help
    pub show_help: bool,

    /// Aggregated-rows panel visibility
    pub show_data_table: bool,

    /// Filter panel visibility
    pub show_filters: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_help: false,
            show_data_table: false,
            show_filters: true,
        }
    }
}

impl ViewState {
    /// Toggle dark mode
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_data_table(&mut self) {
        self.show_data_table = !self.show_data_table;
    }
}

mod banner;
mod chart_area;
mod data_table;
mod filter_panel;
mod help_dialog;
mod nav_bar;

pub use banner::{render_banner, render_status_bar};
pub use chart_area::render_chart_area;
pub use data_table::{render_data_table_panel, table_tsv};
pub use filter_panel::render_filter_panel;
pub use help_dialog::render_help_dialog;
pub use nav_bar::render_nav_bar;

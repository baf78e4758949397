//! Reusable UI widgets

mod filter_controls;

pub use filter_controls::{FilterAction, FilterControls};

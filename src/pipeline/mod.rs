//! Pure data transformations between the store and the chart scenes

pub mod aggregate;
pub mod filter;
pub mod format;
pub mod scale;

pub use filter::Constraint;
pub use scale::{BandScale, LinearScale};

pub mod geo;
pub mod record;
pub mod source;
pub mod store;

// Re-export key types for convenience
pub use geo::{GeoCollection, GeoSource};
pub use record::{CategoryColumn, Dataset, Field, Record, Schema};
pub use source::SourceSpec;
pub use store::{DataReady, DataStore};

//! Background loading and redraw timing
//!
//! - Loader thread for CSV sources and the boundary file
//! - Debounced redraw deadlines for filter and resize triggers

mod scheduler;
mod worker;

pub use scheduler::{RedrawScheduler, Trigger};
pub use worker::{BackgroundWorker, WorkerRequest, WorkerResult};

//! Form state tracking
//!
//! - [`forms`]: the reactive form contract and an in-memory form group
//! - [`FormStateRegistry`]: snapshots, change detection, reset and cleanup
//! - [`Signal`] / [`ReadSignal`]: shared reactive cells

pub mod forms;
mod registry;
mod signal;
mod snapshot;

pub use registry::FormStateRegistry;
pub use signal::{ReadSignal, Signal};
pub use snapshot::{FieldSnapshot, FormSnapshot};

//! Cross-instance sync infrastructure module

mod marker_file;
mod noop;

pub use marker_file::{MarkerFileSync, DEFAULT_POLL_INTERVAL, MARKER_FILE};
pub use noop::NoopSync;

//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, logging setup, signal
//! handling, and the one-shot and watch runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod logging;
pub mod presenter;
pub mod signals;
pub mod watch;

// Re-export commonly used types
pub use app::{run_command, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, ListArgs, SendArgs, WatchArgs};
pub use presenter::Presenter;
pub use watch::run_watch;

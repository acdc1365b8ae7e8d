//! Notiflow - notification manager with persistent history
//!
//! This crate keeps a list of notifications in a local store, shows them as
//! native desktop notifications and terminal toasts, tracks read state,
//! and broadcasts changes to subscribers and to other running instances.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Notification records, filters, export snapshots, durations and config
//! - **Application**: The notification manager, listeners, timers and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (JSON store, notify-rust, terminal toasts, etc.)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

//! Configuration domain module

mod app_config;

pub use app_config::{
    AppConfig, SimulateConfig, DEFAULT_NOTIFIER, DEFAULT_RETENTION, DEFAULT_SIMULATE_PROBABILITY,
};

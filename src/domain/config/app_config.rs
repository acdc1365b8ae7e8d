//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::time::Duration;

/// Default number of notifications kept by cleanup
pub const DEFAULT_RETENTION: usize = 100;

/// Default chance that a simulation tick produces a notification
pub const DEFAULT_SIMULATE_PROBABILITY: f64 = 0.2;

/// Default native notification backend
pub const DEFAULT_NOTIFIER: &str = "notify-rust";

/// Simulated activity configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulateConfig {
    pub enabled: Option<bool>,
    pub interval: Option<String>,
    pub probability: Option<f64>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub store_dir: Option<String>,
    pub retention: Option<usize>,
    pub default_duration: Option<String>,
    pub native: Option<bool>,
    pub notifier: Option<String>,
    pub native_timeout: Option<String>,
    pub assume_focused: Option<bool>,
    pub simulate: Option<SimulateConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            store_dir: None,
            retention: Some(DEFAULT_RETENTION),
            default_duration: Some(Duration::default_toast().to_string()),
            native: Some(true),
            notifier: Some(DEFAULT_NOTIFIER.to_string()),
            native_timeout: Some(Duration::default_native_timeout().to_string()),
            assume_focused: Some(false),
            simulate: Some(SimulateConfig {
                enabled: Some(false),
                interval: Some(Duration::default_simulate_interval().to_string()),
                probability: Some(DEFAULT_SIMULATE_PROBABILITY),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            store_dir: other.store_dir.or(self.store_dir),
            retention: other.retention.or(self.retention),
            default_duration: other.default_duration.or(self.default_duration),
            native: other.native.or(self.native),
            notifier: other.notifier.or(self.notifier),
            native_timeout: other.native_timeout.or(self.native_timeout),
            assume_focused: other.assume_focused.or(self.assume_focused),
            simulate: Self::merge_simulate_config(self.simulate, other.simulate),
        }
    }

    /// Merge simulation sections
    fn merge_simulate_config(
        base: Option<SimulateConfig>,
        other: Option<SimulateConfig>,
    ) -> Option<SimulateConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(SimulateConfig {
                enabled: o.enabled.or(b.enabled),
                interval: o.interval.or(b.interval),
                probability: o.probability.or(b.probability),
            }),
        }
    }

    /// Store directory, or `<data dir>/notiflow` if not set
    pub fn store_dir_or_default(&self) -> PathBuf {
        match self.store_dir.as_deref() {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from(".local/share"))
                .join("notiflow"),
        }
    }

    /// Retention cap, or 100 if not set/zero
    pub fn retention_or_default(&self) -> usize {
        self.retention
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_RETENTION)
    }

    /// Default toast duration, or 5s if not set/invalid
    pub fn default_duration_or_default(&self) -> Duration {
        self.default_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_toast)
    }

    /// Get native notification setting, or true if not set
    pub fn native_or_default(&self) -> bool {
        self.native.unwrap_or(true)
    }

    /// Native notification backend name, or "notify-rust" if not set
    pub fn notifier_or_default(&self) -> &str {
        self.notifier.as_deref().unwrap_or(DEFAULT_NOTIFIER)
    }

    /// Native notification lifetime, or 5s if not set/invalid
    pub fn native_timeout_or_default(&self) -> Duration {
        self.native_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_native_timeout)
    }

    /// Get assume-focused setting, or false if not set
    pub fn assume_focused_or_default(&self) -> bool {
        self.assume_focused.unwrap_or(false)
    }

    /// Get simulation setting, or false if not set
    pub fn simulate_or_default(&self) -> bool {
        self.simulate
            .as_ref()
            .and_then(|s| s.enabled)
            .unwrap_or(false)
    }

    /// Simulation interval, or 30s if not set/invalid
    pub fn simulate_interval_or_default(&self) -> Duration {
        self.simulate
            .as_ref()
            .and_then(|s| s.interval.as_ref())
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_simulate_interval)
    }

    /// Simulation probability clamped to [0, 1], or 0.2 if not set
    pub fn simulate_probability_or_default(&self) -> f64 {
        self.simulate
            .as_ref()
            .and_then(|s| s.probability)
            .filter(|p| p.is_finite())
            .map(|p| p.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_SIMULATE_PROBABILITY)
    }
}

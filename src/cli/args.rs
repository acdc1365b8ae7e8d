//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::notification::NotificationKind;

/// Environment variable overriding the store directory
pub const STORE_DIR_ENV: &str = "NOTIFLOW_STORE_DIR";

/// Environment variable supplying the default log filter
pub const LOG_LEVEL_ENV: &str = "NOTIFLOW_LOG";

/// Notiflow - desktop notification manager
#[derive(Parser, Debug)]
#[command(name = "notiflow")]
#[command(version)]
#[command(about = "Create, track and display desktop notifications")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory holding the notification store
    #[arg(long, global = true, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Keep notifications in memory only (nothing is written to disk)
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Log filter (e.g. warn, debug, notiflow=trace). RUST_LOG takes precedence.
    #[arg(long, global = true, value_name = "LEVEL", env = LOG_LEVEL_ENV, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a notification and print its id
    Send(SendArgs),
    /// List notifications, newest first
    List(ListArgs),
    /// Mark a notification as read
    Read {
        /// Notification id
        id: String,
    },
    /// Mark every notification as read
    ReadAll,
    /// Print the number of unread notifications
    Count,
    /// Keep only the newest notifications
    Cleanup,
    /// Export all notifications as JSON
    Export {
        /// Output file (stdout if omitted; a directory gets the default file name)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Show notifications as they arrive until interrupted
    Watch(WatchArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for `send`
#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Notification title
    pub title: String,

    /// Notification body
    pub message: Option<String>,

    /// Notification kind
    #[arg(short, long, value_name = "KIND")]
    pub kind: Option<KindArg>,

    /// Icon name or path (defaults to the kind's icon)
    #[arg(short, long, value_name = "ICON")]
    pub icon: Option<String>,

    /// Keep the native notification on screen until clicked
    #[arg(short, long)]
    pub persistent: bool,

    /// Do not mark as read automatically
    #[arg(long)]
    pub no_auto_close: bool,

    /// Auto-close delay (e.g. 1500ms, 5s, 1m)
    #[arg(short, long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Attach a data entry (repeatable)
    #[arg(long = "data", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub data: Vec<(String, String)>,
}

/// Options for `list`
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only unread notifications
    #[arg(long, conflicts_with = "read")]
    pub unread: bool,

    /// Only read notifications
    #[arg(long)]
    pub read: bool,

    /// Only notifications of this kind
    #[arg(short, long, value_name = "KIND")]
    pub kind: Option<KindArg>,

    /// Maximum number of notifications
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for `watch`
#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Generate simulated activity
    #[arg(long)]
    pub simulate: bool,

    /// Time between simulation rolls (e.g. 30s)
    #[arg(long, value_name = "TIME")]
    pub interval: Option<String>,

    /// Treat the terminal as focused (suppresses native notifications)
    #[arg(long)]
    pub focused: bool,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Notification kind argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Success,
    Error,
    Warning,
    Info,
}

impl From<KindArg> for NotificationKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Success => NotificationKind::Success,
            KindArg::Error => NotificationKind::Error,
            KindArg::Warning => NotificationKind::Warning,
            KindArg::Info => NotificationKind::Info,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "store_dir",
    "retention",
    "default_duration",
    "native",
    "notifier",
    "native_timeout",
    "assume_focused",
    "simulate.enabled",
    "simulate.interval",
    "simulate.probability",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got \"{}\"", s)),
    }
}

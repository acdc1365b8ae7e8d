//! CLI presenter for output formatting

use chrono::Local;
use colored::*;

use crate::domain::notification::{Notification, NotificationKind};

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print one notification per line
    pub fn notification_list(&self, notifications: &[Notification]) {
        if notifications.is_empty() {
            self.info("No notifications");
            return;
        }
        for notification in notifications {
            println!("{}", self.format_notification(notification));
        }
    }

    /// Format a notification for `list`
    pub fn format_notification(&self, notification: &Notification) -> String {
        let marker = if notification.read {
            "○".dimmed()
        } else {
            "●".bold()
        };
        let when = notification
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S");

        let mut line = format!(
            "{} {} {} {:<7} {}",
            marker,
            notification.id.to_string().dimmed(),
            when,
            kind_label(notification.kind),
            notification.title.bold()
        );
        if !notification.message.is_empty() {
            line.push_str(" - ");
            line.push_str(&notification.message);
        }
        line
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_label(kind: NotificationKind) -> ColoredString {
    match kind {
        NotificationKind::Success => kind.as_str().green(),
        NotificationKind::Error => kind.as_str().red(),
        NotificationKind::Warning => kind.as_str().yellow(),
        NotificationKind::Info => kind.as_str().cyan(),
    }
}

//! Terminal toast surface
//!
//! Renders toasts as colored lines on stderr.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Mutex;

use colored::*;

use crate::application::ports::{SurfaceError, ToastSurface};
use crate::domain::notification::{Notification, NotificationId, NotificationKind};

/// Toast surface that writes to the terminal
pub struct TerminalSurface {
    focused: bool,
    /// Titles of toasts currently on screen
    visible: Mutex<HashMap<NotificationId, String>>,
}

impl TerminalSurface {
    /// Create a surface. `focused` is reported by `has_focus`.
    pub fn new(focused: bool) -> Self {
        Self {
            focused,
            visible: Mutex::new(HashMap::new()),
        }
    }

    /// Number of toasts shown and not yet dismissed
    pub fn visible_count(&self) -> usize {
        self.visible.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Format a toast line
    pub fn format_toast(notification: &Notification) -> String {
        let mut line = format!(
            "{} {} {}",
            kind_glyph(notification.kind),
            notification.title.bold(),
            notification.message
        );

        if !notification.actions.is_empty() {
            let actions: Vec<String> = notification
                .actions
                .iter()
                .map(|a| format!("[{}: {}]", a.id, a.label))
                .collect();
            line.push(' ');
            line.push_str(&actions.join(" ").cyan().to_string());
        }

        line.push(' ');
        line.push_str(&format!("({})", short_id(&notification.id)).dimmed().to_string());
        line
    }

    fn write_line(line: &str) -> Result<(), SurfaceError> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{}", line).map_err(|e| SurfaceError::RenderFailed(e.to_string()))
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ToastSurface for TerminalSurface {
    fn show(&self, notification: &Notification) -> Result<(), SurfaceError> {
        Self::write_line(&Self::format_toast(notification))?;
        self.visible
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(notification.id, notification.title.clone());
        Ok(())
    }

    fn dismiss(&self, id: &NotificationId) -> Result<(), SurfaceError> {
        let title = self
            .visible
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id);

        match title {
            Some(title) => Self::write_line(
                &format!("{} {} dismissed", "·".dimmed(), title)
                    .dimmed()
                    .to_string(),
            ),
            None => Ok(()),
        }
    }

    fn has_focus(&self) -> bool {
        self.focused
    }
}

fn kind_glyph(kind: NotificationKind) -> ColoredString {
    match kind {
        NotificationKind::Success => "✓".green(),
        NotificationKind::Error => "✗".red(),
        NotificationKind::Warning => "⚠".yellow(),
        NotificationKind::Info => "ℹ".cyan(),
    }
}

fn short_id(id: &NotificationId) -> String {
    id.to_string().chars().take(8).collect()
}

//! Export snapshot value object

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::Notification;

/// Point-in-time dump of the notification list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub notifications: Vec<Notification>,
    pub exported_at: DateTime<Utc>,
    pub total: usize,
    pub unread: usize,
}

impl ExportSnapshot {
    pub fn new(notifications: Vec<Notification>) -> Self {
        let total = notifications.len();
        let unread = notifications.iter().filter(|n| !n.read).count();
        Self {
            notifications,
            exported_at: Utc::now(),
            total,
            unread,
        }
    }

    /// Suggested file name, e.g. `notifications_export_2024-05-01.json`
    pub fn file_name(&self) -> String {
        format!(
            "notifications_export_{}.json",
            self.exported_at.format("%Y-%m-%d")
        )
    }

    /// Pretty JSON rendering
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

//! Notification record entity

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::kind::NotificationKind;
use crate::domain::error::InvalidIdError;
use crate::domain::time::Duration;

/// Title used when a notification is created without one
pub const DEFAULT_TITLE: &str = "Notification";

/// Default auto-close delay in milliseconds
pub const DEFAULT_DURATION_MS: u64 = 5000;

/// Unique notification identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for NotificationId {
    type Err = InvalidIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| InvalidIdError { input: s.to_string() })
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Callback run when the user triggers a notification action
pub type ActionCallback = Arc<dyn Fn(&Notification) + Send + Sync>;

/// A user-triggerable action attached to a notification.
///
/// The callback lives only in the creating process; persisted copies keep
/// the id and label.
#[derive(Clone, Serialize, Deserialize)]
pub struct NotificationAction {
    pub id: String,
    pub label: String,
    #[serde(skip)]
    pub callback: Option<ActionCallback>,
}

impl NotificationAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            callback: None,
        }
    }

    /// Attach a callback to this action
    pub fn on_trigger<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for NotificationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl PartialEq for NotificationAction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.label == other.label
    }
}

/// A notification record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub icon: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub persistent: bool,
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default = "default_true")]
    pub auto_close: bool,
    /// Auto-close delay in milliseconds
    #[serde(default = "default_duration")]
    pub duration: u64,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_duration() -> u64 {
    DEFAULT_DURATION_MS
}

impl Notification {
    /// Auto-close delay as a duration value
    pub fn auto_close_delay(&self) -> Option<Duration> {
        if self.auto_close && self.duration > 0 {
            Some(Duration::from_millis(self.duration))
        } else {
            None
        }
    }

    /// Look up an action by id
    pub fn action(&self, action_id: &str) -> Option<&NotificationAction> {
        self.actions.iter().find(|a| a.id == action_id)
    }
}

/// Partial notification input. Every field is optional; missing ones are
/// filled with defaults when the record is created.
#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    pub title: Option<String>,
    pub message: Option<String>,
    pub kind: Option<NotificationKind>,
    pub icon: Option<String>,
    pub persistent: bool,
    pub actions: Vec<NotificationAction>,
    pub data: Map<String, Value>,
    pub auto_close: Option<bool>,
    pub duration: Option<Duration>,
}

impl NewNotification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn kind(mut self, kind: NotificationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn action(mut self, action: NotificationAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn auto_close(mut self, auto_close: bool) -> Self {
        self.auto_close = Some(auto_close);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Build the full record, stamping a fresh id and the current time.
    ///
    /// Empty strings and a zero duration count as absent.
    pub fn into_notification(self, default_duration: Duration) -> Notification {
        let kind = self.kind.unwrap_or_default();
        let icon = self
            .icon
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| kind.default_icon().to_string());
        let duration = self
            .duration
            .filter(|d| d.as_millis() > 0)
            .unwrap_or(default_duration);

        Notification {
            id: NotificationId::generate(),
            title: self
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(default_title),
            message: self.message.unwrap_or_default(),
            kind,
            icon,
            timestamp: Utc::now(),
            read: false,
            persistent: self.persistent,
            actions: self.actions,
            data: self.data,
            auto_close: self.auto_close.unwrap_or(true),
            duration: duration.as_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_seconds() -> Duration {
        Duration::from_millis(DEFAULT_DURATION_MS)
    }

    #[test]
    fn empty_input_fills_defaults() {
        let n = NewNotification::default().into_notification(five_seconds());
        assert_eq!(n.title, DEFAULT_TITLE);
        assert_eq!(n.message, "");
        assert_eq!(n.kind, NotificationKind::Info);
        assert_eq!(n.icon, "dialog-information");
        assert!(!n.read);
        assert!(!n.persistent);
        assert!(n.auto_close);
        assert_eq!(n.duration, DEFAULT_DURATION_MS);
        assert!(!n.id.to_string().is_empty());
    }

    #[test]
    fn icon_follows_kind() {
        let n = NewNotification::new("t", "m")
            .kind(NotificationKind::Error)
            .into_notification(five_seconds());
        assert_eq!(n.icon, "dialog-error");
    }

    #[test]
    fn explicit_icon_wins() {
        let n = NewNotification::new("t", "m")
            .kind(NotificationKind::Error)
            .icon("custom-icon")
            .into_notification(five_seconds());
        assert_eq!(n.icon, "custom-icon");
    }

    #[test]
    fn empty_title_uses_default() {
        let n = NewNotification::new("", "body").into_notification(five_seconds());
        assert_eq!(n.title, DEFAULT_TITLE);
        assert_eq!(n.message, "body");
    }

    #[test]
    fn zero_duration_uses_default() {
        let n = NewNotification::new("t", "m")
            .duration(Duration::from_millis(0))
            .into_notification(five_seconds());
        assert_eq!(n.duration, DEFAULT_DURATION_MS);
    }

    #[test]
    fn auto_close_delay_respects_flag() {
        let n = NewNotification::new("t", "m")
            .auto_close(false)
            .into_notification(five_seconds());
        assert!(n.auto_close_delay().is_none());

        let n = NewNotification::new("t", "m").into_notification(five_seconds());
        assert_eq!(n.auto_close_delay(), Some(Duration::from_millis(DEFAULT_DURATION_MS)));
    }

    #[test]
    fn generated_ids_differ() {
        let a = NotificationId::generate();
        let b = NotificationId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn id_parses_from_display() {
        let id = NotificationId::generate();
        assert_eq!(id.to_string().parse::<NotificationId>().unwrap(), id);
        assert!("not-an-id".parse::<NotificationId>().is_err());
    }

    #[test]
    fn wire_format_uses_camel_case_and_type() {
        let n = NewNotification::new("Saved", "ok")
            .kind(NotificationKind::Success)
            .data("file", "report.pdf")
            .into_notification(five_seconds());
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "success");
        assert_eq!(json["autoClose"], true);
        assert_eq!(json["data"]["file"], "report.pdf");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn minimal_record_deserializes_with_defaults() {
        let json = serde_json::json!({
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "timestamp": "2024-01-01T10:00:00Z"
        });
        let n: Notification = serde_json::from_value(json).unwrap();
        assert_eq!(n.title, DEFAULT_TITLE);
        assert_eq!(n.kind, NotificationKind::Info);
        assert!(n.auto_close);
        assert_eq!(n.duration, DEFAULT_DURATION_MS);
    }

    #[test]
    fn action_callback_is_not_serialized() {
        let n = NewNotification::new("t", "m")
            .action(NotificationAction::new("open", "Open").on_trigger(|_| {}))
            .into_notification(five_seconds());
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["actions"][0]["id"], "open");
        assert!(json["actions"][0].get("callback").is_none());

        let back: Notification = serde_json::from_value(json).unwrap();
        assert!(back.actions[0].callback.is_none());
        assert_eq!(back.action("open").unwrap().label, "Open");
    }
}

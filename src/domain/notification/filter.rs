//! Notification query filter

use super::kind::NotificationKind;
use super::record::Notification;

/// Query filter over the notification list.
///
/// Filters apply in order: read state, kind, then limit. A limit of zero
/// means no limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationFilter {
    pub read: Option<bool>,
    pub kind: Option<NotificationKind>,
    pub limit: Option<usize>,
}

impl NotificationFilter {
    /// Filter that matches everything
    pub fn all() -> Self {
        Self::default()
    }

    /// Only unread notifications
    pub fn unread() -> Self {
        Self {
            read: Some(false),
            ..Default::default()
        }
    }

    pub fn with_read(mut self, read: bool) -> Self {
        self.read = Some(read);
        self
    }

    pub fn with_kind(mut self, kind: NotificationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a single record passes the read and kind criteria
    pub fn matches(&self, notification: &Notification) -> bool {
        self.read.map_or(true, |read| notification.read == read)
            && self.kind.map_or(true, |kind| notification.kind == kind)
    }

    /// Apply the filter to a list, returning owned copies
    pub fn apply<'a, I>(&self, notifications: I) -> Vec<Notification>
    where
        I: IntoIterator<Item = &'a Notification>,
    {
        let matching = notifications.into_iter().filter(|n| self.matches(n)).cloned();
        match self.limit.filter(|l| *l > 0) {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}

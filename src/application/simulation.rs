//! Simulated activity for demos

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::domain::notification::{NewNotification, NotificationKind};

/// A canned notification produced by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub title: &'static str,
    pub message: &'static str,
    pub kind: NotificationKind,
    pub icon: &'static str,
}

impl Activity {
    pub fn to_new_notification(&self) -> NewNotification {
        NewNotification::new(self.title, self.message)
            .kind(self.kind)
            .icon(self.icon)
    }
}

/// Fixed catalog of simulated activity
pub const ACTIVITY_CATALOG: &[Activity] = &[
    Activity {
        title: "File Upload Completed",
        message: "Procurement document uploaded successfully",
        kind: NotificationKind::Success,
        icon: "document-save",
    },
    Activity {
        title: "New Spreadsheet Data",
        message: "New spreadsheet data has been imported",
        kind: NotificationKind::Info,
        icon: "x-office-spreadsheet",
    },
    Activity {
        title: "System Backup",
        message: "Automatic backup has finished",
        kind: NotificationKind::Info,
        icon: "security-high",
    },
    Activity {
        title: "High Activity Detected",
        message: "User activity increased significantly",
        kind: NotificationKind::Warning,
        icon: "utilities-system-monitor",
    },
];

/// Rolls for simulated activity with a fixed probability per tick
#[derive(Debug, Clone, Copy)]
pub struct ActivitySimulator {
    probability: f64,
}

impl ActivitySimulator {
    /// Create a simulator; the probability is clamped to [0, 1]
    pub fn new(probability: f64) -> Self {
        let probability = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { probability }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// One tick: maybe pick a catalog entry uniformly at random
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<NewNotification> {
        if !rng.random_bool(self.probability) {
            return None;
        }
        ACTIVITY_CATALOG
            .choose(rng)
            .map(Activity::to_new_notification)
    }
}

//! Notifications emitted to timer observers

use serde::{Deserialize, Serialize};

/// Notification delivered through the event channel.
///
/// `Started` is informational. `Completed` is the functionally important
/// one: it fires exactly once per run that reaches zero naturally, and
/// never on a manual stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    /// A fresh countdown was started
    Started {
        duration_seconds: u64,
        label: Option<String>,
    },
    /// A countdown reached zero naturally
    Completed,
}

impl TimerEvent {
    /// Create a started notification for a new run
    pub fn started(duration_seconds: u64, label: Option<String>) -> Self {
        Self::Started {
            duration_seconds,
            label,
        }
    }
}

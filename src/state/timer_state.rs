//! Countdown state structure and its transitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// State of a single rest countdown.
///
/// All transitions are synchronous and infallible; the surrounding
/// [`RestTimer`](crate::timer::RestTimer) decides when to call them and owns
/// the tick source that drives [`tick`](TimerState::tick).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    /// Total length of the current countdown in seconds. Tracks the
    /// high-water mark when time is added mid-run.
    pub duration_seconds: u64,
    /// Seconds left before the rest period ends.
    pub remaining_seconds: u64,
    /// True while the countdown is ticking; false when paused, stopped,
    /// or completed.
    pub active: bool,
    /// Optional description of what the rest period is for (e.g. an
    /// exercise name). Not used in control flow.
    pub label: Option<String>,
    /// Wall-clock time the current run was started.
    pub started_at: Option<DateTime<Utc>>,
    /// Generation counter identifying which start/resume established the
    /// current tick source. A tick carrying a stale generation is rejected.
    #[serde(skip)]
    pub run: u64,
}

impl TimerState {
    /// Create a new idle timer state
    pub fn new() -> Self {
        Self {
            duration_seconds: 0,
            remaining_seconds: 0,
            active: false,
            label: None,
            started_at: None,
            run: 0,
        }
    }

    /// Check if the countdown is currently ticking
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Check if the timer holds no countdown at all
    pub fn is_idle(&self) -> bool {
        !self.active && self.remaining_seconds == 0 && self.duration_seconds == 0
    }

    /// Seconds elapsed since the start of the current run
    pub fn elapsed_seconds(&self) -> u64 {
        self.duration_seconds.saturating_sub(self.remaining_seconds)
    }

    /// Begin a fresh countdown, superseding whatever came before.
    ///
    /// A zero duration yields a run that is already over: `active` stays
    /// false and the caller is expected to treat it as completed.
    pub fn begin(&mut self, duration_seconds: u64, label: Option<String>) {
        let run = self.run.wrapping_add(1);
        *self = Self {
            duration_seconds,
            remaining_seconds: duration_seconds,
            active: duration_seconds > 0,
            label,
            started_at: Some(Utc::now()),
            run,
        };
    }

    /// Freeze the countdown, keeping the remaining time for a later resume.
    /// Has no effect if the countdown is not running.
    pub fn pause(&mut self) {
        self.active = false;
    }

    /// Unfreeze a paused countdown. Returns true if the state actually
    /// transitioned to active; resuming an exhausted or already-running
    /// countdown is a no-op.
    pub fn resume(&mut self) -> bool {
        if self.active || self.remaining_seconds == 0 {
            return false;
        }
        self.active = true;
        self.run = self.run.wrapping_add(1);
        true
    }

    /// Reset to the idle state, discarding the current countdown. The run
    /// generation is preserved so stale tick sources stay stale.
    pub fn clear(&mut self) {
        let run = self.run;
        *self = Self { run, ..Self::new() };
    }

    /// Adjust the remaining time by `delta_seconds`, clamping at zero.
    /// The duration follows as a high-water mark so elapsed/total ratios
    /// stay meaningful after extending a run.
    pub fn add_time(&mut self, delta_seconds: i64) {
        self.remaining_seconds = if delta_seconds >= 0 {
            self.remaining_seconds.saturating_add(delta_seconds as u64)
        } else {
            self.remaining_seconds.saturating_sub(delta_seconds.unsigned_abs())
        };
        self.duration_seconds = self.duration_seconds.max(self.remaining_seconds);
    }

    /// Apply one per-second decrement. Returns true when the decrement
    /// finished the countdown, in which case `active` has been cleared and
    /// exactly one completion notification is owed to observers.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.active = false;
            true
        } else {
            false
        }
    }

    /// Format the remaining time as a human-readable string
    pub fn remaining_display(&self) -> String {
        let hours = self.remaining_seconds / 3600;
        let minutes = (self.remaining_seconds % 3600) / 60;
        let seconds = self.remaining_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

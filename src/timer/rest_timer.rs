//! Shared rest timer handle and its operations

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    state::{TimerEvent, TimerState},
    tasks::countdown_task,
};

/// Outcome of applying one tick to the countdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickStatus {
    /// The countdown decremented and keeps running
    Running,
    /// The decrement finished the countdown
    Completed,
    /// The tick belonged to a superseded or halted run
    Stale,
}

/// Shared handle to a single rest countdown.
///
/// The handle is cheap to clone; all clones operate on the same countdown.
/// Operations are synchronous and immediate-return. The per-second tick is
/// driven by a background task owned by this handle: every operation that
/// needs to halt or replace the tick source aborts the stored task handle
/// first, and a tick whose run generation has been superseded is rejected
/// under the state lock, so at most one tick source ever decrements a run.
///
/// Observers follow the countdown through two channels: a watch channel
/// publishing a [`TimerState`] snapshot after every mutation, and a
/// broadcast channel carrying the [`TimerEvent`] notifications.
///
/// Spawning the tick source requires a running Tokio runtime.
#[derive(Debug, Clone)]
pub struct RestTimer {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// The countdown state, mutated only through the operations below
    state: Mutex<TimerState>,
    /// Handle of the active tick source, if any
    ticker: Mutex<Option<JoinHandle<()>>>,
    /// Channel for started/completed notifications
    event_tx: broadcast::Sender<TimerEvent>,
    /// Channel for state snapshots
    state_tx: watch::Sender<TimerState>,
    /// Keep receivers alive to prevent channel closure
    _event_rx: broadcast::Receiver<TimerEvent>,
    _state_rx: watch::Receiver<TimerState>,
}

impl RestTimer {
    /// Create a new idle rest timer
    pub fn new() -> Self {
        let (event_tx, event_rx) = broadcast::channel(16);
        let (state_tx, state_rx) = watch::channel(TimerState::new());

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(TimerState::new()),
                ticker: Mutex::new(None),
                event_tx,
                state_tx,
                _event_rx: event_rx,
                _state_rx: state_rx,
            }),
        }
    }

    /// Subscribe to started/completed notifications
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Get a receiver that observes a state snapshot after every mutation
    pub fn watch_state(&self) -> watch::Receiver<TimerState> {
        self.inner.state_tx.subscribe()
    }

    /// Get a snapshot of the current countdown state
    pub fn state(&self) -> Result<TimerState> {
        Ok(self.lock_state()?.clone())
    }

    /// Begin a fresh countdown, superseding any run in flight.
    ///
    /// Emits a `Started` notification. A zero duration is a countdown that
    /// is already over: it additionally emits the run's single `Completed`
    /// notification and establishes no tick source.
    pub fn start(&self, duration_seconds: u64, label: Option<String>) -> Result<TimerState> {
        // The old tick source must be gone before the new run's state
        // exists, so no decrement from the prior run can land afterwards.
        self.cancel_ticker()?;

        let snapshot = {
            let mut state = self.lock_state()?;
            state.begin(duration_seconds, label);
            state.clone()
        };

        info!(
            "Starting rest countdown: {}s, label={:?}",
            duration_seconds, snapshot.label
        );
        self.publish_state(snapshot.clone());
        self.publish_event(TimerEvent::started(duration_seconds, snapshot.label.clone()));

        if snapshot.active {
            self.spawn_ticker(snapshot.run)?;
        } else {
            self.publish_event(TimerEvent::Completed);
        }

        Ok(snapshot)
    }

    /// Freeze the countdown, halting the tick source but keeping the
    /// remaining time. Pausing an already-paused or idle timer has no
    /// effect.
    pub fn pause(&self) -> Result<TimerState> {
        self.cancel_ticker()?;

        let snapshot = {
            let mut state = self.lock_state()?;
            state.pause();
            state.clone()
        };

        debug!(
            "Countdown paused with {}s remaining",
            snapshot.remaining_seconds
        );
        self.publish_state(snapshot.clone());
        Ok(snapshot)
    }

    /// Restart the decrement of a paused countdown under a fresh tick
    /// source. A no-op when the countdown is already running or has
    /// nothing left to run.
    pub fn resume(&self) -> Result<TimerState> {
        let (snapshot, resumed) = {
            let mut state = self.lock_state()?;
            let resumed = state.resume();
            (state.clone(), resumed)
        };

        if resumed {
            debug!(
                "Countdown resumed with {}s remaining",
                snapshot.remaining_seconds
            );
            self.publish_state(snapshot.clone());
            self.spawn_ticker(snapshot.run)?;
        }

        Ok(snapshot)
    }

    /// Cancel the countdown and reset to the idle state. This is a silent
    /// cancel: no notification is emitted, unlike natural completion.
    pub fn stop(&self) -> Result<TimerState> {
        self.cancel_ticker()?;

        let snapshot = {
            let mut state = self.lock_state()?;
            state.clear();
            state.clone()
        };

        info!("Countdown stopped");
        self.publish_state(snapshot.clone());
        Ok(snapshot)
    }

    /// Adjust the remaining time by `delta_seconds` (clamped at zero),
    /// raising the total duration to match when extending. Whether the
    /// countdown is running is left untouched; a running countdown whose
    /// remaining time was clamped to zero completes at its next tick.
    pub fn add_time(&self, delta_seconds: i64) -> Result<TimerState> {
        let snapshot = {
            let mut state = self.lock_state()?;
            state.add_time(delta_seconds);
            state.clone()
        };

        debug!(
            "Adjusted remaining time by {}s to {}s",
            delta_seconds, snapshot.remaining_seconds
        );
        self.publish_state(snapshot.clone());
        Ok(snapshot)
    }

    /// Apply one per-second decrement on behalf of the tick source for
    /// `run`. Ticks from superseded runs, or arriving while the countdown
    /// is not running, are rejected without touching the state.
    pub(crate) fn apply_tick(&self, run: u64) -> Result<TickStatus> {
        let (snapshot, status) = {
            let mut state = self.lock_state()?;
            if state.run != run || !state.active {
                return Ok(TickStatus::Stale);
            }
            let status = if state.tick() {
                TickStatus::Completed
            } else {
                TickStatus::Running
            };
            (state.clone(), status)
        };

        self.publish_state(snapshot);
        if status == TickStatus::Completed {
            info!("Rest countdown complete");
            self.publish_event(TimerEvent::Completed);
        }

        Ok(status)
    }

    /// Abort the active tick source, if any
    fn cancel_ticker(&self) -> Result<()> {
        let mut ticker = self.lock_ticker()?;
        if let Some(handle) = ticker.take() {
            handle.abort();
        }
        Ok(())
    }

    /// Replace the tick source with a fresh one for `run`
    fn spawn_ticker(&self, run: u64) -> Result<()> {
        let mut ticker = self.lock_ticker()?;
        if let Some(handle) = ticker.take() {
            handle.abort();
        }
        *ticker = Some(tokio::spawn(countdown_task(self.clone(), run)));
        Ok(())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, TimerState>> {
        self.inner
            .state
            .lock()
            .map_err(|e| anyhow!("Failed to lock timer state: {}", e))
    }

    fn lock_ticker(&self) -> Result<MutexGuard<'_, Option<JoinHandle<()>>>> {
        self.inner
            .ticker
            .lock()
            .map_err(|e| anyhow!("Failed to lock ticker handle: {}", e))
    }

    fn publish_state(&self, snapshot: TimerState) {
        if let Err(e) = self.inner.state_tx.send(snapshot) {
            warn!("Failed to send timer state update: {}", e);
        }
    }

    fn publish_event(&self, event: TimerEvent) {
        if let Err(e) = self.inner.event_tx.send(event) {
            warn!("Failed to send timer event: {}", e);
        }
    }
}

impl Default for RestTimer {
    fn default() -> Self {
        Self::new()
    }
}

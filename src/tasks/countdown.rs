//! Countdown tick background task

use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, error};

use crate::timer::{RestTimer, TickStatus};

/// Interval between decrements
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Drive one run of a countdown, applying one decrement per second.
///
/// Each spawned task carries the run generation it was created for; once
/// the generation is superseded the task's ticks are rejected and it
/// exits, so a stale task cannot decrement a newer run even if it outlives
/// its abort for one tick.
pub(crate) async fn countdown_task(timer: RestTimer, run: u64) {
    let mut interval = interval(TICK_INTERVAL);
    // The first interval tick resolves immediately; consume it so the
    // first decrement lands a full second after the run starts.
    interval.tick().await;

    loop {
        interval.tick().await;

        match timer.apply_tick(run) {
            Ok(TickStatus::Running) => {}
            Ok(TickStatus::Completed) => {
                debug!("Countdown task finished run {}", run);
                break;
            }
            Ok(TickStatus::Stale) => {
                debug!("Countdown task for run {} superseded", run);
                break;
            }
            Err(e) => {
                error!("Failed to apply countdown tick: {}", e);
                break;
            }
        }
    }
}

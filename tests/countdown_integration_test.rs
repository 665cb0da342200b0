//! End-to-end countdown contract tests.
//!
//! All tests run on a paused virtual clock: awaiting an observable lets the
//! runtime auto-advance to the tick task's next deadline, and explicit
//! `advance` calls model wall-clock time passing while nothing may tick.

use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::advance;

use rest_timer::{RestTimer, TimerEvent};

#[tokio::test(start_paused = true)]
async fn test_countdown_runs_to_completion() {
    let timer = RestTimer::new();
    let mut events = timer.subscribe_events();

    let state = timer.start(3, Some("Bench Press".to_string())).unwrap();
    assert!(state.is_active());
    assert_eq!(state.remaining_seconds, 3);
    assert_eq!(state.duration_seconds, 3);

    assert_eq!(
        events.recv().await.unwrap(),
        TimerEvent::started(3, Some("Bench Press".to_string()))
    );
    assert_eq!(events.recv().await.unwrap(), TimerEvent::Completed);

    let state = timer.state().unwrap();
    assert_eq!(state.remaining_seconds, 0);
    assert!(!state.is_active());

    // Exactly one completion per run, even as more time passes
    advance(Duration::from_secs(5)).await;
    tokio::task::yield_now().await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn test_watch_reports_each_decrement() {
    let timer = RestTimer::new();
    let mut updates = timer.watch_state();

    timer.start(3, None).unwrap();

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().remaining_seconds, 3);

    let mut seen = Vec::new();
    loop {
        updates.changed().await.unwrap();
        let remaining = updates.borrow_and_update().remaining_seconds;
        seen.push(remaining);
        if remaining == 0 {
            break;
        }
    }

    assert_eq!(seen, vec![2, 1, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_pause_freezes_remaining_time() {
    let timer = RestTimer::new();
    let mut updates = timer.watch_state();

    timer.start(60, None).unwrap();

    // Let the countdown run down to 45 seconds remaining
    loop {
        updates.changed().await.unwrap();
        if updates.borrow_and_update().remaining_seconds == 45 {
            break;
        }
    }

    let paused = timer.pause().unwrap();
    assert!(!paused.is_active());
    assert_eq!(paused.remaining_seconds, 45);

    // Wall-clock time passing while paused must not decrement anything
    advance(Duration::from_secs(10)).await;
    tokio::task::yield_now().await;
    assert_eq!(timer.state().unwrap().remaining_seconds, 45);

    // Pausing twice has the same effect as pausing once
    let paused_again = timer.pause().unwrap();
    assert!(!paused_again.is_active());
    assert_eq!(paused_again.remaining_seconds, 45);

    // Resume picks up exactly where the pause left off
    let resumed = timer.resume().unwrap();
    assert!(resumed.is_active());
    assert_eq!(resumed.remaining_seconds, 45);

    loop {
        updates.changed().await.unwrap();
        if updates.borrow_and_update().remaining_seconds == 44 {
            break;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_a_silent_cancel() {
    let timer = RestTimer::new();
    let mut events = timer.subscribe_events();
    let mut updates = timer.watch_state();

    timer.start(5, Some("Row".to_string())).unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        TimerEvent::started(5, Some("Row".to_string()))
    );

    loop {
        updates.changed().await.unwrap();
        if updates.borrow_and_update().remaining_seconds == 3 {
            break;
        }
    }

    let stopped = timer.stop().unwrap();
    assert!(stopped.is_idle());
    assert_eq!(stopped.duration_seconds, 0);
    assert_eq!(stopped.remaining_seconds, 0);
    assert!(!stopped.is_active());
    assert!(stopped.label.is_none());

    // No completion may surface after a manual stop
    advance(Duration::from_secs(10)).await;
    tokio::task::yield_now().await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(timer.state().unwrap().remaining_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn test_restart_cancels_previous_tick_source() {
    let timer = RestTimer::new();
    let mut updates = timer.watch_state();

    timer.start(10, None).unwrap();
    loop {
        updates.changed().await.unwrap();
        if updates.borrow_and_update().remaining_seconds == 8 {
            break;
        }
    }

    // A fresh start supersedes the old run without an explicit stop
    timer.start(10, None).unwrap();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().remaining_seconds, 10);

    // One tick period later exactly one decrement has landed; a surviving
    // tick source from the first run would have produced a second one
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().remaining_seconds, 9);

    tokio::task::yield_now().await;
    assert_eq!(timer.state().unwrap().remaining_seconds, 9);
}

#[tokio::test(start_paused = true)]
async fn test_add_time_adjusts_running_countdown() {
    let timer = RestTimer::new();

    timer.start(10, None).unwrap();

    let extended = timer.add_time(15).unwrap();
    assert_eq!(extended.remaining_seconds, 25);
    assert_eq!(extended.duration_seconds, 25);
    assert!(extended.is_active());

    // A large negative adjustment clamps at zero but leaves the run
    // formally active until its next tick
    let clamped = timer.add_time(-100).unwrap();
    assert_eq!(clamped.remaining_seconds, 0);
    assert_eq!(clamped.duration_seconds, 25);
    assert!(clamped.is_active());

    let mut events = timer.subscribe_events();
    assert_eq!(events.recv().await.unwrap(), TimerEvent::Completed);
    assert!(!timer.state().unwrap().is_active());
}

#[tokio::test(start_paused = true)]
async fn test_add_time_while_paused_keeps_it_paused() {
    let timer = RestTimer::new();

    timer.start(30, None).unwrap();
    timer.pause().unwrap();

    let adjusted = timer.add_time(30).unwrap();
    assert_eq!(adjusted.remaining_seconds, 60);
    assert_eq!(adjusted.duration_seconds, 60);
    assert!(!adjusted.is_active());

    advance(Duration::from_secs(5)).await;
    tokio::task::yield_now().await;
    assert_eq!(timer.state().unwrap().remaining_seconds, 60);
}

#[tokio::test(start_paused = true)]
async fn test_zero_duration_completes_immediately() {
    let timer = RestTimer::new();
    let mut events = timer.subscribe_events();

    let state = timer.start(0, None).unwrap();
    assert!(!state.is_active());
    assert_eq!(state.remaining_seconds, 0);

    assert_eq!(events.recv().await.unwrap(), TimerEvent::started(0, None));
    assert_eq!(events.recv().await.unwrap(), TimerEvent::Completed);

    advance(Duration::from_secs(3)).await;
    tokio::task::yield_now().await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn test_resume_after_completion_is_noop() {
    let timer = RestTimer::new();
    let mut events = timer.subscribe_events();

    timer.start(1, None).unwrap();
    events.recv().await.unwrap();
    assert_eq!(events.recv().await.unwrap(), TimerEvent::Completed);

    let state = timer.resume().unwrap();
    assert!(!state.is_active());
    assert_eq!(state.remaining_seconds, 0);

    advance(Duration::from_secs(3)).await;
    tokio::task::yield_now().await;
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn test_timer_can_run_again_after_completion() {
    let timer = RestTimer::new();
    let mut events = timer.subscribe_events();

    timer.start(2, None).unwrap();
    assert_eq!(events.recv().await.unwrap(), TimerEvent::started(2, None));
    assert_eq!(events.recv().await.unwrap(), TimerEvent::Completed);

    timer.start(2, None).unwrap();
    assert_eq!(events.recv().await.unwrap(), TimerEvent::started(2, None));
    assert_eq!(events.recv().await.unwrap(), TimerEvent::Completed);
}

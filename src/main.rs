//! Rest Timer - a state-managed countdown engine for workout rest intervals
//!
//! This is the main entry point for the rest-timer CLI. It runs a single
//! rest countdown and follows it to completion; SIGINT/SIGTERM stops the
//! countdown silently and exits.

use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use rest_timer::{
    config::Config,
    state::{TimerEvent, TimerState},
    timer::RestTimer,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("rest_timer={}", config.log_level()))
        .init();

    info!("Starting rest-timer v0.1.0");
    info!(
        "Configuration: duration={}s, label={:?}",
        config.duration, config.label
    );

    let timer = RestTimer::new();

    // Subscribe before starting so no notification is missed
    let events = timer.subscribe_events();
    let updates = timer.watch_state();

    timer.start(config.duration, config.label.clone())?;

    tokio::select! {
        result = follow_countdown(&config, updates, events) => {
            result?;
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, stopping countdown");
            timer.stop()?;
        }
    }

    info!("rest-timer exiting");
    Ok(())
}

/// Follow the countdown's observables until it completes
async fn follow_countdown(
    config: &Config,
    mut updates: watch::Receiver<TimerState>,
    mut events: broadcast::Receiver<TimerEvent>,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if config.json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else if snapshot.is_active() {
                    info!("Rest remaining: {}", snapshot.remaining_display());
                }
            }
            event = events.recv() => {
                match event {
                    Ok(TimerEvent::Completed) => {
                        if config.json {
                            println!("{}", serde_json::to_string(&TimerEvent::Completed)?);
                        } else {
                            info!("Rest complete");
                        }
                        break;
                    }
                    Ok(event @ TimerEvent::Started { .. }) => {
                        if config.json {
                            println!("{}", serde_json::to_string(&event)?);
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Event stream lagged, skipped {} notifications", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    Ok(())
}

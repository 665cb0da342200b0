//! State management module
//!
//! This module contains the countdown state structures and the notification
//! vocabulary observers consume.

pub mod events;
pub mod timer_state;

// Re-export main types
pub use events::TimerEvent;
pub use timer_state::TimerState;

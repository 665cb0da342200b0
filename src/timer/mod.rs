//! Rest timer module
//!
//! This module contains the shared timer handle that owns the countdown
//! state and its tick source.

pub mod rest_timer;

// Re-export main types
pub use rest_timer::RestTimer;
pub(crate) use rest_timer::TickStatus;

//! Background tasks module
//!
//! This module contains the countdown task that drives the per-second tick.
//! It is crate-private: only the timer handle may establish a tick source.

pub(crate) mod countdown;

pub(crate) use countdown::countdown_task;

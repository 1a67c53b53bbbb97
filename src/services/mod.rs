//! Timer controller module
//!
//! This module contains the controller that owns the countdown and the
//! events it publishes.

pub mod events;
pub mod timer_service;

// Re-export main types
pub use events::TimerEvent;
pub use timer_service::{TimerService, WeakTimerService, DEFAULT_FINISHED_HOLD};

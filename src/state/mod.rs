//! State management module
//!
//! This module contains the timer session state machine, status snapshots and
//! the shared state handed to the HTTP layer.

pub mod session;
pub mod status;
pub mod app_state;

// Re-export main types
pub use session::{TickOutcome, TimerPhase, TimerSession, TICK_PERIOD};
pub use status::TimerStatus;
pub use app_state::AppState;

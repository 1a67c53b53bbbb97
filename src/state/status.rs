//! Read-only timer status snapshot

use serde::{Deserialize, Serialize};

use super::TimerSession;

/// Snapshot returned by the status query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerStatus {
    pub running: bool,
    /// Remaining whole seconds
    pub remaining: u64,
}

impl TimerStatus {
    /// Status with no live countdown
    pub fn idle() -> Self {
        Self {
            running: false,
            remaining: 0,
        }
    }

    /// Status of a running countdown
    pub fn running(remaining: u64) -> Self {
        Self {
            running: true,
            remaining,
        }
    }

    /// Build the snapshot for an optional session
    pub fn of(session: Option<&TimerSession>) -> Self {
        match session {
            Some(s) => Self {
                running: s.is_running(),
                remaining: s.remaining_secs(),
            },
            None => Self::idle(),
        }
    }
}

impl Default for TimerStatus {
    fn default() -> Self {
        Self::idle()
    }
}

//! Events emitted by the timer controller

use serde::Serialize;

/// Controller event, delivered to every subscriber in emission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimerEvent {
    Started {
        remaining: u64,
        exercise: String,
        workout: String,
    },
    Tick {
        remaining: u64,
    },
    Paused {
        remaining: u64,
    },
    Resumed {
        remaining: u64,
        exercise: String,
        workout: String,
    },
    Finished,
    Stopped,
    /// The finished display hold elapsed and the timer is idle again
    Cleared,
}

impl TimerEvent {
    /// Short name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            TimerEvent::Started { .. } => "started",
            TimerEvent::Tick { .. } => "tick",
            TimerEvent::Paused { .. } => "paused",
            TimerEvent::Resumed { .. } => "resumed",
            TimerEvent::Finished => "finished",
            TimerEvent::Stopped => "stopped",
            TimerEvent::Cleared => "cleared",
        }
    }
}

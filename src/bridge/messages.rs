//! Bridge verbs' arguments, replies and events

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::services::TimerEvent;

pub const DEFAULT_SECONDS: u64 = 90;
pub const DEFAULT_EXERCISE: &str = "Next exercise";
pub const DEFAULT_WORKOUT: &str = "Workout";

/// Arguments of `startTimer`; missing fields fall back to [`StartDefaults`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartTimerRequest {
    pub seconds: Option<u64>,
    pub exercise: Option<String>,
    pub workout: Option<String>,
}

/// Values used when a start request omits an argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartDefaults {
    pub seconds: u64,
    pub exercise: String,
    pub workout: String,
}

impl Default for StartDefaults {
    fn default() -> Self {
        Self {
            seconds: DEFAULT_SECONDS,
            exercise: DEFAULT_EXERCISE.to_string(),
            workout: DEFAULT_WORKOUT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartReply {
    pub started: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopReply {
    pub stopped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseReply {
    pub paused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeReply {
    pub resumed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionReply {
    pub granted: bool,
}

/// Event delivered to bridge listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    TimerTick { remaining: u64 },
    TimerComplete { completed: bool },
}

impl BridgeEvent {
    /// Listener-facing event name
    pub fn name(&self) -> &'static str {
        match self {
            BridgeEvent::TimerTick { .. } => "timerTick",
            BridgeEvent::TimerComplete { .. } => "timerComplete",
        }
    }

    /// Event payload as sent to listeners
    pub fn payload(&self) -> Value {
        match self {
            BridgeEvent::TimerTick { remaining } => json!({ "remaining": remaining }),
            BridgeEvent::TimerComplete { completed } => json!({ "completed": completed }),
        }
    }

    /// The listener event for a controller event, if listeners care about it
    pub fn from_timer_event(event: &TimerEvent) -> Option<Self> {
        match event {
            TimerEvent::Tick { remaining } => Some(BridgeEvent::TimerTick {
                remaining: *remaining,
            }),
            TimerEvent::Finished => Some(BridgeEvent::TimerComplete { completed: true }),
            _ => None,
        }
    }
}

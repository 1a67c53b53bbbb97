//! Error types shared by the controller, the bridge and the HTTP layer

use thiserror::Error;

/// Failures a timer call can report back to its caller
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// No controller is attached to the bridge
    #[error("Timer service not available")]
    ServiceUnavailable,
    /// Requested rest length cannot be represented
    #[error("Rest duration of {0}s is out of range")]
    InvalidDuration(u64),
    /// The presenter could not show or remove a notification
    #[error("Failed to present notification: {0}")]
    Notification(String),
    /// A thread panicked while holding the timer state lock
    #[error("Failed to lock timer state: {0}")]
    LockPoisoned(String),
}

impl<T> From<std::sync::PoisonError<T>> for TimerError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        TimerError::LockPoisoned(e.to_string())
    }
}

pub type Result<T, E = TimerError> = std::result::Result<T, E>;

//! Notification content for each timer phase

use super::{Notification, NotificationAction};

const REST_LABEL: &str = "REST";
const PAUSED_LABEL: &str = "PAUSED";
const DONE_LABEL: &str = "DONE!";

/// Format seconds as `M:SS`
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Notification shown while the countdown runs
pub fn running(remaining: u64, exercise: &str, workout: &str) -> Notification {
    Notification {
        title: format!("⏱ {}  {}", format_time(remaining), REST_LABEL),
        body: format!("{} • Next: {}", workout, exercise),
        ongoing: true,
        action: Some(NotificationAction::Stop),
    }
}

/// Notification shown while the countdown is paused
pub fn paused(remaining: u64, exercise: &str, workout: &str) -> Notification {
    Notification {
        title: format!("⏸ {}  {}", format_time(remaining), PAUSED_LABEL),
        body: format!("{} • {}", workout, exercise),
        ongoing: true,
        action: Some(NotificationAction::Stop),
    }
}

/// Notification shown once the rest is over
pub fn finished(exercise: &str, workout: &str) -> Notification {
    Notification {
        title: format!("✅ {}", DONE_LABEL),
        body: format!("{} • Start: {}", workout, exercise),
        ongoing: false,
        action: None,
    }
}

//! Shared state handed to the HTTP handlers

use std::{sync::Arc, time::Instant};

use crate::{
    bridge::TimerBridge,
    error::{Result, TimerError},
    notification::{ActionSender, NotificationAction, PermissionQuery, PermissionState},
};

/// Application state shared by every request
pub struct AppState {
    /// Bridge to the timer controller
    pub bridge: TimerBridge,
    /// Notification permission source
    pub permission: Arc<dyn PermissionQuery>,
    /// Where pressed notification buttons are reported
    pub notification_actions: ActionSender,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    /// Create a new AppState around a bridge
    pub fn new(
        bridge: TimerBridge,
        permission: Arc<dyn PermissionQuery>,
        notification_actions: ActionSender,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            bridge,
            permission,
            notification_actions,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    pub fn notification_permission(&self) -> PermissionState {
        self.permission.notification_permission()
    }

    /// Report a notification button press to the action handler
    pub fn notification_action(&self, action: NotificationAction) -> Result<()> {
        self.notification_actions
            .send(action)
            .map_err(|_| TimerError::ServiceUnavailable)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

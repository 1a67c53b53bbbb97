//! Notification surface for the rest timer
//!
//! The timer never talks to a notification backend directly. A renderer task
//! turns controller events into [`Notification`] values and hands them to a
//! [`NotificationPresenter`], after checking the [`PermissionQuery`].

pub mod presenter;
pub mod render;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::Result;

pub use presenter::LogPresenter;
#[cfg(feature = "desktop")]
pub use presenter::DesktopPresenter;

/// Action button attached to a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationAction {
    /// Stops the timer (maps to the stop verb)
    Stop,
}

impl NotificationAction {
    /// Identifier reported back by the notification backend
    pub fn id(&self) -> &'static str {
        match self {
            NotificationAction::Stop => "stop",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NotificationAction::Stop => "Stop",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "stop" => Some(NotificationAction::Stop),
            _ => None,
        }
    }
}

/// Channel on which pressed notification actions are reported
pub type ActionSender = mpsc::UnboundedSender<NotificationAction>;
pub type ActionReceiver = mpsc::UnboundedReceiver<NotificationAction>;

/// Content of the timer notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    /// Ongoing notifications cannot be swiped away
    pub ongoing: bool,
    pub action: Option<NotificationAction>,
}

/// Backend that shows the timer notification
pub trait NotificationPresenter: Send + Sync {
    /// Show the notification, replacing the previous one
    fn present(&self, notification: &Notification) -> Result<()>;

    /// Remove the notification
    fn dismiss(&self) -> Result<()>;
}

/// Whether notifications may be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        *self == PermissionState::Granted
    }
}

/// Answers whether notification permission is held
pub trait PermissionQuery: Send + Sync {
    fn notification_permission(&self) -> PermissionState;
}

/// Permission answer fixed at startup
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission(pub PermissionState);

impl StaticPermission {
    pub fn granted() -> Self {
        Self(PermissionState::Granted)
    }

    pub fn denied() -> Self {
        Self(PermissionState::Denied)
    }
}

impl PermissionQuery for StaticPermission {
    fn notification_permission(&self) -> PermissionState {
        self.0
    }
}

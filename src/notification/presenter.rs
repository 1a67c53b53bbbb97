//! Notification presenters

use tracing::{debug, info};

use super::{Notification, NotificationPresenter};
use crate::error::Result;

/// Presenter that writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresenter;

impl NotificationPresenter for LogPresenter {
    fn present(&self, notification: &Notification) -> Result<()> {
        let action = notification.action.map(|a| a.label()).unwrap_or("-");
        if notification.ongoing {
            debug!(
                "[notification] {} | {} (action: {})",
                notification.title, notification.body, action
            );
        } else {
            info!("[notification] {} | {}", notification.title, notification.body);
        }
        Ok(())
    }

    fn dismiss(&self) -> Result<()> {
        debug!("[notification] dismissed");
        Ok(())
    }
}

#[cfg(feature = "desktop")]
pub use desktop::DesktopPresenter;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Mutex;

    use tracing::debug;

    use crate::{
        error::{Result, TimerError},
        notification::{ActionSender, Notification, NotificationAction, NotificationPresenter},
    };

    const APP_NAME: &str = "Rest Timer";

    /// Presenter backed by the desktop notification daemon.
    ///
    /// Desktop bubbles cannot be edited in place portably, so a bubble is only
    /// raised when the notification changes kind (running, paused, finished).
    /// Pressed action buttons are reported on the action channel.
    #[derive(Debug)]
    pub struct DesktopPresenter {
        last_kind: Mutex<Option<char>>,
        actions: ActionSender,
    }

    impl DesktopPresenter {
        pub fn new(actions: ActionSender) -> Self {
            Self {
                last_kind: Mutex::new(None),
                actions,
            }
        }

        /// Forward the pressed button of `handle` to the action channel
        #[cfg(all(unix, not(target_os = "macos")))]
        fn report_action(&self, handle: notify_rust::NotificationHandle) {
            let actions = self.actions.clone();
            // wait_for_action blocks until the bubble is clicked or closed
            std::thread::spawn(move || {
                handle.wait_for_action(|id| {
                    if let Some(action) = NotificationAction::from_id(id) {
                        debug!("Notification action pressed: {}", id);
                        let _ = actions.send(action);
                    }
                });
            });
        }

        #[cfg(not(all(unix, not(target_os = "macos"))))]
        fn report_action(&self, _handle: notify_rust::NotificationHandle) {
            debug!(
                "Notification actions unsupported on this platform, {} receivers left",
                usize::from(!self.actions.is_closed())
            );
        }
    }

    impl NotificationPresenter for DesktopPresenter {
        fn present(&self, notification: &Notification) -> Result<()> {
            let kind = notification.title.chars().next();
            {
                let mut last = self.last_kind.lock()?;
                if *last == kind {
                    return Ok(());
                }
                *last = kind;
            }

            debug!("Raising desktop notification: {}", notification.title);
            let mut bubble = notify_rust::Notification::new();
            bubble
                .appname(APP_NAME)
                .summary(&notification.title)
                .body(&notification.body);
            if let Some(action) = notification.action {
                bubble.action(action.id(), action.label());
            }

            let handle = bubble
                .show()
                .map_err(|e| TimerError::Notification(e.to_string()))?;
            if notification.action.is_some() {
                self.report_action(handle);
            }

            Ok(())
        }

        fn dismiss(&self) -> Result<()> {
            *self.last_kind.lock()? = None;
            Ok(())
        }
    }
}

//! Notification renderer background task

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::{
    notification::{render, Notification, NotificationPresenter, PermissionQuery, PermissionState},
    services::TimerEvent,
};

/// What the presenter should do in response to one timer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderAction {
    Present(Notification),
    Dismiss,
    Nothing,
    /// A notification was due but permission is denied; `warn` is set once per session
    Suppressed { warn: bool },
}

/// Tracks the session labels needed to render notifications
#[derive(Debug, Default)]
pub struct NotificationRenderer {
    exercise: String,
    workout: String,
    warned_denied: bool,
}

impl NotificationRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a timer event to a presenter action, given the current permission
    pub fn on_event(&mut self, event: &TimerEvent, permission: PermissionState) -> RenderAction {
        if matches!(event, TimerEvent::Started { .. }) {
            self.warned_denied = false;
        }

        match self.render(event) {
            RenderAction::Present(_) if !permission.is_granted() => RenderAction::Suppressed {
                warn: !std::mem::replace(&mut self.warned_denied, true),
            },
            action => action,
        }
    }

    fn render(&mut self, event: &TimerEvent) -> RenderAction {
        match event {
            TimerEvent::Started {
                remaining,
                exercise,
                workout,
            }
            | TimerEvent::Resumed {
                remaining,
                exercise,
                workout,
            } => {
                self.exercise.clone_from(exercise);
                self.workout.clone_from(workout);
                if *remaining == 0 {
                    // zero-length rest, the finished event follows immediately
                    return RenderAction::Nothing;
                }
                RenderAction::Present(render::running(*remaining, &self.exercise, &self.workout))
            }
            TimerEvent::Tick { remaining } => {
                RenderAction::Present(render::running(*remaining, &self.exercise, &self.workout))
            }
            TimerEvent::Paused { remaining } => {
                RenderAction::Present(render::paused(*remaining, &self.exercise, &self.workout))
            }
            TimerEvent::Finished => {
                RenderAction::Present(render::finished(&self.exercise, &self.workout))
            }
            TimerEvent::Stopped | TimerEvent::Cleared => RenderAction::Dismiss,
        }
    }
}

/// Background task that keeps the notification in sync with the timer
pub async fn notification_renderer_task(
    mut events: broadcast::Receiver<TimerEvent>,
    presenter: Arc<dyn NotificationPresenter>,
    permission: Arc<dyn PermissionQuery>,
) {
    info!("Starting notification renderer task");

    let mut renderer = NotificationRenderer::new();

    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Notification renderer lagged, skipped {} timer events", skipped);
                continue;
            }
            Err(RecvError::Closed) => {
                info!("Timer event channel closed, stopping notification renderer");
                break;
            }
        };

        let action = renderer.on_event(&event, permission.notification_permission());
        let result = match &action {
            RenderAction::Present(notification) => presenter.present(notification),
            RenderAction::Dismiss => presenter.dismiss(),
            RenderAction::Suppressed { warn: true } => {
                warn!("Notification permission denied, timer runs without notification");
                continue;
            }
            RenderAction::Suppressed { warn: false } | RenderAction::Nothing => continue,
        };

        if let Err(e) = result {
            warn!("Failed to update notification for {} event: {}", event.kind(), e);
        } else {
            debug!("Notification updated for {} event", event.kind());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Result,
        notification::{PermissionState, StaticPermission},
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPresenter {
        shown: Mutex<Vec<Notification>>,
        dismissed: Mutex<usize>,
    }

    impl NotificationPresenter for RecordingPresenter {
        fn present(&self, notification: &Notification) -> Result<()> {
            self.shown.lock().unwrap().push(notification.clone());
            Ok(())
        }

        fn dismiss(&self) -> Result<()> {
            *self.dismissed.lock().unwrap() += 1;
            Ok(())
        }
    }

    const GRANTED: PermissionState = PermissionState::Granted;
    const DENIED: PermissionState = PermissionState::Denied;

    fn started(remaining: u64) -> TimerEvent {
        TimerEvent::Started {
            remaining,
            exercise: "Squat".to_string(),
            workout: "Leg Day".to_string(),
        }
    }

    #[test]
    fn test_renderer_uses_labels_from_start() {
        let mut renderer = NotificationRenderer::new();
        assert_eq!(
            renderer.on_event(&started(90), GRANTED),
            RenderAction::Present(render::running(90, "Squat", "Leg Day"))
        );
        assert_eq!(
            renderer.on_event(&TimerEvent::Tick { remaining: 89 }, GRANTED),
            RenderAction::Present(render::running(89, "Squat", "Leg Day"))
        );
        assert_eq!(
            renderer.on_event(&TimerEvent::Paused { remaining: 89 }, GRANTED),
            RenderAction::Present(render::paused(89, "Squat", "Leg Day"))
        );
        assert_eq!(
            renderer.on_event(&TimerEvent::Finished, GRANTED),
            RenderAction::Present(render::finished("Squat", "Leg Day"))
        );
        assert_eq!(renderer.on_event(&TimerEvent::Cleared, GRANTED), RenderAction::Dismiss);
        assert_eq!(renderer.on_event(&TimerEvent::Stopped, GRANTED), RenderAction::Dismiss);
    }

    #[test]
    fn test_pause_and_resume_rerender_notification() {
        let mut renderer = NotificationRenderer::new();
        renderer.on_event(&started(60), GRANTED);
        renderer.on_event(&TimerEvent::Tick { remaining: 42 }, GRANTED);

        assert_eq!(
            renderer.on_event(&TimerEvent::Paused { remaining: 42 }, GRANTED),
            RenderAction::Present(render::paused(42, "Squat", "Leg Day"))
        );
        let resumed = TimerEvent::Resumed {
            remaining: 42,
            exercise: "Squat".to_string(),
            workout: "Leg Day".to_string(),
        };
        let RenderAction::Present(notification) = renderer.on_event(&resumed, GRANTED) else {
            panic!("resume must re-render the running notification");
        };
        assert_eq!(notification, render::running(42, "Squat", "Leg Day"));
        assert_eq!(notification.title, "⏱ 0:42  REST");
        assert!(notification.ongoing);
    }

    #[test]
    fn test_denied_permission_warns_once_per_session() {
        let mut renderer = NotificationRenderer::new();
        assert_eq!(
            renderer.on_event(&started(30), DENIED),
            RenderAction::Suppressed { warn: true }
        );
        assert_eq!(
            renderer.on_event(&TimerEvent::Tick { remaining: 29 }, DENIED),
            RenderAction::Suppressed { warn: false }
        );
        assert_eq!(
            renderer.on_event(&TimerEvent::Finished, DENIED),
            RenderAction::Suppressed { warn: false }
        );
        assert_eq!(renderer.on_event(&TimerEvent::Cleared, DENIED), RenderAction::Dismiss);

        // a new session warns again
        assert_eq!(
            renderer.on_event(&started(30), DENIED),
            RenderAction::Suppressed { warn: true }
        );
        assert_eq!(
            renderer.on_event(&TimerEvent::Paused { remaining: 30 }, DENIED),
            RenderAction::Suppressed { warn: false }
        );
    }

    #[test]
    fn test_zero_length_start_renders_nothing() {
        let mut renderer = NotificationRenderer::new();
        assert_eq!(renderer.on_event(&started(0), GRANTED), RenderAction::Nothing);
    }

    #[tokio::test]
    async fn test_task_presents_when_permitted() {
        let (tx, rx) = broadcast::channel(16);
        let presenter = Arc::new(RecordingPresenter::default());
        let handle = tokio::spawn(notification_renderer_task(
            rx,
            presenter.clone(),
            Arc::new(StaticPermission::granted()),
        ));

        tx.send(started(5)).unwrap();
        tx.send(TimerEvent::Tick { remaining: 4 }).unwrap();
        tx.send(TimerEvent::Stopped).unwrap();
        drop(tx);
        handle.await.unwrap();

        let shown = presenter.shown.lock().unwrap();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[1].title, "⏱ 0:04  REST");
        assert_eq!(*presenter.dismissed.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_task_skips_rendering_without_permission() {
        let (tx, rx) = broadcast::channel(16);
        let presenter = Arc::new(RecordingPresenter::default());
        let handle = tokio::spawn(notification_renderer_task(
            rx,
            presenter.clone(),
            Arc::new(StaticPermission(DENIED)),
        ));

        tx.send(started(5)).unwrap();
        tx.send(TimerEvent::Tick { remaining: 4 }).unwrap();
        tx.send(TimerEvent::Finished).unwrap();
        drop(tx);
        handle.await.unwrap();

        assert!(presenter.shown.lock().unwrap().is_empty());
    }
}

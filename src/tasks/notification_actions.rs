//! Handling of buttons pressed on the timer notification

use tracing::{debug, error, info};

use crate::{
    notification::{ActionReceiver, NotificationAction},
    services::WeakTimerService,
};

/// Apply notification actions to the controller until every sender is gone
pub async fn notification_action_task(mut actions: ActionReceiver, service: WeakTimerService) {
    debug!("Starting notification action handler");

    while let Some(action) = actions.recv().await {
        let Some(timer) = service.upgrade() else {
            debug!("Timer service dropped, ending notification action handler");
            return;
        };

        match action {
            NotificationAction::Stop => match timer.stop() {
                Ok(true) => info!("Timer stopped from notification"),
                Ok(false) => debug!("Stop pressed with no active timer"),
                Err(e) => error!("Failed to stop timer from notification: {}", e),
            },
        }
    }

    debug!("Notification action channel closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    use crate::{services::TimerService, state::TimerStatus};

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_action_stops_running_timer() {
        let service = TimerService::default();
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = tokio::spawn(notification_action_task(rx, service.downgrade()));

        service.start(Duration::from_secs(30), "Squat", "Legs").unwrap();
        tx.send(NotificationAction::Stop).unwrap();
        settle().await;
        assert_eq!(service.status().unwrap(), TimerStatus::idle());

        // pressing stop again is harmless
        tx.send(NotificationAction::Stop).unwrap();
        settle().await;
        assert!(!handler.is_finished());

        drop(tx);
        handler.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_ends_when_service_dropped() {
        let service = TimerService::default();
        let (tx, rx) = mpsc::unbounded_channel();
        let handler = tokio::spawn(notification_action_task(rx, service.downgrade()));

        drop(service);
        tx.send(NotificationAction::Stop).unwrap();
        handler.await.unwrap();
    }
}

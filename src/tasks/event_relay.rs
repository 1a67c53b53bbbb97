//! Relay of controller events to bridge listeners

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::{bridge::BridgeEvent, services::TimerEvent};

/// Forward tick and finish events from the controller to bridge listeners
pub async fn event_relay_task(
    mut events: broadcast::Receiver<TimerEvent>,
    listeners: broadcast::Sender<BridgeEvent>,
) {
    debug!("Starting bridge event relay");

    loop {
        match events.recv().await {
            Ok(event) => {
                let Some(bridge_event) = BridgeEvent::from_timer_event(&event) else {
                    continue;
                };
                // no listeners is fine, events are not buffered for late subscribers
                if listeners.send(bridge_event).is_err() {
                    debug!("No bridge listeners for {} event", event.kind());
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Bridge event relay lagged, skipped {} timer events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Timer event channel closed, stopping bridge event relay");
                break;
            }
        }
    }
}

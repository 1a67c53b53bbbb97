//! Bridge between the UI surface and the timer controller
//!
//! The bridge exposes the five timer verbs and fans controller events out to
//! any number of listeners. The controller is attached and detached
//! explicitly; a start request that arrives before attachment waits for it
//! (bounded by the attach timeout) instead of guessing with a fixed delay.

pub mod messages;

use std::{sync::Mutex, time::Duration};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
    time::timeout,
};
use tracing::{debug, info, warn};

use crate::{
    error::{Result, TimerError},
    services::TimerService,
    state::TimerStatus,
    tasks::event_relay_task,
};

pub use messages::{
    BridgeEvent, PauseReply, PermissionReply, ResumeReply, StartDefaults, StartReply,
    StartTimerRequest, StopReply,
};

/// Capacity of the listener channel
const LISTENER_CHANNEL_CAPACITY: usize = 64;

/// Longest rest accepted by `startTimer`; the countdown keeps milliseconds in a `u64`
pub const MAX_START_SECONDS: u64 = u64::MAX / 1000;

/// Default time a start request waits for the controller to attach
pub const DEFAULT_ATTACH_TIMEOUT: Duration = Duration::from_secs(5);

/// Façade translating UI verbs into controller calls
#[derive(Debug)]
pub struct TimerBridge {
    /// Attached controller; `None` while detached
    slot_tx: watch::Sender<Option<TimerService>>,
    listeners_tx: broadcast::Sender<BridgeEvent>,
    relay: Mutex<Option<JoinHandle<()>>>,
    attach_timeout: Duration,
    defaults: StartDefaults,
}

impl TimerBridge {
    /// Create a detached bridge
    pub fn new(attach_timeout: Duration, defaults: StartDefaults) -> Self {
        let (slot_tx, _) = watch::channel(None);
        let (listeners_tx, _) = broadcast::channel(LISTENER_CHANNEL_CAPACITY);

        Self {
            slot_tx,
            listeners_tx,
            relay: Mutex::new(None),
            attach_timeout,
            defaults,
        }
    }

    /// Attach a controller, replacing any previous one, and start relaying its events
    pub fn attach(&self, service: TimerService) -> Result<()> {
        let relay = tokio::spawn(event_relay_task(
            service.subscribe(),
            self.listeners_tx.clone(),
        ));
        if let Some(previous_relay) = self.relay.lock()?.replace(relay) {
            previous_relay.abort();
        }

        if self.slot_tx.send_replace(Some(service)).is_some() {
            info!("Timer service re-attached, previous controller replaced");
        } else {
            info!("Timer service attached");
        }
        Ok(())
    }

    /// Detach the controller and return to the not-attached state
    pub fn detach(&self) -> Result<Option<TimerService>> {
        let previous = self.slot_tx.send_replace(None);
        if let Some(relay) = self.relay.lock()?.take() {
            relay.abort();
        }

        if previous.is_some() {
            info!("Timer service detached");
        }
        Ok(previous)
    }

    pub fn is_attached(&self) -> bool {
        self.slot_tx.borrow().is_some()
    }

    /// The attached controller, if any
    pub fn service(&self) -> Option<TimerService> {
        self.slot_tx.borrow().clone()
    }

    /// Register a listener for `timerTick` and `timerComplete` events
    pub fn add_listener(&self) -> broadcast::Receiver<BridgeEvent> {
        self.listeners_tx.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners_tx.receiver_count()
    }

    /// Wait until a controller is attached, up to the attach timeout
    async fn wait_attached(&self) -> Result<TimerService> {
        if let Some(service) = self.service() {
            return Ok(service);
        }

        debug!(
            "Timer service not attached yet, waiting up to {:?}",
            self.attach_timeout
        );
        let mut slot_rx = self.slot_tx.subscribe();
        let attached = match timeout(self.attach_timeout, slot_rx.wait_for(Option::is_some)).await {
            Ok(Ok(slot)) => (*slot).clone(),
            Ok(Err(_)) | Err(_) => None,
        };
        attached.ok_or(TimerError::ServiceUnavailable)
    }

    /// `startTimer`: start a countdown, rejected when no controller attaches in time
    pub async fn start_timer(&self, request: StartTimerRequest) -> Result<StartReply> {
        let seconds = request.seconds.unwrap_or(self.defaults.seconds);
        if seconds > MAX_START_SECONDS {
            warn!("Rejecting startTimer: {}s is out of range", seconds);
            return Err(TimerError::InvalidDuration(seconds));
        }
        let exercise = request
            .exercise
            .unwrap_or_else(|| self.defaults.exercise.clone());
        let workout = request
            .workout
            .unwrap_or_else(|| self.defaults.workout.clone());
        debug!(
            "startTimer: {}s, exercise: {}, workout: {}",
            seconds, exercise, workout
        );

        let service = match self.wait_attached().await {
            Ok(service) => service,
            Err(e) => {
                warn!("Rejecting startTimer: {}", e);
                return Err(e);
            }
        };
        service.start(Duration::from_secs(seconds), &exercise, &workout)?;
        Ok(StartReply { started: true })
    }

    /// `stopTimer`: succeeds whether or not anything was running
    pub fn stop_timer(&self) -> Result<StopReply> {
        if let Some(service) = self.service() {
            service.stop()?;
        } else {
            debug!("stopTimer with no timer service attached");
        }
        Ok(StopReply { stopped: true })
    }

    /// `pauseTimer`: no-op unless a countdown is running
    pub fn pause_timer(&self) -> Result<PauseReply> {
        if let Some(service) = self.service() {
            service.pause()?;
        } else {
            debug!("pauseTimer with no timer service attached");
        }
        Ok(PauseReply { paused: true })
    }

    /// `resumeTimer`: no-op unless a countdown is paused
    pub fn resume_timer(&self) -> Result<ResumeReply> {
        if let Some(service) = self.service() {
            service.resume()?;
        } else {
            debug!("resumeTimer with no timer service attached");
        }
        Ok(ResumeReply { resumed: true })
    }

    /// `isRunning`: status snapshot, idle when detached
    pub fn is_running(&self) -> Result<TimerStatus> {
        match self.service() {
            Some(service) => service.status(),
            None => Ok(TimerStatus::idle()),
        }
    }
}

impl Default for TimerBridge {
    fn default() -> Self {
        Self::new(DEFAULT_ATTACH_TIMEOUT, StartDefaults::default())
    }
}

impl Drop for TimerBridge {
    fn drop(&mut self) {
        if let Ok(mut relay) = self.relay.lock() {
            if let Some(handle) = relay.take() {
                handle.abort();
            }
        }
    }
}

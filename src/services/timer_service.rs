//! Rest timer controller
//!
//! Owns the single live [`TimerSession`] and the countdown task driving it.
//! Every mutation (external calls and ticks alike) goes through one mutex, and
//! each countdown is tagged with a generation number so that a cancelled
//! countdown can never apply another tick.

use std::{
    sync::{Arc, Mutex, Weak},
    time::Duration,
};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info};

use super::TimerEvent;
use crate::{
    error::Result,
    state::{TickOutcome, TimerPhase, TimerSession, TimerStatus},
    tasks::{countdown_task, finished_hold_task},
};

/// Capacity of the controller event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Default time a finished timer stays visible before going idle
pub const DEFAULT_FINISHED_HOLD: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
struct Controller {
    session: Option<TimerSession>,
    generation: u64,
    countdown: Option<JoinHandle<()>>,
}

impl Controller {
    /// Invalidate the live countdown. No tick of the old generation applies after this.
    fn cancel_countdown(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
    }

    fn phase(&self) -> TimerPhase {
        self.session
            .as_ref()
            .map(TimerSession::phase)
            .unwrap_or(TimerPhase::Idle)
    }
}

#[derive(Debug)]
struct Shared {
    controller: Mutex<Controller>,
    events_tx: broadcast::Sender<TimerEvent>,
    finished_hold: Duration,
}

/// Handle to the timer controller. Clones share the same timer.
///
/// Operations that begin a countdown spawn a tokio task and must be called
/// from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TimerService {
    shared: Arc<Shared>,
}

/// Non-owning handle held by the countdown task
#[derive(Debug, Clone)]
pub struct WeakTimerService(Weak<Shared>);

impl WeakTimerService {
    pub fn upgrade(&self) -> Option<TimerService> {
        self.0.upgrade().map(|shared| TimerService { shared })
    }
}

impl TimerService {
    /// Create an idle controller with the given finished display hold
    pub fn new(finished_hold: Duration) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                controller: Mutex::new(Controller::default()),
                events_tx,
                finished_hold,
            }),
        }
    }

    /// Subscribe to controller events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.shared.events_tx.subscribe()
    }

    pub fn downgrade(&self) -> WeakTimerService {
        WeakTimerService(Arc::downgrade(&self.shared))
    }

    pub fn finished_hold(&self) -> Duration {
        self.shared.finished_hold
    }

    /// Start a new countdown, replacing any live one
    pub fn start(&self, duration: Duration, exercise: &str, workout: &str) -> Result<TimerStatus> {
        let mut ctl = self.shared.controller.lock()?;
        if ctl.session.is_some() {
            debug!("Replacing live timer session");
        }
        ctl.cancel_countdown();

        let session = TimerSession::new(duration, exercise, workout);
        info!(
            "Starting rest timer: {}s, exercise: {}, workout: {}",
            session.remaining_secs(),
            exercise,
            workout
        );
        self.emit(TimerEvent::Started {
            remaining: session.remaining_secs(),
            exercise: exercise.to_string(),
            workout: workout.to_string(),
        });

        let finished_at_start = session.phase() == TimerPhase::Finished;
        let status = TimerStatus::of(Some(&session));
        ctl.session = Some(session);

        let generation = ctl.generation;
        let weak = self.downgrade();
        if finished_at_start {
            info!("Rest timer started with zero duration, finishing immediately");
            self.emit(TimerEvent::Finished);
            ctl.countdown = Some(tokio::spawn(finished_hold_task(weak, generation)));
        } else {
            ctl.countdown = Some(tokio::spawn(countdown_task(weak, generation)));
        }

        Ok(status)
    }

    /// Stop the timer from any phase. Returns false if it was already idle.
    pub fn stop(&self) -> Result<bool> {
        let mut ctl = self.shared.controller.lock()?;
        ctl.cancel_countdown();

        if ctl.session.take().is_none() {
            debug!("Stop requested while idle, nothing to do");
            return Ok(false);
        }

        info!("Rest timer stopped");
        self.emit(TimerEvent::Stopped);
        Ok(true)
    }

    /// Pause a running countdown. Returns false if it was not running.
    pub fn pause(&self) -> Result<bool> {
        let mut ctl = self.shared.controller.lock()?;
        let Some(session) = ctl.session.as_mut().filter(|s| s.is_running()) else {
            debug!("Pause requested while not running, nothing to do");
            return Ok(false);
        };
        session.pause();
        let remaining = session.remaining_secs();
        ctl.cancel_countdown();

        info!("Rest timer paused with {}s remaining", remaining);
        self.emit(TimerEvent::Paused { remaining });
        Ok(true)
    }

    /// Resume a paused countdown from its remaining time. Returns false if nothing was paused.
    pub fn resume(&self) -> Result<bool> {
        let mut ctl = self.shared.controller.lock()?;
        let resumed = ctl.session.as_mut().is_some_and(TimerSession::resume);
        let event = match ctl.session.as_ref() {
            Some(session) if resumed => TimerEvent::Resumed {
                remaining: session.remaining_secs(),
                exercise: session.exercise().to_string(),
                workout: session.workout().to_string(),
            },
            _ => {
                debug!("Resume requested with nothing paused, nothing to do");
                return Ok(false);
            }
        };
        ctl.cancel_countdown();
        let generation = ctl.generation;
        ctl.countdown = Some(tokio::spawn(countdown_task(self.downgrade(), generation)));

        if let TimerEvent::Resumed { remaining, .. } = &event {
            info!("Rest timer resumed with {}s remaining", remaining);
        }
        self.emit(event);
        Ok(true)
    }

    /// Snapshot of running flag and remaining seconds
    pub fn status(&self) -> Result<TimerStatus> {
        let ctl = self.shared.controller.lock()?;
        Ok(TimerStatus::of(ctl.session.as_ref()))
    }

    /// Current state machine phase
    pub fn phase(&self) -> Result<TimerPhase> {
        Ok(self.shared.controller.lock()?.phase())
    }

    /// Copy of the live session, if any
    pub fn session(&self) -> Result<Option<TimerSession>> {
        Ok(self.shared.controller.lock()?.session.clone())
    }

    /// Apply one tick of the countdown identified by `generation`
    pub(crate) fn handle_tick(&self, generation: u64) -> Result<TickOutcome> {
        let mut ctl = self.shared.controller.lock()?;
        if ctl.generation != generation {
            return Ok(TickOutcome::Ignored);
        }
        let Some(session) = ctl.session.as_mut() else {
            return Ok(TickOutcome::Ignored);
        };

        let outcome = session.tick();
        match outcome {
            TickOutcome::Ticked(remaining) => {
                debug!("Rest timer tick: {}s remaining", remaining);
                self.emit(TimerEvent::Tick { remaining });
            }
            TickOutcome::Finished => {
                info!("Rest timer finished");
                self.emit(TimerEvent::Finished);
            }
            TickOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// Move a finished timer back to idle once its display hold is over
    pub(crate) fn clear_finished(&self, generation: u64) -> Result<bool> {
        let mut ctl = self.shared.controller.lock()?;
        if ctl.generation != generation || ctl.phase() != TimerPhase::Finished {
            return Ok(false);
        }

        ctl.session = None;
        // this is the handle of the task calling us, let it run to completion
        ctl.countdown = None;
        debug!("Finished timer cleared");
        self.emit(TimerEvent::Cleared);
        Ok(true)
    }

    fn emit(&self, event: TimerEvent) {
        let kind = event.kind();
        if self.shared.events_tx.send(event).is_err() {
            debug!("No subscribers for timer event: {}", kind);
        }
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new(DEFAULT_FINISHED_HOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, sleep};

    /// Let spawned tasks observe the current paused clock
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    /// Advance the paused clock one whole second at a time
    async fn advance_secs(secs: u64) {
        for _ in 0..secs {
            advance(Duration::from_secs(1)).await;
            settle().await;
        }
    }

    fn drain(rx: &mut broadcast::Receiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_reports_full_duration() {
        let service = TimerService::default();
        let status = service.start(Duration::from_secs(90), "Squat", "Leg Day").unwrap();
        assert_eq!(status, TimerStatus::running(90));
        assert_eq!(service.status().unwrap(), TimerStatus::running(90));
        assert_eq!(service.phase().unwrap(), TimerPhase::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_decrement_remaining() {
        let service = TimerService::default();
        let mut rx = service.subscribe();
        service.start(Duration::from_secs(10), "Bench", "Push").unwrap();
        settle().await;

        advance_secs(4).await;
        assert_eq!(service.status().unwrap(), TimerStatus::running(6));

        let ticks: Vec<u64> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                TimerEvent::Tick { remaining } => Some(remaining),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![9, 8, 7, 6]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finishes_once_then_clears_after_hold() {
        let service = TimerService::new(Duration::from_secs(2));
        let mut rx = service.subscribe();
        service.start(Duration::from_secs(3), "Deadlift", "Pull").unwrap();
        settle().await;

        advance_secs(3).await;
        assert_eq!(service.status().unwrap(), TimerStatus::idle());
        assert_eq!(service.phase().unwrap(), TimerPhase::Finished);

        advance_secs(5).await;
        assert_eq!(service.phase().unwrap(), TimerPhase::Idle);

        let events = drain(&mut rx);
        let finished = events.iter().filter(|e| **e == TimerEvent::Finished).count();
        assert_eq!(finished, 1);
        assert_eq!(events.last(), Some(&TimerEvent::Cleared));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_and_resume_continue_from_remaining() {
        let service = TimerService::default();
        service.start(Duration::from_secs(20), "Row", "Pull").unwrap();
        settle().await;

        advance_secs(5).await;
        assert!(service.pause().unwrap());
        assert_eq!(
            service.status().unwrap(),
            TimerStatus {
                running: false,
                remaining: 15
            }
        );

        // paused timers do not tick
        advance_secs(10).await;
        assert_eq!(service.status().unwrap().remaining, 15);
        assert!(!service.pause().unwrap());

        assert!(service.resume().unwrap());
        settle().await;
        assert!(!service.resume().unwrap());
        advance_secs(5).await;
        assert_eq!(service.status().unwrap(), TimerStatus::running(10));

        let session = service.session().unwrap().unwrap();
        assert_eq!(session.exercise(), "Row");
        assert_eq!(session.workout(), "Pull");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_from_any_phase_goes_idle() {
        let service = TimerService::default();
        assert!(!service.stop().unwrap());

        service.start(Duration::from_secs(30), "A", "B").unwrap();
        assert!(service.stop().unwrap());
        assert_eq!(service.status().unwrap(), TimerStatus::idle());
        assert_eq!(service.phase().unwrap(), TimerPhase::Idle);

        service.start(Duration::from_secs(30), "A", "B").unwrap();
        service.pause().unwrap();
        assert!(service.stop().unwrap());
        assert_eq!(service.phase().unwrap(), TimerPhase::Idle);

        service.start(Duration::from_secs(1), "A", "B").unwrap();
        settle().await;
        advance_secs(1).await;
        assert_eq!(service.phase().unwrap(), TimerPhase::Finished);
        assert!(service.stop().unwrap());
        assert_eq!(service.phase().unwrap(), TimerPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_after_stop() {
        let service = TimerService::default();
        let mut rx = service.subscribe();
        service.start(Duration::from_secs(10), "A", "B").unwrap();
        settle().await;
        advance_secs(2).await;
        service.stop().unwrap();
        drain(&mut rx);

        advance_secs(5).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_live_session() {
        let service = TimerService::default();
        let mut rx = service.subscribe();
        service.start(Duration::from_secs(10), "First", "W").unwrap();
        settle().await;
        advance_secs(3).await;

        service.start(Duration::from_secs(60), "Second", "W").unwrap();
        settle().await;
        advance_secs(1).await;
        assert_eq!(service.status().unwrap(), TimerStatus::running(59));

        // only one countdown ticks after the restart
        let after_restart: Vec<TimerEvent> = drain(&mut rx)
            .into_iter()
            .skip_while(|e| !matches!(e, TimerEvent::Started { exercise, .. } if exercise == "Second"))
            .collect();
        assert_eq!(after_restart.len(), 2);
        assert_eq!(after_restart[1], TimerEvent::Tick { remaining: 59 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_is_ignored() {
        let service = TimerService::default();
        service.start(Duration::from_secs(10), "A", "B").unwrap();
        assert_eq!(service.handle_tick(u64::MAX).unwrap(), TickOutcome::Ignored);
        assert_eq!(service.status().unwrap().remaining, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_finishes_immediately() {
        let service = TimerService::new(Duration::from_millis(500));
        let mut rx = service.subscribe();
        let status = service.start(Duration::ZERO, "A", "B").unwrap();
        assert_eq!(status, TimerStatus::idle());
        assert_eq!(service.phase().unwrap(), TimerPhase::Finished);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(service.phase().unwrap(), TimerPhase::Idle);
        let events = drain(&mut rx);
        assert!(matches!(events[0], TimerEvent::Started { remaining: 0, .. }));
        assert_eq!(events[1], TimerEvent::Finished);
        assert_eq!(events[2], TimerEvent::Cleared);
    }
}

//! Countdown background task

use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{debug, error};

use crate::{
    services::WeakTimerService,
    state::{TickOutcome, TICK_PERIOD},
};

/// Drive one countdown generation until it finishes or is cancelled.
///
/// The first tick lands one period after the task starts. Once the session
/// finishes, the task carries on as the finished display hold.
pub async fn countdown_task(service: WeakTimerService, generation: u64) {
    debug!("Countdown task started for generation {}", generation);

    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(timer) = service.upgrade() else {
            debug!("Timer service dropped, ending countdown");
            return;
        };

        match timer.handle_tick(generation) {
            Ok(TickOutcome::Ticked(_)) => {}
            Ok(TickOutcome::Finished) => break,
            Ok(TickOutcome::Ignored) => {
                debug!("Countdown generation {} is stale, ending", generation);
                return;
            }
            Err(e) => {
                error!("Failed to apply timer tick: {}", e);
                return;
            }
        }
    }

    finished_hold_task(service, generation).await;
}

/// Keep a finished timer visible for the hold window, then clear it
pub async fn finished_hold_task(service: WeakTimerService, generation: u64) {
    let Some(hold) = service.upgrade().map(|timer| timer.finished_hold()) else {
        return;
    };

    sleep(hold).await;

    if let Some(timer) = service.upgrade() {
        if let Err(e) = timer.clear_finished(generation) {
            error!("Failed to clear finished timer: {}", e);
        }
    }
}

//! Timer session and its countdown state machine

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Length of one countdown step
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const TICK_MS: u64 = TICK_PERIOD.as_millis() as u64;

/// Phase of the rest timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Result of applying one tick to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown advanced, carries the remaining seconds
    Ticked(u64),
    /// Countdown reached zero on this tick
    Finished,
    /// The session was not running, nothing changed
    Ignored,
}

/// State of the live countdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSession {
    duration_ms: u64,
    remaining_ms: u64,
    exercise: String,
    workout: String,
    phase: TimerPhase,
}

impl TimerSession {
    /// Create a running session with the full duration remaining.
    ///
    /// A zero duration yields a session that is already finished. Durations
    /// beyond `u64::MAX` milliseconds are clamped.
    pub fn new(duration: Duration, exercise: impl Into<String>, workout: impl Into<String>) -> Self {
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            exercise: exercise.into(),
            workout: workout.into(),
            phase: if duration_ms == 0 {
                TimerPhase::Finished
            } else {
                TimerPhase::Running
            },
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Remaining time rounded up to whole seconds
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    pub fn exercise(&self) -> &str {
        &self.exercise
    }

    pub fn workout(&self) -> &str {
        &self.workout
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Advance the countdown by one tick period
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != TimerPhase::Running {
            return TickOutcome::Ignored;
        }

        self.remaining_ms = self.remaining_ms.saturating_sub(TICK_MS);
        if self.remaining_ms == 0 {
            self.phase = TimerPhase::Finished;
            TickOutcome::Finished
        } else {
            TickOutcome::Ticked(self.remaining_secs())
        }
    }

    /// Suspend the countdown, keeping the remaining time. Returns false if not running.
    pub fn pause(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }
        self.phase = TimerPhase::Paused;
        true
    }

    /// Continue a paused countdown. Returns false if there is nothing to resume.
    pub fn resume(&mut self) -> bool {
        if self.phase != TimerPhase::Paused || self.remaining_ms == 0 {
            return false;
        }
        self.phase = TimerPhase::Running;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(secs: u64) -> TimerSession {
        TimerSession::new(Duration::from_secs(secs), "Squat", "Leg Day")
    }

    #[test]
    fn test_new_session_is_running_with_full_duration() {
        for d in [1, 2, 45, 90, 600] {
            let s = session(d);
            assert!(s.is_running());
            assert_eq!(s.remaining_secs(), d);
            assert_eq!(s.duration_ms(), d * 1000);
        }
    }

    #[test]
    fn test_zero_duration_is_finished() {
        let s = session(0);
        assert_eq!(s.phase(), TimerPhase::Finished);
        assert!(!s.is_running());
        assert_eq!(s.remaining_secs(), 0);
    }

    #[test]
    fn test_ticks_reduce_remaining_by_one_second_each() {
        let mut s = session(10);
        for n in 1..10 {
            assert_eq!(s.tick(), TickOutcome::Ticked(10 - n));
            assert!(s.is_running());
        }
        assert_eq!(s.tick(), TickOutcome::Finished);
        assert_eq!(s.remaining_ms(), 0);
        assert_eq!(s.phase(), TimerPhase::Finished);
        // completion is reported once
        assert_eq!(s.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_oversized_duration_is_clamped_not_wrapped() {
        let s = TimerSession::new(Duration::from_secs(18_446_744_073_709_552), "a", "b");
        assert_eq!(s.duration_ms(), u64::MAX);
        assert_eq!(s.remaining_ms(), u64::MAX);
        assert!(s.is_running());
    }

    #[test]
    fn test_fractional_duration_rounds_up() {
        let mut s = TimerSession::new(Duration::from_millis(1500), "a", "b");
        assert_eq!(s.remaining_secs(), 2);
        assert_eq!(s.tick(), TickOutcome::Ticked(1));
        assert_eq!(s.tick(), TickOutcome::Finished);
    }

    #[test]
    fn test_pause_resume_keeps_remaining() {
        let mut s = session(90);
        for _ in 0..30 {
            s.tick();
        }
        assert!(s.pause());
        assert_eq!(s.phase(), TimerPhase::Paused);
        assert_eq!(s.remaining_secs(), 60);
        assert_eq!(s.tick(), TickOutcome::Ignored);
        assert!(!s.pause());

        assert!(s.resume());
        assert!(s.is_running());
        assert_eq!(s.remaining_secs(), 60);
        assert_eq!(s.exercise(), "Squat");
        assert_eq!(s.workout(), "Leg Day");
    }

    #[test]
    fn test_resume_requires_paused_session() {
        let mut s = session(5);
        assert!(!s.resume());

        let mut done = session(1);
        done.tick();
        assert!(!done.resume());
        assert_eq!(done.phase(), TimerPhase::Finished);
    }

    #[test]
    fn test_remaining_never_exceeds_duration() {
        let mut s = session(3);
        while s.tick() != TickOutcome::Ignored {
            assert!(s.remaining_ms() <= s.duration_ms());
        }
        assert_eq!(s.remaining_ms(), 0);
    }
}

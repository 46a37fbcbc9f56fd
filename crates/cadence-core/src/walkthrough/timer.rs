//! Per-step countdown.

use serde::{Deserialize, Serialize};

/// State of a step timer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "state", content = "remaining")]
pub enum TimerState {
    /// Not started for this presentation
    Idle,

    /// Counting down; holds the remaining seconds
    Running(u32),

    /// Ran to zero
    Expired,
}

/// Countdown attached to one presentation of a timed step.
///
/// There is no cancel: once started the timer must run out before the step
/// can be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTimer {
    duration_seconds: u32,
    state: TimerState,
}

impl StepTimer {
    /// Creates an idle timer.
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            duration_seconds,
            state: TimerState::Idle,
        }
    }

    /// Full duration in seconds.
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// Current state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Starts (or restarts after expiry) the countdown from the full
    /// duration. Returns false when the timer is already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = if self.duration_seconds == 0 {
            TimerState::Expired
        } else {
            TimerState::Running(self.duration_seconds)
        };
        true
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TimerState {
        if let TimerState::Running(remaining) = self.state {
            self.state = match remaining.saturating_sub(1) {
                0 => TimerState::Expired,
                left => TimerState::Running(left),
            };
        }
        self.state
    }

    /// True while counting down.
    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running(_))
    }

    /// Seconds left; the full duration when idle and zero once expired.
    pub fn remaining_seconds(&self) -> u32 {
        match self.state {
            TimerState::Idle => self.duration_seconds,
            TimerState::Running(remaining) => remaining,
            TimerState::Expired => 0,
        }
    }

    /// Fraction of the countdown already elapsed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.duration_seconds == 0 {
            return 1.0;
        }
        let elapsed = self.duration_seconds - self.remaining_seconds();
        f64::from(elapsed) / f64::from(self.duration_seconds)
    }
}

//! Countdown timer state machine

use std::fmt;

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use crate::error::TransitionError;

/// Extra millisecond span added to H/M/S requests so the last requested
/// second stays on screen for a full second.
pub const PADDING_MS: u64 = 1_000;

/// Largest remaining time `HH:MM:SS` can show, 99:59:59.999
pub const MAX_DISPLAY_MS: u64 = 100 * 3600 * 1000 - 1;

/// Requested timer duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartRequest {
    /// Raw duration, used as-is
    Millis { duration_ms: u64 },
    /// Picker-style duration, padded by [`PADDING_MS`]
    Hms {
        #[serde(default)]
        hours: u32,
        #[serde(default)]
        minutes: u32,
        #[serde(default)]
        seconds: u32,
    },
}

impl StartRequest {
    pub fn hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self::Hms {
            hours,
            minutes,
            seconds,
        }
    }

    pub fn millis(duration_ms: u64) -> Self {
        Self::Millis { duration_ms }
    }

    /// Duration the engine arms its target with, padding included
    pub fn duration_ms(&self) -> u64 {
        match *self {
            Self::Millis { duration_ms } => duration_ms,
            Self::Hms {
                hours,
                minutes,
                seconds,
            } => {
                let secs = u64::from(hours) * 3600 + u64::from(minutes) * 60 + u64::from(seconds);
                secs * 1000 + PADDING_MS
            }
        }
    }
}

/// Phase of the engine together with the only value valid in that phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Clock reading at which the timer reaches zero
    Running { target_ms: u64 },
    /// Remaining time captured at pause; negative if paused past expiry
    Paused { remaining_ms: i64 },
}

/// Data-less phase label used in snapshots and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        };
        f.write_str(name)
    }
}

impl From<Phase> for TimerPhase {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Idle => Self::Idle,
            Phase::Running { .. } => Self::Running,
            Phase::Paused { .. } => Self::Paused,
        }
    }
}

/// Countdown timer driven by a monotonic [`Clock`].
///
/// `pause`, `resume` and `stop` never fail: calling them from a phase that
/// does not allow them leaves the engine untouched. Callers that need to
/// detect misuse use [`try_pause`](Self::try_pause) and
/// [`try_resume`](Self::try_resume).
#[derive(Debug)]
pub struct TimerEngine<C: Clock> {
    clock: C,
    phase: Phase,
    total_duration_ms: Option<u64>,
}

impl<C: Clock> TimerEngine<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            phase: Phase::Idle,
            total_duration_ms: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timer_phase(&self) -> TimerPhase {
        self.phase.into()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Duration of the current (or last) session, 0 before the first start
    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms.unwrap_or(0)
    }

    /// Remaining time frozen by the last pause, while paused
    pub fn saved_remaining_ms(&self) -> Option<i64> {
        match self.phase {
            Phase::Paused { remaining_ms } => Some(remaining_ms),
            _ => None,
        }
    }

    /// Begin a new session, discarding whatever phase the engine was in
    pub fn start(&mut self, request: StartRequest) {
        let total = request.duration_ms();
        self.total_duration_ms = Some(total);
        self.phase = Phase::Running {
            target_ms: self.clock.now_ms().saturating_add(total),
        };
    }

    pub fn start_millis(&mut self, duration_ms: u64) {
        self.start(StartRequest::millis(duration_ms));
    }

    pub fn start_hms(&mut self, hours: u32, minutes: u32, seconds: u32) {
        self.start(StartRequest::hms(hours, minutes, seconds));
    }

    pub fn pause(&mut self) {
        let _ = self.try_pause();
    }

    pub fn try_pause(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Running { target_ms } => {
                let remaining = i128::from(target_ms) - i128::from(self.clock.now_ms());
                let remaining_ms = i64::try_from(remaining)
                    .unwrap_or(if remaining < 0 { i64::MIN } else { i64::MAX });
                self.phase = Phase::Paused { remaining_ms };
                Ok(())
            }
            other => Err(TransitionError {
                action: "pause",
                from: other.into(),
            }),
        }
    }

    pub fn resume(&mut self) {
        let _ = self.try_resume();
    }

    pub fn try_resume(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Paused { remaining_ms } => {
                let now = self.clock.now_ms();
                let target_ms = if remaining_ms < 0 {
                    now.saturating_sub(remaining_ms.unsigned_abs())
                } else {
                    now.saturating_add(remaining_ms as u64)
                };
                self.phase = Phase::Running { target_ms };
                Ok(())
            }
            other => Err(TransitionError {
                action: "resume",
                from: other.into(),
            }),
        }
    }

    /// End the session. The total duration is kept until the next start.
    pub fn stop(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Milliseconds until zero while running, clamped at 0; 0 otherwise
    pub fn remaining_ms(&self) -> u64 {
        match self.phase {
            Phase::Running { target_ms } => target_ms.saturating_sub(self.clock.now_ms()),
            _ => 0,
        }
    }

    pub fn remaining_hours(&self) -> u64 {
        self.remaining_ms() / 1000 / 3600
    }

    pub fn remaining_minutes(&self) -> u64 {
        self.remaining_ms() / 1000 / 60 % 60
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_ms() / 1000 % 60
    }

    /// Elapsed share of the session in `[0, 100]`.
    ///
    /// The padding second is excluded from the denominator, so progress hits
    /// 100 once only the padding second is left. An idle engine has no
    /// session and reports 0. A paused one reads the remaining time frozen at
    /// pause instead of [`remaining_ms`](Self::remaining_ms), which is 0 while
    /// paused and would report a paused timer as complete.
    pub fn progress_percent(&self) -> u8 {
        let remaining = match self.phase {
            Phase::Idle => return 0,
            Phase::Running { .. } => i128::from(self.remaining_ms()),
            Phase::Paused { remaining_ms } => i128::from(remaining_ms.max(0)),
        };

        let padding = i128::from(PADDING_MS);
        let span = i128::from(self.total_duration_ms()) - padding;
        if span <= 0 {
            // Nothing to measure against: zero-second requests and raw
            // durations no longer than the padding.
            return if remaining == 0 { 100 } else { 0 };
        }

        let percent = 100 - (remaining - padding) * 100 / span;
        percent.clamp(0, 100) as u8
    }

    /// Remaining time as `HH:MM:SS`
    pub fn formatted_remaining(&self) -> String {
        format_hms(self.remaining_ms())
    }
}

impl<C: Clock> fmt::Display for TimerEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted_remaining())
    }
}

/// Format milliseconds as `HH:MM:SS`, saturating at 99:59:59
pub fn format_hms(ms: u64) -> String {
    let total_secs = ms.min(MAX_DISPLAY_MS) / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        total_secs / 3600,
        total_secs / 60 % 60,
        total_secs % 60
    )
}

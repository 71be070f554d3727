//! Error types for timer control and handoff

use thiserror::Error;

use crate::timer::TimerPhase;

/// A transition was requested from a phase that does not allow it
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot {action} a timer that is {from}")]
pub struct TransitionError {
    pub action: &'static str,
    pub from: TimerPhase,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffError {
    /// The payload carried zero remaining milliseconds
    #[error("timer already finished, nothing to track")]
    NothingToTrack,
    #[error("timer is {0}, nothing to hand off")]
    NotRunning(TimerPhase),
}

/// Failures surfaced by [`AppState`](crate::state::AppState) control operations
#[derive(Error, Debug)]
pub enum ControlError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Handoff(#[from] HandoffError),
    #[error("{0}")]
    Lock(String),
}

//! Countdown timer core
//!
//! The engine is a pure state machine driven by a [`Clock`]. Everything else in
//! the crate hosts an engine and renders what it reports.

pub mod clock;
pub mod engine;

use std::sync::{Arc, Mutex};

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::{Phase, StartRequest, TimerEngine, TimerPhase, PADDING_MS};

/// Engine shared between the API handlers and the display driver
pub type SharedEngine<C = MonotonicClock> = Arc<Mutex<TimerEngine<C>>>;

//! State management module
//!
//! This module contains the application state hosting the timer and the
//! snapshot type it publishes.

pub mod app_state;
pub mod timer_snapshot;

// Re-export main types
pub use app_state::AppState;
pub use timer_snapshot::TimerSnapshot;

//! Hourglass - A countdown timer service
//!
//! This library provides a pausable countdown timer engine, the tasks that
//! host it in the foreground and background, and an HTTP API to control it.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ControlError, HandoffError, TransitionError};
pub use state::{AppState, TimerSnapshot};
pub use tasks::Handoff;
pub use timer::{StartRequest, TimerEngine};
pub use api::create_router;
pub use utils::signals::shutdown_signal;

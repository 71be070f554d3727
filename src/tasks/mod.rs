//! Background tasks module
//!
//! This module contains the tasks that host a running timer: the foreground
//! display driver and the background runner that takes over after a handoff.

pub mod background_runner;
pub mod display_driver;
pub mod slot;

// Re-export main functions
pub use background_runner::{
    background_runner_task, BackgroundStatus, Handoff, DEFAULT_TICK, FINISHED_MESSAGE,
};
pub use display_driver::{display_driver_task, DEFAULT_POLL_INTERVAL};
pub use slot::TaskSlot;

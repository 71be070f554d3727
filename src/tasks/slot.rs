//! Single-occupancy holder for a spawned task

use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Holds at most one spawned task.
///
/// [`cancel`](Self::cancel) aborts the task and waits until it has actually
/// been dropped, so a task spawned afterwards never overlaps the old one.
#[derive(Debug)]
pub struct TaskSlot {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl TaskSlot {
    pub fn new(name: &'static str) -> Self {
        Self { name, handle: None }
    }

    /// Check if a task is spawned and has not finished yet
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the current task, if any, and wait for it to wind down.
    /// Returns true if a live task was cancelled.
    pub async fn cancel(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };

        let was_active = !handle.is_finished();
        handle.abort();
        match handle.await {
            Err(e) if e.is_panic() => error!("{} task panicked: {}", self.name, e),
            // Cancelled or already finished; either way the task is gone
            _ => {}
        }

        if was_active {
            debug!("Cancelled {} task", self.name);
        }
        was_active
    }

    /// Cancel the current task and spawn `future` in its place
    pub async fn replace<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel().await;
        debug!("Spawning {} task", self.name);
        self.handle = Some(tokio::spawn(future));
    }
}

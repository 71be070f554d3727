//! External collaborators module
//!
//! This module contains the sinks the timer reports to, such as the
//! notification channel used by background runs.

pub mod notifications;

// Re-export main types
pub use notifications::{Notification, NotificationCenter, Notifier, CHANNEL_ID_TIMER};

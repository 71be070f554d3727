//! Status notifications for timers hosted in the background

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Channel every timer notification is posted on
pub const CHANNEL_ID_TIMER: &str = "channel_timer";

/// Sink for the text a background timer wants to show the user
pub trait Notifier: Send + Sync {
    fn notify(&self, text: &str);
}

/// A posted notification. Each new one replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub channel: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Notifier that logs, keeps the current notification and broadcasts it
#[derive(Debug)]
pub struct NotificationCenter {
    current: Mutex<Option<Notification>>,
    tx: broadcast::Sender<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            current: Mutex::new(None),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// The notification currently on display, if any
    pub fn current(&self) -> Option<Notification> {
        self.current.lock().ok().and_then(|n| n.clone())
    }

    /// Remove the notification on display
    pub fn dismiss(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, text: &str) {
        info!(channel = CHANNEL_ID_TIMER, "{}", text);

        let notification = Notification {
            channel: CHANNEL_ID_TIMER.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };

        match self.current.lock() {
            Ok(mut current) => *current = Some(notification.clone()),
            Err(e) => warn!("Failed to lock current notification: {}", e),
        }

        // No subscribers is fine, the current notification is still kept
        if self.tx.send(notification).is_err() {
            debug!("No notification subscribers");
        }
    }
}

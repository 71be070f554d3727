//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::Notification,
    state::TimerSnapshot,
    tasks::{BackgroundStatus, Handoff},
};

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response whose status is the timer phase
    pub fn phase(message: String, timer: TimerSnapshot) -> Self {
        Self::new(timer.phase.to_string(), message, timer)
    }
}

/// Response for a successful handoff, carrying the payload handed over
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoffResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub handoff: Handoff,
}

impl HandoffResponse {
    pub fn scheduled(handoff: Handoff) -> Self {
        Self {
            status: "scheduled".to_string(),
            message: format!(
                "Timer handed to background runner with {}ms remaining",
                handoff.remaining_ms
            ),
            timestamp: Utc::now(),
            handoff,
        }
    }
}

/// Status response with timer, background run and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub background: BackgroundStatus,
    pub notification: Option<Notification>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

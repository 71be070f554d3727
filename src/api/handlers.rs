//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    error::ControlError,
    state::AppState,
    timer::StartRequest,
};
use super::responses::{ApiResponse, HandoffResponse, HealthResponse, StatusResponse};

const MAX_HOURS: u32 = 99;
const MAX_MINUTES: u32 = 59;
const MAX_SECONDS: u32 = 59;
/// Raw durations are held to what the picker can express, 99:59:59
const MAX_DURATION_MS: u64 = (MAX_HOURS as u64 * 3600 + MAX_MINUTES as u64 * 60 + MAX_SECONDS as u64) * 1000;

/// Check a start request against the ranges a picker would allow
pub fn validate_start_request(request: &StartRequest) -> Result<(), String> {
    match *request {
        StartRequest::Hms { hours, minutes, seconds } => {
            if hours > MAX_HOURS {
                return Err(format!("hours must be at most {}", MAX_HOURS));
            }
            if minutes > MAX_MINUTES {
                return Err(format!("minutes must be at most {}", MAX_MINUTES));
            }
            if seconds > MAX_SECONDS {
                return Err(format!("seconds must be at most {}", MAX_SECONDS));
            }
            if hours + minutes + seconds == 0 {
                return Err("duration must be greater than zero".to_string());
            }
        }
        StartRequest::Millis { duration_ms } => {
            if duration_ms == 0 {
                return Err("duration must be greater than zero".to_string());
            }
            if duration_ms > MAX_DURATION_MS {
                return Err(format!("duration_ms must be at most {}", MAX_DURATION_MS));
            }
        }
    }
    Ok(())
}

fn status_for(action: &str, e: &ControlError) -> StatusCode {
    match e {
        ControlError::Transition(_) | ControlError::Handoff(_) => {
            warn!("{} rejected: {}", action, e);
            StatusCode::CONFLICT
        }
        ControlError::Lock(_) => {
            error!("{} failed: {}", action, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Handle POST /start - Start a new timer session
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    if let Err(e) = validate_start_request(&request) {
        warn!("Invalid start request {:?}: {}", request, e);
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.start(request).await {
        Ok(timer) => {
            info!("Start endpoint called - timer running");
            Ok(Json(ApiResponse::phase("Timer started".to_string(), timer)))
        }
        Err(e) => Err(status_for("Start", &e)),
    }
}

/// Handle POST /pause - Pause the running timer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.pause().await {
        Ok(timer) => Ok(Json(ApiResponse::phase("Timer paused".to_string(), timer))),
        Err(e) => Err(status_for("Pause", &e)),
    }
}

/// Handle POST /resume - Resume the paused timer
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.resume().await {
        Ok(timer) => Ok(Json(ApiResponse::phase("Timer resumed".to_string(), timer))),
        Err(e) => Err(status_for("Resume", &e)),
    }
}

/// Handle POST /cancel - Stop the timer wherever it runs
pub async fn cancel_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.cancel().await {
        Ok(timer) => Ok(Json(ApiResponse::phase("Timer cancelled".to_string(), timer))),
        Err(e) => Err(status_for("Cancel", &e)),
    }
}

/// Handle POST /handoff - Move the running timer to the background runner
pub async fn handoff_handler(State(state): State<Arc<AppState>>) -> Result<Json<HandoffResponse>, StatusCode> {
    match state.handoff().await {
        Ok(handoff) => Ok(Json(HandoffResponse::scheduled(handoff))),
        Err(e) => Err(status_for("Handoff", &e)),
    }
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        background: state.get_background_status(),
        notification: state.notifications.current(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

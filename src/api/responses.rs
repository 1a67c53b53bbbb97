//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{error::TimerError, notification::NotificationAction, state::TimerPhase};

/// Body of a rejected call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
    pub attached: bool,
    pub phase: TimerPhase,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(uptime: String, attached: bool, phase: TimerPhase) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
            attached,
            phase,
        }
    }
}

/// Body of POST /notification/action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationActionRequest {
    pub action: NotificationAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationActionReply {
    pub accepted: bool,
}

/// Error returned by handlers
#[derive(Debug)]
pub enum ApiError {
    Timer(TimerError),
    BadRequest(String),
}

impl From<TimerError> for ApiError {
    fn from(e: TimerError) -> Self {
        ApiError::Timer(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Timer(e @ TimerError::ServiceUnavailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            ApiError::Timer(e @ TimerError::InvalidDuration(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Timer(e) => {
                error!("Timer call failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::BadRequest(message) => {
                warn!("Rejecting malformed request: {}", message);
                (StatusCode::BAD_REQUEST, message)
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

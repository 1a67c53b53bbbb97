//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    body::Bytes,
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{
    bridge::{
        PauseReply, PermissionReply, ResumeReply, StartReply, StartTimerRequest, StopReply,
    },
    state::{AppState, TimerPhase, TimerStatus},
};
use super::responses::{
    ApiError, HealthResponse, NotificationActionReply, NotificationActionRequest,
};

/// Handle POST /timer/start - startTimer
///
/// The JSON body is optional; missing fields take the configured defaults.
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<StartReply>, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        StartTimerRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid startTimer arguments: {}", e)))?
    };

    let reply = state.bridge.start_timer(request).await?;
    info!("startTimer endpoint called - timer started");
    Ok(Json(reply))
}

/// Handle POST /timer/stop - stopTimer
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<StopReply>, ApiError> {
    Ok(Json(state.bridge.stop_timer()?))
}

/// Handle POST /timer/pause - pauseTimer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<PauseReply>, ApiError> {
    Ok(Json(state.bridge.pause_timer()?))
}

/// Handle POST /timer/resume - resumeTimer
pub async fn resume_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ResumeReply>, ApiError> {
    Ok(Json(state.bridge.resume_timer()?))
}

/// Handle GET /timer/status - isRunning
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerStatus>, ApiError> {
    Ok(Json(state.bridge.is_running()?))
}

/// Handle GET /timer/permission - notification permission query
pub async fn permission_handler(State(state): State<Arc<AppState>>) -> Json<PermissionReply> {
    Json(PermissionReply {
        granted: state.notification_permission().is_granted(),
    })
}

/// Handle POST /notification/action - a button pressed on the timer notification
pub async fn notification_action_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<NotificationActionReply>, ApiError> {
    let request: NotificationActionRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid notification action: {}", e)))?;

    state.notification_action(request.action)?;
    info!("Notification action '{}' received", request.action.id());
    Ok(Json(NotificationActionReply { accepted: true }))
}

/// Handle GET /events - stream `timerTick` and `timerComplete` as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let listener = state.bridge.add_listener();
    info!("Event listener registered ({} total)", state.bridge.listener_count());

    let events = stream::unfold(listener, |mut listener| async move {
        loop {
            match listener.recv().await {
                Ok(event) => {
                    let sse = Event::default()
                        .event(event.name())
                        .data(event.payload().to_string());
                    return Some((Ok(sse), listener));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event listener lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let phase = state
        .bridge
        .service()
        .and_then(|service| service.phase().ok())
        .unwrap_or(TimerPhase::Idle);

    Json(HealthResponse::ok(
        state.get_uptime(),
        state.bridge.is_attached(),
        phase,
    ))
}

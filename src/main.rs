//! Rest Timer - a rest countdown service with live notifications
//!
//! This is the main entry point for the rest-timer application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::{info, warn};

use rest_timer::{
    api::create_router,
    bridge::TimerBridge,
    config::{Config, NotifierKind},
    notification::{
        ActionSender, LogPresenter, NotificationPresenter, PermissionQuery, StaticPermission,
    },
    services::TimerService,
    state::AppState,
    tasks::{notification_action_task, notification_renderer_task},
    utils::shutdown_signal,
};

/// Pick the notification backend requested on the command line
fn build_presenter(kind: NotifierKind, actions: ActionSender) -> Arc<dyn NotificationPresenter> {
    match kind {
        NotifierKind::Log => Arc::new(LogPresenter),
        #[cfg(feature = "desktop")]
        NotifierKind::Desktop => Arc::new(rest_timer::notification::DesktopPresenter::new(actions)),
        #[cfg(not(feature = "desktop"))]
        NotifierKind::Desktop => {
            drop(actions);
            warn!("Built without the `desktop` feature, falling back to log notifications");
            Arc::new(LogPresenter)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("rest_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting rest-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, default rest={}s, hold={}ms",
        config.host, config.port, config.seconds, config.hold_ms
    );

    let permission: Arc<dyn PermissionQuery> = if config.deny_notifications {
        warn!("Notification permission denied, timers will run without notifications");
        Arc::new(StaticPermission::denied())
    } else {
        Arc::new(StaticPermission::granted())
    };

    // Create the controller, its notification renderer and the action handler
    let timer = TimerService::new(config.finished_hold());
    let (actions_tx, actions_rx) = mpsc::unbounded_channel();
    tokio::spawn(notification_action_task(actions_rx, timer.downgrade()));
    tokio::spawn(notification_renderer_task(
        timer.subscribe(),
        build_presenter(config.notifier, actions_tx.clone()),
        Arc::clone(&permission),
    ));

    // Create the bridge and attach the controller
    let bridge = TimerBridge::new(config.attach_timeout(), config.start_defaults());
    bridge.attach(timer.clone())?;

    let state = Arc::new(AppState::new(
        bridge,
        permission,
        actions_tx,
        config.port,
        config.host.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start      - startTimer {{seconds, exercise, workout}}");
    info!("  POST /timer/stop       - stopTimer");
    info!("  POST /timer/pause      - pauseTimer");
    info!("  POST /timer/resume     - resumeTimer");
    info!("  GET  /timer/status     - isRunning");
    info!("  GET  /timer/permission - Notification permission");
    info!("  POST /notification/action - Notification button {{action}}");
    info!("  GET  /events           - timerTick / timerComplete stream");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Failed to install signal handler: {}", e),
            }
        }
    }

    if let Err(e) = state.bridge.stop_timer() {
        warn!("Failed to stop timer during shutdown: {}", e);
    }
    state.bridge.detach()?;

    info!("Server shutdown complete");
    Ok(())
}

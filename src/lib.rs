//! Rest Timer - a rest countdown for workouts with live notifications
//!
//! A [`TimerService`] owns the single live countdown, a [`TimerBridge`]
//! translates UI verbs into controller calls and relays tick and completion
//! events to listeners, and a renderer keeps a notification in sync.

pub mod config;
pub mod error;
pub mod state;
pub mod services;
pub mod bridge;
pub mod notification;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, TimerPhase, TimerStatus};
pub use services::{TimerEvent, TimerService};
pub use bridge::TimerBridge;
pub use api::create_router;
pub use utils::signals::shutdown_signal;

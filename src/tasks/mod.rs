//! Background tasks module
//!
//! This module contains the tasks that run alongside the timer controller:
//! the countdown itself, the notification renderer, the handler for pressed
//! notification buttons and the bridge event relay.

pub mod countdown;
pub mod event_relay;
pub mod notification_actions;
pub mod notification_renderer;

// Re-export main functions
pub use countdown::{countdown_task, finished_hold_task};
pub use event_relay::event_relay_task;
pub use notification_actions::notification_action_task;
pub use notification_renderer::{notification_renderer_task, NotificationRenderer, RenderAction};

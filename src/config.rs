//! Configuration and CLI argument handling

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::{
    bridge::{
        messages::{DEFAULT_EXERCISE, DEFAULT_SECONDS, DEFAULT_WORKOUT},
        StartDefaults, DEFAULT_ATTACH_TIMEOUT,
    },
    services::DEFAULT_FINISHED_HOLD,
};

/// Notification backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NotifierKind {
    /// Write notifications to the log
    Log,
    /// Desktop notifications (requires the `desktop` feature)
    Desktop,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "rest-timer")]
#[command(about = "A rest-timer service with pause/resume and live notifications")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Rest duration in seconds when a start request omits it
    #[arg(long, default_value_t = DEFAULT_SECONDS)]
    pub seconds: u64,

    /// Exercise label when a start request omits it
    #[arg(long, default_value = DEFAULT_EXERCISE)]
    pub exercise: String,

    /// Workout label when a start request omits it
    #[arg(long, default_value = DEFAULT_WORKOUT)]
    pub workout: String,

    /// How long a finished timer stays visible, in milliseconds
    #[arg(long, default_value_t = DEFAULT_FINISHED_HOLD.as_millis() as u64)]
    pub hold_ms: u64,

    /// How long a start request waits for the timer service, in milliseconds
    #[arg(long, default_value_t = DEFAULT_ATTACH_TIMEOUT.as_millis() as u64)]
    pub attach_timeout_ms: u64,

    /// Notification backend
    #[arg(long, value_enum, default_value = "log")]
    pub notifier: NotifierKind,

    /// Report notification permission as denied
    #[arg(long)]
    pub deny_notifications: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn finished_hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }

    pub fn attach_timeout(&self) -> Duration {
        Duration::from_millis(self.attach_timeout_ms)
    }

    /// Defaults applied to start requests
    pub fn start_defaults(&self) -> StartDefaults {
        StartDefaults {
            seconds: self.seconds,
            exercise: self.exercise.clone(),
            workout: self.workout.clone(),
        }
    }
}

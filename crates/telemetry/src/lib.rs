//! Structured logging for Weight Calculator build tools
//!
//! - `tracing` subscriber setup with `RUST_LOG` support
//! - Per-process session id for correlating log lines
//! - Operation timing

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize with custom configuration
///
/// `RUST_LOG` takes precedence over `config.log_level`.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.show_target)
                .json())
            .try_init()
    } else {
        registry
            .with(fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(config.show_target)
                .compact())
            .try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Map a `-v` count to a log level; no flag keeps logs at warnings
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub show_target: bool,
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_target: false,
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// Configuration for a CLI run with the given `-v` count
    pub fn for_verbosity(verbose: u8) -> Self {
        Self {
            log_level: level_for_verbosity(verbose).to_string(),
            show_target: verbose > 1,
            ..Self::default()
        }
    }

    /// Emit log events as JSON lines
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Timer for measuring operation duration
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    /// Stop the timer and log the duration
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.name,
            duration_ms = duration.as_millis() as u64,
            "Timer completed"
        );
        duration
    }
}

// Configuration layer - environment-driven settings
pub mod database;
pub mod logging;

use std::env;
use std::time::Duration;

pub use database::DatabaseConfig;
pub use logging::{init_logging, LoggingConfig};

use crate::services::DEFAULT_IDLE_TIMEOUT;

/// Address the HTTP server binds to
pub fn bind_addr() -> String {
    env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

/// Session idle timeout, overridable via SESSION_TIMEOUT_SECS
pub fn session_idle_timeout() -> Duration {
    env::var("SESSION_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_IDLE_TIMEOUT)
}

//! # Service Configuration
//!
//! Environment-driven configuration. Every value has a sensible default so
//! the service runs with no environment at all.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PORTFLOW_BIND_ADDR` | `0.0.0.0:8080` | Listen address |
//! | `PORTFLOW_POLL_INTERVAL_SECS` | `5` | Poll interval advertised to observers |

use std::time::Duration;

use portflow_clearance::sync::DEFAULT_POLL_INTERVAL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime configuration for the clearance API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    /// Interval remote observers should poll at while a container is not
    /// yet released.
    pub poll_interval: Duration,
}

impl ApiConfig {
    /// Load configuration from the environment, falling back to defaults on
    /// absent or unparseable values.
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("PORTFLOW_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let poll_interval = std::env::var("PORTFLOW_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        Self {
            bind_addr,
            poll_interval,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
    }
}

//! Filter session lifetime limits.
//!
//! # Configuration
//!
//! - `REGISTRAR_SESSION_IDLE_TTL_SECS`: Seconds a session may go unused before it is evicted (default: 1800)
//! - `REGISTRAR_SESSION_SWEEP_INTERVAL_SECS`: Seconds between eviction sweeps (default: 60)
//! - `REGISTRAR_MAX_SESSIONS`: Upper bound on live sessions; the least recently used is evicted past it (default: 1000)

use std::time::Duration;

use crate::env_or;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub idle_ttl: Duration,
    pub sweep_interval: Duration,
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
            max_sessions: 1000,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            idle_ttl: Duration::from_secs(env_or(
                "REGISTRAR_SESSION_IDLE_TTL_SECS",
                defaults.idle_ttl.as_secs(),
            )),
            sweep_interval: Duration::from_secs(
                env_or(
                    "REGISTRAR_SESSION_SWEEP_INTERVAL_SECS",
                    defaults.sweep_interval.as_secs(),
                )
                .max(1),
            ),
            max_sessions: env_or("REGISTRAR_MAX_SESSIONS", defaults.max_sessions).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.idle_ttl, Duration::from_secs(1800));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.max_sessions, 1000);
    }
}

//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use forest_game::{RoomConfig, Variant};
use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

/// Default HTTP bind address
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::LOCALHOST), 6969);

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus scrape listener, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Room defaults
    pub rooms: RoomConfig,
}

/// Values given on the command line, taking precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub metrics_bind: Option<SocketAddr>,
    pub variant: Option<Variant>,
    pub dice_seed: Option<u64>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values from CLI args
    ///
    /// # Errors
    ///
    /// Returns error if a set variable cannot be parsed
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => parse_env_opt("SERVER_BIND")?.unwrap_or(DEFAULT_BIND),
        };

        let metrics_bind = match overrides.metrics_bind {
            Some(addr) => Some(addr),
            None => parse_env_opt("METRICS_BIND")?,
        };

        // Scenario codes are lenient like the create form: unknown means variant 1
        let default_variant = overrides.variant.unwrap_or_else(|| {
            std::env::var("DEFAULT_VARIANT")
                .map(|raw| Variant::parse_lenient(&raw))
                .unwrap_or_default()
        });

        let dice_seed = match overrides.dice_seed {
            Some(seed) => Some(seed),
            None => parse_env_opt("DICE_SEED")?,
        };

        let defaults = RoomConfig::default();
        let rooms = RoomConfig {
            default_variant,
            inbox_capacity: parse_env_or("ROOM_INBOX_CAPACITY", defaults.inbox_capacity),
            max_rooms: parse_env_or("MAX_ROOMS", defaults.max_rooms),
            dice_seed,
            idle_timeout: Duration::from_secs(parse_env_or(
                "ROOM_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout.as_secs(),
            )),
        };

        Ok(ServerConfig {
            bind,
            metrics_bind,
            rooms,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rooms.validate().map_err(ConfigError::Rooms)?;

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from SERVER_BIND ({})", self.bind),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Invalid room configuration: {0}")]
    Rooms(String),
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Optional variable; set but unparseable is an error
fn parse_env_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::Invalid {
                    var: key.to_string(),
                    reason: e.to_string(),
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8080".parse().unwrap(),
            metrics_bind: None,
            rooms: RoomConfig::default(),
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            var: "MAX_ROOMS".to_string(),
            reason: "Must be greater than 0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("MAX_ROOMS"));
        assert!(msg.contains("greater than 0"));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(config().validate().is_ok());
        assert_eq!(DEFAULT_BIND.to_string(), "127.0.0.1:6969");
    }

    #[test]
    fn test_config_validation_zero_capacity() {
        let mut config = config();
        config.rooms.inbox_capacity = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Rooms(ref reason) if reason.contains("Inbox capacity")));

        let mut config = self::config();
        config.rooms.idle_timeout = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ConfigError::Rooms(_))));
    }

    #[test]
    fn test_config_validation_metrics_clash() {
        let mut config = config();
        config.metrics_bind = Some(config.bind);

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "METRICS_BIND"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = ServerConfig::from_env(Overrides {
            bind: Some("0.0.0.0:7000".parse().unwrap()),
            metrics_bind: Some("0.0.0.0:9100".parse().unwrap()),
            variant: Some(Variant::Sustainable),
            dice_seed: Some(11),
        })
        .unwrap();

        assert_eq!(config.bind.port(), 7000);
        assert_eq!(config.metrics_bind.map(|addr| addr.port()), Some(9100));
        assert_eq!(config.rooms.default_variant, Variant::Sustainable);
        assert_eq!(config.rooms.dice_seed, Some(11));
    }
}

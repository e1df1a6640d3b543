//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Fixed simulation tick period in milliseconds
    pub tick_period_ms: u64,
    /// Playfield width in cells
    pub grid_width: u16,
    /// Playfield height in cells
    pub grid_height: u16,
    /// Number of body cells a snake starts with
    pub snake_length: usize,

    /// Allowed client origin for CORS (comma-separated for multiple)
    pub client_origin: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = if let Ok(port) = env::var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            tick_period_ms: parse_or("TICK_PERIOD_MS", 100)?,
            grid_width: parse_or("GRID_WIDTH", 64)?,
            grid_height: parse_or("GRID_HEIGHT", 48)?,
            snake_length: parse_or("SNAKE_LENGTH", 5)?,

            client_origin: env::var("CLIENT_ORIGIN").unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        assert!(matches!(parse_or("SNAKE_ARENA_TEST_UNSET", 100u64), Ok(100)));
    }

    #[test]
    fn set_variables_are_parsed() {
        env::set_var("SNAKE_ARENA_TEST_TICK", "250");
        assert!(matches!(parse_or::<u64>("SNAKE_ARENA_TEST_TICK", 100), Ok(250)));

        env::set_var("SNAKE_ARENA_TEST_BAD", "not-a-number");
        assert!(parse_or::<u64>("SNAKE_ARENA_TEST_BAD", 100).is_err());
    }
}

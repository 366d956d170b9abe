//! Configuration management for khhbot.
//!
//! This module handles loading and validating environment variables and bot settings.

use crate::error::{KhhBotError, Result};
use crate::utils::validation::{validate_api_base_url, validate_non_empty};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_ADMIN_SENDER: &str = "박정욱";
pub const DEFAULT_ACTIVATE_COMMAND: &str = "크하학 시작";
pub const DEFAULT_DEACTIVATE_COMMAND: &str = "크하학 종료";
pub const DEFAULT_RATE_LIMIT_MS: u64 = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 3000;

/// Configuration for the bot, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote message API, without a trailing slash
    pub api_base_url: String,
    /// The only sender allowed to toggle the bot on and off
    pub admin_sender: String,
    /// Exact message that reactivates an inactive bot
    pub activate_command: String,
    /// Exact message that deactivates the bot when the API flags it as an admin command
    pub deactivate_command: String,
    /// Minimum gap between two accepted messages from the same sender
    pub rate_limit: Duration,
    /// Timeout for the message relay call
    pub request_timeout: Duration,
    /// Timeout for the health check and status calls
    pub health_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            admin_sender: DEFAULT_ADMIN_SENDER.to_string(),
            activate_command: DEFAULT_ACTIVATE_COMMAND.to_string(),
            deactivate_command: DEFAULT_DEACTIVATE_COMMAND.to_string(),
            rate_limit: Duration::from_millis(DEFAULT_RATE_LIMIT_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            health_timeout: Duration::from_millis(DEFAULT_HEALTH_TIMEOUT_MS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This will attempt to load a .env file if present using dotenv,
    /// then read the optional variables, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but invalid.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use khhbot::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load configuration");
    /// println!("API: {}", config.api_base_url);
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors - it's optional)
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Missing keys use the defaults. `from_env` delegates here with the process
    /// environment as the source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // An empty base URL means "not configured"
        let api_base_url = lookup("API_BASE_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.api_base_url);
        let api_base_url = validate_api_base_url(&api_base_url)?;

        let admin_sender = lookup("ADMIN_SENDER").unwrap_or(defaults.admin_sender);
        validate_non_empty("ADMIN_SENDER", &admin_sender)?;

        let activate_command = lookup("ACTIVATE_COMMAND").unwrap_or(defaults.activate_command);
        validate_non_empty("ACTIVATE_COMMAND", &activate_command)?;

        let deactivate_command = lookup("DEACTIVATE_COMMAND").unwrap_or(defaults.deactivate_command);
        validate_non_empty("DEACTIVATE_COMMAND", &deactivate_command)?;

        if activate_command == deactivate_command {
            return Err(KhhBotError::Config(
                "ACTIVATE_COMMAND and DEACTIVATE_COMMAND must differ".to_string()
            ));
        }

        // A zero window disables rate limiting, so only the timeouts must be positive
        let rate_limit = Self::parse_millis(&lookup, "RATE_LIMIT_MS", DEFAULT_RATE_LIMIT_MS, true)?;
        let request_timeout = Self::parse_millis(&lookup, "REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS, false)?;
        let health_timeout = Self::parse_millis(&lookup, "HEALTH_TIMEOUT_MS", DEFAULT_HEALTH_TIMEOUT_MS, false)?;

        Ok(Self {
            api_base_url,
            admin_sender,
            activate_command,
            deactivate_command,
            rate_limit,
            request_timeout,
            health_timeout,
        })
    }

    /// Parse a millisecond duration variable, using `default_ms` when it is unset.
    fn parse_millis<F>(lookup: &F, key: &str, default_ms: u64, allow_zero: bool) -> Result<Duration>
    where
        F: Fn(&str) -> Option<String>,
    {
        let millis = match lookup(key) {
            Some(raw) => raw.trim().parse::<u64>()
                .map_err(|_| KhhBotError::Config(
                    format!("Invalid {}: '{}'. Expected a whole number of milliseconds.", key, raw)
                ))?,
            None => default_ms,
        };

        if millis == 0 && !allow_zero {
            return Err(KhhBotError::Config(
                format!("{} must be greater than zero", key)
            ));
        }

        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8080");
        assert_eq!(config.admin_sender, "박정욱");
        assert_eq!(config.activate_command, "크하학 시작");
        assert_eq!(config.deactivate_command, "크하학 종료");
        assert_eq!(config.rate_limit, Duration::from_millis(1000));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.health_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_BASE_URL", "https://khh.example.com/"),
            ("ADMIN_SENDER", "관리자"),
            ("RATE_LIMIT_MS", "250"),
            ("REQUEST_TIMEOUT_MS", " 1500 "),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url, "https://khh.example.com");
        assert_eq!(config.admin_sender, "관리자");
        assert_eq!(config.rate_limit, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.health_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_empty_base_url_uses_default() {
        let config = Config::from_lookup(lookup_from(&[("API_BASE_URL", "")])).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080");

        let config = Config::from_lookup(lookup_from(&[("API_BASE_URL", "  ")])).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("API_BASE_URL", "localhost")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("ADMIN_SENDER", " ")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("RATE_LIMIT_MS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_MS", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("HEALTH_TIMEOUT_MS", "-1")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("DEACTIVATE_COMMAND", "크하학 시작")])).is_err());
    }

    #[test]
    fn test_zero_rate_limit_is_allowed() {
        let config = Config::from_lookup(lookup_from(&[("RATE_LIMIT_MS", "0")])).unwrap();
        assert_eq!(config.rate_limit, Duration::ZERO);
    }
}

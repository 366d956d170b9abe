//! Validation utilities for configuration input.
//!
//! This module provides reusable validation functions for the values the bot reads
//! from its environment.

use crate::error::{KhhBotError, Result};
use url::Url;

/// Validate an API base URL and return it without a trailing slash.
///
/// The URL must:
/// - Parse as an absolute URL
/// - Use the `http` or `https` scheme
/// - Contain a host
///
/// # Arguments
///
/// * `url_str` - The base URL to validate
///
/// # Returns
///
/// Returns the normalized base URL, or an error describing the issue.
///
/// # Examples
///
/// ```
/// use khhbot::utils::validation::validate_api_base_url;
///
/// assert_eq!(
///     validate_api_base_url("http://localhost:8080/").unwrap(),
///     "http://localhost:8080"
/// );
/// assert!(validate_api_base_url("ftp://example.com").is_err());
/// assert!(validate_api_base_url("localhost:8080").is_err());
/// ```
pub fn validate_api_base_url(url_str: &str) -> Result<String> {
    let parsed_url = Url::parse(url_str)
        .map_err(|e| KhhBotError::Config(
            format!("Invalid API_BASE_URL '{}': {}", url_str, e)
        ))?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(KhhBotError::Config(
            format!("API_BASE_URL must use http:// or https:// scheme, got: '{}'", scheme)
        ));
    }

    if parsed_url.host_str().is_none() {
        return Err(KhhBotError::Config(
            format!("API_BASE_URL must contain a valid host: '{}'", url_str)
        ));
    }

    Ok(url_str.trim_end_matches('/').to_string())
}

/// Validate that a configuration value is not blank.
///
/// # Arguments
///
/// * `name` - The variable name, used in the error message
/// * `value` - The value to check
pub fn validate_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KhhBotError::Config(
            format!("{} cannot be empty", name)
        ));
    }
    Ok(())
}

/// Join a normalized base URL and an absolute endpoint path.
///
/// # Examples
///
/// ```
/// use khhbot::utils::validation::endpoint;
///
/// assert_eq!(endpoint("http://localhost:8080", "/api/message"), "http://localhost:8080/api/message");
/// assert_eq!(endpoint("http://localhost:8080", "/"), "http://localhost:8080/");
/// ```
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

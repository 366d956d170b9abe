//! Custom error types for khhbot.
//!
//! This module provides a centralized error handling system with specific error types
//! for the configuration and host-facing parts of the bot. Remote API failures are
//! reported separately as `api::ApiFailure`.

use std::fmt;

/// Main error type for khhbot operations.
#[derive(Debug)]
pub enum KhhBotError {
    /// Configuration errors (invalid env values, bad URLs)
    Config(String),
    /// The host failed to deliver a reply
    Reply(String),
    /// Generic I/O errors
    Io(std::io::Error),
}

impl fmt::Display for KhhBotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Reply(msg) => write!(f, "Reply error: {}", msg),
            Self::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for KhhBotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KhhBotError::Io(err) => Some(err),
            _ => None,
        }
    }
}

// Implement From traits for automatic error conversion
impl From<std::io::Error> for KhhBotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result type alias for khhbot operations.
pub type Result<T> = std::result::Result<T, KhhBotError>;

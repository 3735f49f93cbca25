//! Error types and handling for the adventure aggregation service

use thiserror::Error;

/// Wire message returned for any rejected inbound payload.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input format";

/// Wire message returned for any failure not classified at a lower layer.
pub const INTERNAL_ERROR_MESSAGE: &str = "Oops, something broke!";

/// Main error type for the adventure aggregation service
#[derive(Error, Debug)]
pub enum AggregatorError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream provider communication errors
    #[error("Provider error: {message}")]
    Provider { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl AggregatorError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Message exposed to the caller. Validation errors map to the 400 wire
    /// message, everything else to the generic 500 one; internal detail stays
    /// in the logs.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            AggregatorError::Validation { .. } => INVALID_INPUT_MESSAGE,
            _ => INTERNAL_ERROR_MESSAGE,
        }
    }
}

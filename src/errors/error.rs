//! Error types for the World Anvil API client.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for World Anvil operations
pub type WorldAnvilResult<T> = Result<T, WorldAnvilError>;

/// Main error type for the World Anvil API client.
///
/// Every terminal outcome of the request pipeline is one of these variants;
/// the pipeline never surfaces an undifferentiated generic error. Variants
/// map one-to-one onto the upstream response classes (see
/// [`classify`](crate::errors::classify)).
#[derive(Error, Debug, Clone)]
pub enum WorldAnvilError {
    /// Configuration error (invalid settings, missing required fields)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Authentication error (401/403: bad application key or user token)
    #[error("Authentication error: {message}")]
    Authentication {
        /// Error message describing the authentication issue
        message: String,
    },

    /// Resource not found (404)
    #[error("Not found: {message}")]
    NotFound {
        /// Error message
        message: String,
    },

    /// Validation error (422: invalid request parameters)
    #[error("Validation error: {message}")]
    Validation {
        /// Error message describing the validation issue
        message: String,
        /// Field-level validation failures reported by the API
        details: Vec<ValidationDetail>,
    },

    /// Rate limit error (429: too many requests)
    #[error("Rate limit error: {message}")]
    RateLimit {
        /// Error message describing the rate limit issue
        message: String,
        /// Server-advised wait before retrying, from the Retry-After header
        retry_after: Option<Duration>,
    },

    /// Server error (5xx responses from the World Anvil API)
    #[error("Server error ({status_code}): {message}")]
    Server {
        /// Error message from the server
        message: String,
        /// HTTP status code
        status_code: u16,
    },

    /// Network error (connection failed, timeout, DNS issues)
    #[error("Network error: {message}")]
    Network {
        /// Error message describing the network issue
        message: String,
    },

    /// HTTP 200 whose body reports a logical failure.
    ///
    /// The upstream API reports some operational failures with a 200 status
    /// and `"success": false` in the body. A 200 body that lacks an explicit
    /// `"success": true` is never treated as a success.
    #[error("API reported failure: {message}")]
    ApiFailure {
        /// Failure message embedded in the 200 body
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization issue
        message: String,
    },

    /// Internal error (unexpected conditions, library bugs)
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal issue
        message: String,
    },
}

impl WorldAnvilError {
    /// Returns true if this error is retryable with exponential backoff.
    ///
    /// Retryable errors are rate limits (429), server errors (5xx) and
    /// network failures. Authentication, not-found, validation and logical
    /// API failures cannot succeed without an external state change, so
    /// retrying them only wastes rate-limiter budget.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorldAnvilError::RateLimit { .. }
                | WorldAnvilError::Server { .. }
                | WorldAnvilError::Network { .. }
        )
    }

    /// Returns the server-advised retry delay if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            WorldAnvilError::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// A single field-level validation failure from a 422 response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ValidationDetail {
    /// Field the failure applies to, when the API names one
    #[serde(default)]
    pub field: Option<String>,
    /// Human-readable failure description
    pub message: String,
}

// Conversions from common error types
impl From<reqwest::Error> for WorldAnvilError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WorldAnvilError::Network {
                message: format!("Request timed out: {}", err),
            }
        } else if err.is_connect() {
            WorldAnvilError::Network {
                message: format!("Connection failed: {}", err),
            }
        } else {
            WorldAnvilError::Network {
                message: format!("Network error: {}", err),
            }
        }
    }
}

impl From<serde_json::Error> for WorldAnvilError {
    fn from(err: serde_json::Error) -> Self {
        WorldAnvilError::Serialization {
            message: format!("JSON serialization/deserialization error: {}", err),
        }
    }
}

impl From<url::ParseError> for WorldAnvilError {
    fn from(err: url::ParseError) -> Self {
        WorldAnvilError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}

//! Observability: structured logging configuration and request logging
//! helpers.

mod logging;

pub use logging::{log_request, log_response, LogFormat, LogLevel, LoggingConfig};

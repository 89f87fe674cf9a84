//! Authentication headers for the World Anvil API.

use crate::errors::{WorldAnvilError, WorldAnvilResult};
use http::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

/// Trait for supplying request authentication headers.
pub trait AuthManager: Send + Sync {
    /// Headers to attach to every request.
    fn headers(&self) -> WorldAnvilResult<HeaderMap>;

    /// Validate the configured credentials without a network call.
    fn validate(&self) -> Result<(), String>;
}

/// Key-pair authentication manager.
///
/// World Anvil authenticates with two fixed headers, an application key and
/// a per-user token. The service requires the header names in lowercase.
pub struct KeyPairAuthManager {
    application_key: SecretString,
    auth_token: SecretString,
}

impl KeyPairAuthManager {
    /// Create a new key-pair authentication manager.
    pub fn new(application_key: SecretString, auth_token: SecretString) -> Self {
        Self {
            application_key,
            auth_token,
        }
    }

    fn header_value(secret: &SecretString, name: &str) -> WorldAnvilResult<HeaderValue> {
        HeaderValue::from_str(secret.expose_secret()).map_err(|_| {
            WorldAnvilError::Configuration {
                message: format!("{} contains characters not valid in a header", name),
            }
        })
    }
}

impl AuthManager for KeyPairAuthManager {
    fn headers(&self) -> WorldAnvilResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "x-application-key",
            Self::header_value(&self.application_key, "application key")?,
        );
        headers.insert(
            "x-auth-token",
            Self::header_value(&self.auth_token, "auth token")?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.insert("accept", HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    fn validate(&self) -> Result<(), String> {
        if self.application_key.expose_secret().is_empty() {
            return Err("application key cannot be empty".to_string());
        }
        if self.auth_token.expose_secret().is_empty() {
            return Err("auth token cannot be empty".to_string());
        }
        Ok(())
    }
}

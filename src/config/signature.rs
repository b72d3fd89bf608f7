//! Request signature configuration.

use crate::{error::ConfigError, utils::signature::SignatureScheme};
use serde::{Deserialize, Serialize};
use std::{env, fmt};

/// Headers signed when none are configured explicitly
pub const DEFAULT_SIGNED_HEADERS: [&str; 3] = ["X-Date", "Authorization", "APP-ID"];

fn default_headers() -> Vec<String> {
    DEFAULT_SIGNED_HEADERS.iter().map(|h| h.to_string()).collect()
}

/// Configuration for request signature verification
///
/// The JSON form uses `headers`, `secretKey` and `scheme`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureConfig {
    /// Header names whose values are signed, in message order
    #[serde(default = "default_headers")]
    pub headers: Vec<String>,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub scheme: SignatureScheme,
}

impl fmt::Debug for SignatureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureConfig")
            .field("headers", &self.headers)
            .field("secret_key", &"<redacted>")
            .field("scheme", &self.scheme)
            .finish()
    }
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            headers: default_headers(),
            secret_key: String::new(),
            scheme: SignatureScheme::Standard,
        }
    }
}

impl SignatureConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// - `SIGNATURE_HEADERS`: comma-separated header names
    /// - `SIGNATURE_SECRET`: shared secret, no default
    /// - `SIGNATURE_SCHEME`: `standard` or `legacy`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SignatureConfig::from_env`] but reads variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let headers = lookup("SIGNATURE_HEADERS")
            .map(|raw| parse_header_list(&raw))
            .unwrap_or_else(default_headers);

        let secret_key = lookup("SIGNATURE_SECRET").unwrap_or_default();

        let scheme = match lookup("SIGNATURE_SCHEME") {
            Some(raw) => raw.parse()?,
            None => SignatureScheme::default(),
        };

        Ok(Self {
            headers,
            secret_key,
            scheme,
        })
    }

    /// Parse a JSON configuration document
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::InvalidJson(e.to_string()))
    }

    /// Check that both required fields are present
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.headers.is_empty() {
            return Err(ConfigError::NoHeaders);
        }
        if self.secret_key.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(())
    }
}

/// Split a comma-separated header list, dropping blank entries
pub fn parse_header_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

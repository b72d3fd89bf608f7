//! HTTP server configuration.

use std::env;

/// Listen address used when `BIND_ADDR` is unset
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Where the gateway listens
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        Self { bind_addr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_unset_env_agree() {
        assert_eq!(ServerConfig::default().bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(
            ServerConfig::from_lookup(|_| None).bind_addr,
            ServerConfig::default().bind_addr
        );
    }

    #[test]
    fn test_bind_addr_from_env() {
        let config = ServerConfig::from_lookup(|key| {
            (key == "BIND_ADDR").then(|| "0.0.0.0:9000".to_string())
        });
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
    }
}

//! Runtime configuration
//!
//! Read from the environment at startup:
//! - `HOST`: bind host (default `0.0.0.0`)
//! - `PORT`: bind port (default 3000)
//! - `ALLOWED_ORIGIN`: browser origin allowed to open WebSockets
//!   (default `http://localhost:5173`, `*` allows any)

use std::env;

use crate::error::ConfigError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Which `Origin` headers the WebSocket handshake accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    Any,
    Exact(String),
}

impl OriginPolicy {
    /// Requests without an `Origin` header come from non-browser
    /// clients and are always accepted.
    pub fn allows(&self, origin: Option<&str>) -> bool {
        match (self, origin) {
            (OriginPolicy::Any, _) | (_, None) => true,
            (OriginPolicy::Exact(allowed), Some(origin)) => {
                allowed.trim_end_matches('/') == origin.trim_end_matches('/')
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub origin_policy: OriginPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let origin = lookup("ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());
        let origin_policy = match origin.trim() {
            "" => return Err(ConfigError::EmptyOrigin),
            "*" => OriginPolicy::Any,
            exact => OriginPolicy::Exact(exact.to_string()),
        };

        Ok(Self {
            host,
            port,
            origin_policy,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(
            config.origin_policy,
            OriginPolicy::Exact(DEFAULT_ALLOWED_ORIGIN.to_string())
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("ALLOWED_ORIGIN", "*"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.origin_policy, OriginPolicy::Any);
    }

    #[test]
    fn test_invalid_port() {
        assert!(matches!(
            config_from(&[("PORT", "not-a-port")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            config_from(&[("PORT", "70000")]),
            Err(ConfigError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_empty_origin() {
        assert!(matches!(
            config_from(&[("ALLOWED_ORIGIN", " ")]),
            Err(ConfigError::EmptyOrigin)
        ));
    }

    #[test]
    fn test_origin_policy() {
        let policy = OriginPolicy::Exact("http://localhost:5173".to_string());
        assert!(policy.allows(Some("http://localhost:5173")));
        assert!(policy.allows(Some("http://localhost:5173/")));
        assert!(policy.allows(None));
        assert!(!policy.allows(Some("http://evil.example")));
        assert!(OriginPolicy::Any.allows(Some("http://evil.example")));
    }
}

//! Client configuration, read from the environment.

use std::time::Duration;

use thiserror::Error;

use crate::transport::TransportKind;

pub const API_URL_ENV: &str = "STOCKROOM_API_URL";
pub const API_TIMEOUT_ENV: &str = "STOCKROOM_API_TIMEOUT_SECS";
pub const DEMO_DATA_ENV: &str = "STOCKROOM_DEMO_DATA";
pub const STUB_LATENCY_ENV: &str = "STOCKROOM_STUB_LATENCY_MS";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must be true/false/1/0, got '{value}'")]
    InvalidBool { key: &'static str, value: String },
    #[error("STOCKROOM_API_URL must be an http(s) URL, got '{0}'")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Persistence service endpoint; `None` selects the stub transport.
    pub api_url: Option<String>,
    pub timeout: Duration,
    /// Install the demo catalogue when the initial load fails.
    pub seed_demo_data: bool,
    /// Artificial delay for every stub transport call.
    pub stub_latency: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            seed_demo_data: true,
            stub_latency: Duration::ZERO,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_ENV).map(|u| u.trim().to_string()) {
            if !url.is_empty() {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidUrl(url));
                }
                config.api_url = Some(url);
            }
        }
        if let Some(raw) = lookup(API_TIMEOUT_ENV) {
            config.timeout = Duration::from_secs(parse_number(API_TIMEOUT_ENV, &raw)?);
        }
        if let Some(raw) = lookup(DEMO_DATA_ENV) {
            config.seed_demo_data = parse_bool(DEMO_DATA_ENV, &raw)?;
        }
        if let Some(raw) = lookup(STUB_LATENCY_ENV) {
            config.stub_latency = Duration::from_millis(parse_number(STUB_LATENCY_ENV, &raw)?);
        }

        Ok(config)
    }

    pub fn transport_kind(&self) -> TransportKind {
        if self.api_url.is_some() {
            TransportKind::Http
        } else {
            TransportKind::Stub
        }
    }
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_select_stub_with_demo_data() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.transport_kind(), TransportKind::Stub);
        assert!(config.seed_demo_data);
    }

    #[test]
    fn api_url_selects_http() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_ENV, "https://script.example.com/exec"),
            (API_TIMEOUT_ENV, "5"),
            (DEMO_DATA_ENV, "false"),
        ]))
        .unwrap();

        assert_eq!(config.transport_kind(), TransportKind::Http);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn blank_api_url_is_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[(API_URL_ENV, "  ")])).unwrap();
        assert_eq!(config.api_url, None);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[(STUB_LATENCY_ENV, "soon")])),
            Err(ConfigError::InvalidNumber {
                key: STUB_LATENCY_ENV,
                value: "soon".to_string()
            })
        );
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(DEMO_DATA_ENV, "maybe")])),
            Err(ConfigError::InvalidBool { .. })
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(API_URL_ENV, "ftp://nope")])),
            Err(ConfigError::InvalidUrl(_))
        ));
    }
}

//! Per-client configuration.
//!
//! Set once when the client is created and treated as read-mostly afterwards.
//! Loadable from JSON; absent fields fall back to the defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::{CachePolicy, Scheme};

/// Default per-request timeout handed to the transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-request timeout, in seconds on the wire.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    pub default_scheme: Scheme,
    pub port: Option<u16>,
    pub cache_policy: CachePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            default_scheme: Scheme::Https,
            port: None,
            cache_policy: CachePolicy::ReloadIgnoringLocalCacheData,
        }
    }
}

impl ClientConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_client_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.default_scheme, Scheme::Https);
        assert_eq!(config.port, None);
        assert_eq!(config.cache_policy, CachePolicy::ReloadIgnoringLocalCacheData);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ClientConfig::from_json_str(r#"{"port":8080,"default_scheme":"http"}"#).unwrap();
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.default_scheme, Scheme::Http);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn timeout_is_seconds() {
        let config = ClientConfig::from_json_str(r#"{"timeout":2.5,"cache_policy":"return_cache_data_else_load"}"#).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.cache_policy, CachePolicy::ReturnCacheDataElseLoad);
    }

    #[test]
    fn negative_timeout_is_rejected() {
        assert!(ClientConfig::from_json_str(r#"{"timeout":-1}"#).is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let config = ClientConfig {
            timeout: Duration::from_secs(10),
            default_scheme: Scheme::WebSocket,
            port: Some(9000),
            cache_policy: CachePolicy::UseProtocolCachePolicy,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ClientConfig::from_json_str(&json).unwrap(), config);
    }
}

//! Access to the configuration Clowder injects into the pod.
//!
//! Clowder mounts a JSON document and points `ACG_CONFIG` at it. When the
//! variable is absent the service is not running under Clowder and callers fall
//! back to plain environment variables.

use std::env::VarError;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Environment variable naming the Clowder config document.
pub const ACG_CONFIG: &str = "ACG_CONFIG";

/// Source of platform-managed endpoint descriptors.
pub trait PlatformConfigProvider {
    /// Whether platform-managed configuration is active.
    fn is_enabled(&self) -> bool;
    fn dependency_endpoints(&self) -> &[DependencyEndpoint];
    fn kafka_brokers(&self) -> &[BrokerConfig];
}

/// Connection info of another app this service depends on.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DependencyEndpoint {
    #[serde(default)]
    pub name: String,
    pub app: String,
    pub hostname: String,
    pub port: i32,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub port: Option<i32>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct KafkaConfig {
    #[serde(default)]
    pub brokers: Vec<BrokerConfig>,
}

/// The subset of Clowder's `AppConfig` this service reads.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub endpoints: Vec<DependencyEndpoint>,
    #[serde(default)]
    pub kafka: Option<KafkaConfig>,
}

/// Loaded Clowder configuration, or nothing when Clowder is not in use.
#[derive(Debug, Clone, Default)]
pub struct Clowder {
    loaded: Option<AppConfig>,
}

impl Clowder {
    pub fn disabled() -> Self {
        Self { loaded: None }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let loaded: AppConfig = serde_json::from_str(json)?;
        Ok(Self {
            loaded: Some(loaded),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ClowderIo {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded Clowder config");
        Self::from_json(&raw)
    }

    /// Loads the document named by `ACG_CONFIG`, if the variable is set.
    pub fn from_env() -> Result<Self> {
        match std::env::var(ACG_CONFIG) {
            Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path)),
            Ok(_) | Err(VarError::NotPresent) => Ok(Self::disabled()),
            Err(VarError::NotUnicode(path)) => Err(ConfigError::ClowderPathNotUnicode(path)),
        }
    }

    pub fn app_config(&self) -> Option<&AppConfig> {
        self.loaded.as_ref()
    }
}

impl PlatformConfigProvider for Clowder {
    fn is_enabled(&self) -> bool {
        self.loaded.is_some()
    }

    fn dependency_endpoints(&self) -> &[DependencyEndpoint] {
        self.loaded
            .as_ref()
            .map(|cfg| cfg.endpoints.as_slice())
            .unwrap_or_default()
    }

    fn kafka_brokers(&self) -> &[BrokerConfig] {
        self.loaded
            .as_ref()
            .and_then(|cfg| cfg.kafka.as_ref())
            .map(|kafka| kafka.brokers.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clowder_document() {
        let json = r#"{
            "webPort": 8000,
            "endpoints": [
                {"name": "svc", "app": "sources-api", "hostname": "sources-api-svc", "port": 8000}
            ],
            "kafka": {
                "brokers": [{"hostname": "env-kafka", "port": 29092}],
                "topics": [{"requestedName": "platform.sources.event-stream", "name": "platform.sources.event-stream"}]
            }
        }"#;
        let clowder = Clowder::from_json(json).unwrap();
        assert!(clowder.is_enabled());
        assert_eq!(clowder.dependency_endpoints()[0].app, "sources-api");
        assert_eq!(clowder.dependency_endpoints()[0].hostname, "sources-api-svc");
        assert_eq!(clowder.kafka_brokers()[0].port, Some(29092));
    }

    #[test]
    fn missing_sections_yield_empty_slices() {
        let clowder = Clowder::from_json("{}").unwrap();
        assert!(clowder.is_enabled());
        assert!(clowder.dependency_endpoints().is_empty());
        assert!(clowder.kafka_brokers().is_empty());
    }

    #[test]
    fn broker_without_port() {
        let clowder =
            Clowder::from_json(r#"{"kafka": {"brokers": [{"hostname": "kafka"}]}}"#).unwrap();
        assert_eq!(clowder.kafka_brokers()[0].port, None);
    }

    #[test]
    fn disabled_has_no_descriptors() {
        let clowder = Clowder::disabled();
        assert!(!clowder.is_enabled());
        assert!(clowder.app_config().is_none());
        assert!(clowder.kafka_brokers().is_empty());
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = Clowder::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::ClowderParse(_)));
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let err = Clowder::from_file(Path::new("/nonexistent/cdappconfig.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ClowderIo { .. }));
    }
}

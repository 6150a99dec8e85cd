use serde::Deserialize;

use crate::clowder::{BrokerConfig, Clowder, PlatformConfigProvider};
use crate::error::{ConfigError, Result};

/// Port the service listens on when `PORT` is unset or "0".
pub const DEFAULT_PORT: &str = "8000";
/// Name of the sources back end in Clowder's dependency list.
pub const SOURCES_APP_NAME: &str = "sources-api";
/// Path to the latest sources API version.
pub const SOURCES_V31_PATH: &str = "api/sources/v3.1";

/// Raw environment variables consulted when Clowder is not in use.
/// Unset variables read as empty strings.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    #[serde(default)]
    pub sources_api_host: String,
    #[serde(default)]
    pub sources_api_port: String,
    #[serde(default)]
    pub queue_host: String,
    #[serde(default)]
    pub queue_port: String,
    #[serde(default)]
    pub port: String,
}

impl EnvSettings {
    pub fn from_env() -> Result<Self> {
        Self::build(config::Environment::default())
    }

    /// Builds the settings from an explicit set of variables instead of the
    /// process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::build(config::Environment::default().source(Some(source)))
    }

    fn build(env: config::Environment) -> Result<Self> {
        Ok(config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?)
    }
}

/// Endpoints the service talks to, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoints {
    /// Full URL of the sources API `health` endpoint.
    pub sources_api_health_url: String,
    /// Sources API base URL, including the versioned path.
    pub sources_api_url: String,
    /// "host:port" of the Kafka broker, for producers.
    pub kafka_url: String,
    /// Kafka host, for consumers.
    pub kafka_host: String,
    /// Kafka port, when the configured value parses as a port number.
    pub kafka_port: Option<u16>,
    /// Port this service listens on.
    pub listen_port: String,
}

impl ResolvedEndpoints {
    /// Resolves against Clowder (if `ACG_CONFIG` is set) and the process environment.
    pub fn load() -> Result<Self> {
        let clowder = Clowder::from_env()?;
        let env = EnvSettings::from_env()?;
        resolve(&clowder, &env)
    }
}

struct Upstream {
    health_url: String,
    api_url: String,
    kafka_host: String,
    kafka_port: Option<u16>,
    kafka_url: String,
}

/// Resolves the sources API and Kafka endpoints.
///
/// When the platform provider is enabled both come from its descriptors,
/// otherwise from `SOURCES_API_*` and `QUEUE_*`. The listening port is always
/// taken from `PORT`. The first missing value aborts the resolution.
pub fn resolve<P>(platform: &P, env: &EnvSettings) -> Result<ResolvedEndpoints>
where
    P: PlatformConfigProvider + ?Sized,
{
    let upstream = if platform.is_enabled() {
        from_platform(platform)?
    } else {
        from_env_vars(env)?
    };

    let listen_port = if env.port.is_empty() || env.port == "0" {
        DEFAULT_PORT.to_string()
    } else {
        env.port.clone()
    };

    Ok(ResolvedEndpoints {
        sources_api_health_url: upstream.health_url,
        sources_api_url: upstream.api_url,
        kafka_url: upstream.kafka_url,
        kafka_host: upstream.kafka_host,
        kafka_port: upstream.kafka_port,
        listen_port,
    })
}

fn from_platform<P>(platform: &P) -> Result<Upstream>
where
    P: PlatformConfigProvider + ?Sized,
{
    let dep = platform
        .dependency_endpoints()
        .iter()
        .find(|dep| dep.app == SOURCES_APP_NAME)
        .ok_or_else(|| ConfigError::DependencyNotFound(SOURCES_APP_NAME.to_string()))?;

    let health_url = format!("http://{}:{}/health", dep.hostname, dep.port);
    let api_url = format!("http://{}:{}/{}", dep.hostname, dep.port, SOURCES_V31_PATH);

    let BrokerConfig { hostname, port } = platform
        .kafka_brokers()
        .first()
        .ok_or(ConfigError::MissingField("Kafka hostname"))?;
    if hostname.is_empty() {
        return Err(ConfigError::MissingField("Kafka hostname"));
    }
    let port = match port {
        None | Some(0) => return Err(ConfigError::MissingField("Kafka port")),
        Some(p) => *p,
    };

    Ok(Upstream {
        health_url,
        api_url,
        kafka_url: format!("{hostname}:{port}"),
        kafka_host: hostname.clone(),
        kafka_port: u16::try_from(port).ok(),
    })
}

// No scheme is prepended here, unlike the Clowder branch.
fn from_env_vars(env: &EnvSettings) -> Result<Upstream> {
    let sources_host = &env.sources_api_host;
    if sources_host.is_empty() {
        return Err(ConfigError::MissingField("Sources API host"));
    }
    let sources_port = &env.sources_api_port;
    if sources_port.is_empty() || sources_port == "0" {
        return Err(ConfigError::MissingField("Sources API port"));
    }

    let health_url = format!("{sources_host}:{sources_port}/health");
    let api_url = format!("{sources_host}:{sources_port}/{SOURCES_V31_PATH}");

    let hostname = &env.queue_host;
    if hostname.is_empty() {
        return Err(ConfigError::MissingField("Kafka host"));
    }
    let port = &env.queue_port;
    if port.is_empty() || port == "0" {
        return Err(ConfigError::MissingField("Kafka port"));
    }

    Ok(Upstream {
        health_url,
        api_url,
        kafka_url: format!("{hostname}:{port}"),
        kafka_host: hostname.clone(),
        kafka_port: port.parse().ok(),
    })
}

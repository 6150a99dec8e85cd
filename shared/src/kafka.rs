//! Kafka client settings derived from the resolved endpoints.

use rdkafka::ClientConfig;

use crate::config::ResolvedEndpoints;

/// Base client configuration pointing at the resolved broker.
///
/// Callers add their own group id, topics and tuning on top.
pub fn client_config(endpoints: &ResolvedEndpoints) -> ClientConfig {
    let mut cfg = ClientConfig::new();
    cfg.set("bootstrap.servers", &endpoints.kafka_url);
    cfg
}

//! Shared pieces of the sources worker: endpoint resolution from Clowder or
//! the environment, the error type it reports, and Kafka client settings
//! built from the result.

pub mod clowder;
pub mod config;
pub mod error;
pub mod kafka;

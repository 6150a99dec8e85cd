use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not find \"{0}\" on Clowder's config")]
    DependencyNotFound(String),
    #[error("configuration missing: {0}")]
    MissingField(&'static str),
    #[error("ACG_CONFIG is not valid UTF-8: {0:?}")]
    ClowderPathNotUnicode(OsString),
    #[error("failed to read Clowder config {}: {source}", path.display())]
    ClowderIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse Clowder config: {0}")]
    ClowderParse(#[from] serde_json::Error),
    #[error("failed to read environment: {0}")]
    Environment(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { source: io::Error, path: PathBuf },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        source: toml::de::Error,
        path: PathBuf,
    },
    #[error("invalid value for {field} in {path}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
        path: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

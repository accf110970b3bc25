use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("not initialized: run 'trackwatch init'")]
    NotInitialized,

    #[error("missing configuration value: {0}")]
    MissingConfig(String),

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("state file {path} is corrupt: {source}")]
    CorruptState {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("provider returned status {status}")]
    Provider { status: u16 },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;

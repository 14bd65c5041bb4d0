use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown difficulty `{0}` (expected easy, medium or hard)")]
    InvalidDifficulty(String),
    #[error("unknown timeout policy `{0}` (expected restart or defeat)")]
    InvalidTimeoutPolicy(String),
    #[error("invalid seed `{0}`")]
    InvalidSeed(String),
    #[error("failed to read settings from {}", path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings file {}", path.display())]
    SettingsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

//! Error types for adaptation.

use thiserror::Error;

/// Result type alias for adapter operations.
pub type AdaptResult<T> = Result<T, AdaptError>;

/// Errors surfaced by the adapter layer.
///
/// Per-block and per-field problems never show up here: they degrade to
/// defaulted or unmanaged values instead.
#[derive(Error, Debug)]
pub enum AdaptError {
    #[error("Unknown resource family: {0}")]
    UnknownFamily(String),

    #[error("Invalid adapter configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Adapter task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

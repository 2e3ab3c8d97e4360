//! Error types for the configuration graph.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while loading or validating a module set.
///
/// Adaptation never produces these; only structurally invalid input does.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Invalid reference expression: {0}")]
    InvalidReference(String),

    #[error("Invalid range in {file}: lines {start}-{end} ({reason})")]
    InvalidRange {
        file: String,
        start: usize,
        end: usize,
        reason: String,
    },

    #[error("Invalid module '{path}': {reason}")]
    InvalidModule { path: String, reason: String },

    #[error("Invalid attribute '{name}' in {file}: {reason}")]
    InvalidAttribute {
        file: String,
        name: String,
        reason: String,
    },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Module set is empty: {0}")]
    EmptyModuleSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

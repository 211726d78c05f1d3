use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanflowError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("invalid {kind}: {value}")]
    InvalidValue { kind: &'static str, value: String },

    #[error("config not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("snapshot not found: {}", .0.display())]
    SnapshotNotFound(PathBuf),

    #[error("unsupported snapshot format '{0}': expected .yaml, .yml or .json")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PlanflowError {
    pub(crate) fn invalid(kind: &'static str, value: &str) -> Self {
        PlanflowError::InvalidValue {
            kind,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanflowError>;

use std::path::PathBuf;

use thiserror::Error;

/// Caller contract violations raised by the estimator.
///
/// Reference-data misses are never reported through this type: the resolver
/// absorbs them into documented fallback values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl EstimateError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidInput { field, .. } => field,
        }
    }
}

/// Failures while loading a reference table.
///
/// These only ever reach a log line; the affected table is replaced by its
/// built-in rows.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("failed to read reference table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed reference table {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("reference table {name} contains no usable rows")]
    Empty { name: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid estimator setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}

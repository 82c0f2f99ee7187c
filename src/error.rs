//! Error types for paradigm extraction and the record pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::classify::ParadigmKind;

/// Raised when a span forwarded to a form builder does not carry the
/// feature slots that builder's key policy needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("{kind} span `{feature_code}` is malformed: {reason}")]
    InputShape {
        kind: ParadigmKind,
        feature_code: String,
        reason: &'static str,
    },
}

impl ExtractError {
    pub(crate) fn input_shape(kind: ParadigmKind, feature_code: &str, reason: &'static str) -> Self {
        ExtractError::InputShape {
            kind,
            feature_code: feature_code.to_string(),
            reason,
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema YAML {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("POS map already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize output record: {0}")]
    Json(#[from] serde_json::Error),
}

//! Student data loading errors.
//!
//! The scoring engine itself never fails; these errors come from turning
//! user-supplied text into a [`StudentData`](crate::model::StudentData).
//! Every variant displays with the same generic lead so callers can show it
//! to an end user as-is.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading student attempt data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be read.
    #[error("Invalid JSON format or schema. Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid JSON.
    #[error("Invalid JSON format or schema. {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON does not have the expected student record shape.
    #[error("Invalid JSON format or schema. {0}")]
    InvalidSchema(String),
}

impl LoadError {
    /// Returns `true` if the input was readable but structurally wrong.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, LoadError::InvalidSchema(_))
    }
}

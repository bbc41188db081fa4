//! Error types for marker-viz operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for marker-viz operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading data or building views.
///
/// Rows that fail field validation are never reported through this type;
/// they are dropped during record extraction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A CSV resource could not be fetched.
    #[error("Load failed: {path}: {reason}")]
    Load {
        /// Path of the resource that failed to load.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Required columns are absent from a CSV header.
    #[error("Schema error in {resource}: missing column(s) {}", .missing.join(", "))]
    Schema {
        /// Resource being parsed.
        resource: String,
        /// Names of the absent columns.
        missing: Vec<String>,
    },

    /// The dataset has no "default" style to compare against.
    #[error("Dataset {dataset} has no default style to use as a baseline")]
    MissingBaseline {
        /// Dataset key.
        dataset: String,
    },

    /// The requested dataset is not among the loaded data.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// Marker data has not been loaded (or failed to load).
    #[error("Marker data not loaded")]
    NotLoaded,

    /// The platform clipboard rejected or does not support a write.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

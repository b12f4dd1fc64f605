use std::path::PathBuf;

use canon52_canonical::CanonicalizationError;
use canon52_core::AdjudicationError;
use thiserror::Error;

/// Errors that abort a replay or a pack operation.
///
/// Per-vector mismatches are not errors; they are recorded in a
/// [`ReplaySummary`](crate::runner::ReplaySummary).
#[derive(Error, Debug)]
pub enum ReplayError {
    /// I/O error while reading or writing a pack.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A pack file is not valid JSON.
    #[error("JSON parse error in {path}: {source}")]
    JsonParse {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// A pack document does not have the expected shape.
    #[error("malformed pack: {0}")]
    MalformedPack(String),
    /// An anchor document entry could not be read.
    #[error("invalid anchor: {0}")]
    InvalidAnchor(String),
    /// Fatal adjudication failure (a refusal without a reason).
    #[error("adjudication failed: {0}")]
    Adjudication(#[from] AdjudicationError),
    /// Canonicalization failed while hashing a whole pack.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
    /// A decision record could not be serialized for comparison.
    #[error("failed to serialize decision record: {0}")]
    Record(#[source] serde_json::Error),
}

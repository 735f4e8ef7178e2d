use jusdata_core::{Outcome, RecordError};
use thiserror::Error;

use crate::sparse::SparseError;

/// Loaded artifacts are inconsistent with each other or with the corpus.
///
/// Always fatal: an engine is never built from artifacts that fail these checks.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("unsupported artifact format version {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    #[error("corpus fingerprint mismatch: artifacts trained on {expected}, corpus is {found}")]
    CorpusMismatch { expected: String, found: String },

    #[error("{what}: expected {expected} rows, found {found}")]
    RowCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{what}: dimension {found} does not match vocabulary size {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("forum list disagrees with the manifest: manifest has {manifest}, model has {model}")]
    ForumMismatch { manifest: usize, model: usize },

    #[error("label encoding: {0}")]
    LabelEncoding(String),

    #[error("invalid vectorizer: {0}")]
    InvalidVectorizer(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("sparse vector error: {0}")]
    Sparse(#[from] SparseError),
}

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("corpus is empty")]
    EmptyCorpus,

    #[error("row {row}: {source}")]
    InvalidRecord { row: usize, source: RecordError },

    #[error("corpus has a single outcome class ({0}); need both to train")]
    SingleClass(Outcome),

    #[error("vocabulary is empty after tokenization and stop-word removal")]
    EmptyVocabulary,

    #[error("invalid training config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Sparse(#[from] SparseError),
}

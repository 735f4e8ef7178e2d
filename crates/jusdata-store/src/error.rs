use std::path::PathBuf;

use arrow::datatypes::DataType;
use jusdata_core::RecordError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("corpus file not found: {0}")]
    CorpusNotFound(PathBuf),

    #[error("artifact not found: {0} (run `jusdata train` first)")]
    ArtifactNotFound(PathBuf),

    #[error("unsupported corpus format: {0} (expected .csv or .parquet)")]
    UnsupportedFormat(PathBuf),

    #[error("corpus is missing required column {0:?}")]
    MissingColumn(&'static str),

    #[error("corpus column {column:?} has type {data_type}, which cannot be read as text")]
    ColumnType {
        column: &'static str,
        data_type: DataType,
    },

    #[error("corpus row {row}: {source}")]
    InvalidRow { row: usize, source: RecordError },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("json error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

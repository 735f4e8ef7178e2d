//! Historical case corpus files.
//!
//! CSV and Parquet are both read through Arrow. CSV columns are always read as
//! text regardless of what schema inference guesses; Parquet columns of any
//! castable type (dictionary-encoded strings, integer codes) are cast to text.
//! Blank cells arrive as nulls and are reported against their 1-based data row.

use std::fs::{self, File};
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::{can_cast_types, cast};
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use jusdata_core::corpus::{self, as_text_schema, case_schema, resolve_column};
use jusdata_core::{CaseRecord, Outcome, RecordError};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::{debug, info};

use crate::StoreError;

/// Rows sampled for CSV header and schema inference.
const CSV_INFER_ROWS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    Csv,
    Parquet,
}

impl CorpusFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Load and validate every record of a corpus file.
pub fn read_corpus(path: &Path) -> Result<Vec<CaseRecord>, StoreError> {
    if !path.exists() {
        return Err(StoreError::CorpusNotFound(path.to_path_buf()));
    }
    let format = CorpusFormat::from_path(path)
        .ok_or_else(|| StoreError::UnsupportedFormat(path.to_path_buf()))?;
    let batches = match format {
        CorpusFormat::Csv => read_csv_batches(path)?,
        CorpusFormat::Parquet => read_parquet_batches(path)?,
    };
    let records = records_from_batches(&batches)?;
    info!(path = %path.display(), rows = records.len(), "loaded corpus");
    Ok(records)
}

fn read_csv_batches(path: &Path) -> Result<Vec<RecordBatch>, StoreError> {
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);
    let (inferred, _) = format.infer_schema(&mut file, Some(CSV_INFER_ROWS))?;
    file.rewind()?;
    let schema = Arc::new(as_text_schema(&inferred));
    let reader = ReaderBuilder::new(schema).with_format(format).build(file)?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    debug!(batches = batches.len(), "read csv");
    Ok(batches)
}

fn read_parquet_batches(path: &Path) -> Result<Vec<RecordBatch>, StoreError> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    debug!(batches = batches.len(), "read parquet");
    Ok(batches)
}

/// Convert Arrow batches into records, resolving column aliases per batch.
///
/// `forum`, `claim_text` and `outcome` are required; a missing
/// `decision_text` column reads as empty decisions.
pub fn records_from_batches(batches: &[RecordBatch]) -> Result<Vec<CaseRecord>, StoreError> {
    let mut records = Vec::with_capacity(batches.iter().map(RecordBatch::num_rows).sum());
    for batch in batches {
        let forum_col = required_column(batch, corpus::FORUM)?;
        let claim_col = required_column(batch, corpus::CLAIM_TEXT)?;
        let outcome_col = required_column(batch, corpus::OUTCOME)?;
        let decision_col = resolve_column(&batch.schema(), corpus::DECISION_TEXT)
            .map(|i| text_column(batch.column(i), corpus::DECISION_TEXT))
            .transpose()?;

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;
            let invalid = |source: RecordError| StoreError::InvalidRow { row, source };

            let label = get_string(&outcome_col, i).unwrap_or_default();
            let outcome: Outcome = label.parse().map_err(invalid)?;
            let record = CaseRecord::new(
                get_string(&forum_col, i).unwrap_or_default(),
                get_string(&claim_col, i).unwrap_or_default(),
                outcome,
                decision_col
                    .as_ref()
                    .and_then(|col| get_string(col, i))
                    .unwrap_or_default(),
            );
            record.validate().map_err(invalid)?;
            records.push(record);
        }
    }
    Ok(records)
}

fn required_column(batch: &RecordBatch, name: &'static str) -> Result<StringArray, StoreError> {
    let index = resolve_column(&batch.schema(), name).ok_or(StoreError::MissingColumn(name))?;
    text_column(batch.column(index), name)
}

/// Cast a column of any text-convertible type to plain Utf8.
fn text_column(col: &ArrayRef, name: &'static str) -> Result<StringArray, StoreError> {
    let unreadable = || StoreError::ColumnType {
        column: name,
        data_type: col.data_type().clone(),
    };
    if !can_cast_types(col.data_type(), &DataType::Utf8) {
        return Err(unreadable());
    }
    let text = cast(col.as_ref(), &DataType::Utf8)?;
    text.as_string_opt::<i32>().cloned().ok_or_else(unreadable)
}

/// Build one batch in the canonical corpus schema.
pub fn records_to_batch(records: &[CaseRecord]) -> Result<RecordBatch, StoreError> {
    let column = |f: fn(&CaseRecord) -> &str| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(records.iter().map(f)))
    };
    let batch = RecordBatch::try_new(
        Arc::new(case_schema()),
        vec![
            column(|r| r.forum.as_str()),
            column(|r| r.claim_text.as_str()),
            column(|r| r.outcome.as_str()),
            column(|r| r.decision_text.as_str()),
        ],
    )?;
    Ok(batch)
}

/// Write records as CSV or Parquet depending on the extension of `path`.
pub fn write_corpus(path: &Path, records: &[CaseRecord]) -> Result<(), StoreError> {
    let format = CorpusFormat::from_path(path)
        .ok_or_else(|| StoreError::UnsupportedFormat(path.to_path_buf()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let batch = records_to_batch(records)?;
    let file = File::create(path)?;
    match format {
        CorpusFormat::Csv => {
            let mut writer = WriterBuilder::new().with_header(true).build(file);
            writer.write(&batch)?;
        }
        CorpusFormat::Parquet => {
            let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
            writer.write(&batch)?;
            writer.close()?;
        }
    }
    info!(path = %path.display(), rows = records.len(), "wrote corpus");
    Ok(())
}

fn get_string(col: &StringArray, row: usize) -> Option<String> {
    if col.is_null(row) {
        None
    } else {
        Some(col.value(row).to_string())
    }
}

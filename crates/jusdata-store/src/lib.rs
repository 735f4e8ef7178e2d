//! Storage layer: corpus files through Arrow (CSV, Parquet) and JSON
//! artifact files in a models directory.

mod error;
pub use error::StoreError;

pub mod artifacts;
pub mod corpus;

pub use artifacts::ArtifactDir;
pub use corpus::{CorpusFormat, read_corpus, records_from_batches, records_to_batch, write_corpus};

//! Legal claim risk models: a TF-IDF + logistic regression outcome
//! classifier and a TF-IDF cosine-similarity retriever over past cases.
//!
//! [`train`] fits both on a corpus and returns [`TrainedArtifacts`];
//! [`RiskEngine`] validates an artifact set once and then answers queries.

mod error;

pub mod artifacts;
pub mod classifier;
pub mod engine;
pub mod labels;
pub mod retriever;
pub mod sparse;
pub mod train;
pub mod vectorizer;

pub use artifacts::{ARTIFACT_FORMAT_VERSION, ArtifactManifest, TrainedArtifacts, corpus_fingerprint};
pub use classifier::{FitParams, FitReport, LogisticRegression, OutcomeModel};
pub use engine::{AnalyzeError, RiskEngine, RiskQuery, RiskReport, SimilarCase};
pub use error::{ArtifactError, TrainError};
pub use labels::{LabelEncoding, OutcomeCounts};
pub use retriever::{DEFAULT_TOP_N, Neighbor, SimilarityIndex, historical_success_rate};
pub use sparse::{SparseError, SparseVector};
pub use train::{TrainConfig, train};
pub use vectorizer::TfidfVectorizer;

pub mod case;
pub mod features;
pub mod risk;
pub mod schema;
pub mod synthetic;

pub use case::{CaseRecord, Outcome, RecordError, distinct_forums};
pub use features::{STOP_WORDS, build_classifier_features};
pub use risk::RiskLevel;
pub use schema::corpus;
pub use synthetic::synthetic_corpus;

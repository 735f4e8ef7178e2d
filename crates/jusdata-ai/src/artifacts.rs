//! The artifact set produced by training and consumed by [`RiskEngine`](crate::RiskEngine).

use chrono::{DateTime, Utc};
use jusdata_core::CaseRecord;
use ring::digest::{Context, SHA256};
use serde::{Deserialize, Serialize};

use crate::classifier::{FitReport, OutcomeModel};
use crate::labels::OutcomeCounts;
use crate::retriever::SimilarityIndex;

/// Bumped whenever the serialized layout of any artifact changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Metadata describing how and on what the artifacts were trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub format_version: u32,
    pub trained_at: DateTime<Utc>,
    pub corpus_rows: usize,
    /// SHA-256 of the corpus, see [`corpus_fingerprint`].
    pub corpus_fingerprint: String,
    pub outcome_counts: OutcomeCounts,
    pub outcome_vocabulary: usize,
    pub similarity_vocabulary: usize,
    pub forums: Vec<String>,
    pub fit: FitReport,
    /// Accuracy of the outcome classifier on its own training corpus.
    pub training_accuracy: f64,
}

/// Everything needed to serve queries, trained from one corpus.
#[derive(Debug, Clone)]
pub struct TrainedArtifacts {
    pub manifest: ArtifactManifest,
    pub outcome_model: OutcomeModel,
    pub similarity_index: SimilarityIndex,
    pub corpus: Vec<CaseRecord>,
}

/// Hex SHA-256 over every field of every record, in corpus order.
///
/// Fields are separated by U+001F and records by U+001E so that no
/// concatenation of different rows can collide.
pub fn corpus_fingerprint(records: &[CaseRecord]) -> String {
    let mut ctx = Context::new(&SHA256);
    for record in records {
        for field in [
            record.forum.as_str(),
            record.claim_text.as_str(),
            record.outcome.as_str(),
            record.decision_text.as_str(),
        ] {
            ctx.update(field.as_bytes());
            ctx.update(b"\x1f");
        }
        ctx.update(b"\x1e");
    }
    ctx.finish()
        .as_ref()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jusdata_core::{Outcome, synthetic_corpus};

    #[test]
    fn fingerprint_is_hex_sha256() {
        let fp = corpus_fingerprint(&synthetic_corpus(1));
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn empty_corpus_fingerprint_is_sha256_of_nothing() {
        assert_eq!(
            corpus_fingerprint(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fingerprint_changes_with_any_field() {
        let base = vec![CaseRecord::new("f", "claim", Outcome::Favorable, "d")];
        let mut flipped = base.clone();
        flipped[0].outcome = Outcome::Unfavorable;
        let mut edited = base.clone();
        edited[0].decision_text.push('!');

        let fp = corpus_fingerprint(&base);
        assert_ne!(fp, corpus_fingerprint(&flipped));
        assert_ne!(fp, corpus_fingerprint(&edited));
        assert_eq!(fp, corpus_fingerprint(&base.clone()));
    }

    #[test]
    fn field_boundaries_matter() {
        let a = vec![CaseRecord::new("ab", "c", Outcome::Favorable, "")];
        let b = vec![CaseRecord::new("a", "bc", Outcome::Favorable, "")];
        assert_ne!(corpus_fingerprint(&a), corpus_fingerprint(&b));
    }
}

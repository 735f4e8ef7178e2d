//! Query-time risk analysis over a validated artifact set.

use jusdata_core::{CaseRecord, Outcome, RiskLevel};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::artifacts::{ARTIFACT_FORMAT_VERSION, ArtifactManifest, TrainedArtifacts, corpus_fingerprint};
use crate::classifier::OutcomeModel;
use crate::error::ArtifactError;
use crate::retriever::{DEFAULT_TOP_N, Neighbor, SimilarityIndex, historical_success_rate};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("claim text must not be empty")]
    EmptyClaim,

    #[error("a forum must be selected")]
    EmptyForum,

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl AnalyzeError {
    /// True when the query itself was rejected, as opposed to a model failure.
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, Self::EmptyClaim | Self::EmptyForum)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskQuery {
    pub claim_text: String,
    pub forum: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl RiskQuery {
    pub fn new(claim_text: impl Into<String>, forum: impl Into<String>) -> Self {
        Self {
            claim_text: claim_text.into(),
            forum: forum.into(),
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    fn validate(&self) -> Result<(), AnalyzeError> {
        if self.claim_text.trim().is_empty() {
            return Err(AnalyzeError::EmptyClaim);
        }
        if self.forum.trim().is_empty() {
            return Err(AnalyzeError::EmptyForum);
        }
        Ok(())
    }
}

/// A historical case returned alongside a risk estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarCase {
    /// Row position in the training corpus.
    pub index: usize,
    pub forum: String,
    pub outcome: Outcome,
    pub claim_text: String,
    pub decision_text: String,
    pub similarity: f64,
}

impl From<Neighbor<'_>> for SimilarCase {
    fn from(n: Neighbor<'_>) -> Self {
        Self {
            index: n.index,
            forum: n.record.forum.clone(),
            outcome: n.record.outcome,
            claim_text: n.record.claim_text.clone(),
            decision_text: n.record.decision_text.clone(),
            similarity: n.similarity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Estimated probability of a favorable outcome.
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub similar_cases: Vec<SimilarCase>,
    /// Favorable fraction among `similar_cases`; 0 when there are none.
    pub historical_success_rate: f64,
}

/// Immutable after construction; share it behind an `Arc` to serve
/// concurrent queries.
#[derive(Debug)]
pub struct RiskEngine {
    manifest: ArtifactManifest,
    outcome_model: OutcomeModel,
    similarity_index: SimilarityIndex,
    corpus: Vec<CaseRecord>,
}

impl RiskEngine {
    /// Validate an artifact set and wrap it for querying.
    ///
    /// Fails if the artifacts were produced by a different format version,
    /// trained on a different corpus, or are internally inconsistent.
    pub fn from_artifacts(artifacts: TrainedArtifacts) -> Result<Self, ArtifactError> {
        let TrainedArtifacts {
            manifest,
            outcome_model,
            similarity_index,
            corpus,
        } = artifacts;

        if manifest.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedFormat {
                found: manifest.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }
        if manifest.corpus_rows != corpus.len() {
            return Err(ArtifactError::RowCount {
                what: "corpus",
                expected: manifest.corpus_rows,
                found: corpus.len(),
            });
        }
        let fingerprint = corpus_fingerprint(&corpus);
        if fingerprint != manifest.corpus_fingerprint {
            return Err(ArtifactError::CorpusMismatch {
                expected: manifest.corpus_fingerprint,
                found: fingerprint,
            });
        }

        outcome_model.validate()?;
        similarity_index.validate(corpus.len())?;
        if outcome_model.vectorizer().dim() != manifest.outcome_vocabulary {
            return Err(ArtifactError::DimensionMismatch {
                what: "outcome vectorizer",
                expected: manifest.outcome_vocabulary,
                found: outcome_model.vectorizer().dim(),
            });
        }
        if similarity_index.vectorizer().dim() != manifest.similarity_vocabulary {
            return Err(ArtifactError::DimensionMismatch {
                what: "similarity vectorizer",
                expected: manifest.similarity_vocabulary,
                found: similarity_index.vectorizer().dim(),
            });
        }
        if outcome_model.forums() != manifest.forums.as_slice() {
            return Err(ArtifactError::ForumMismatch {
                manifest: manifest.forums.len(),
                model: outcome_model.forums().len(),
            });
        }

        info!(
            rows = corpus.len(),
            trained_at = %manifest.trained_at,
            "risk engine ready"
        );
        Ok(Self {
            manifest,
            outcome_model,
            similarity_index,
            corpus,
        })
    }

    pub fn manifest(&self) -> &ArtifactManifest {
        &self.manifest
    }

    pub fn corpus(&self) -> &[CaseRecord] {
        &self.corpus
    }

    /// Forums seen in training, sorted. Other forums are accepted at query time.
    pub fn forums(&self) -> &[String] {
        self.outcome_model.forums()
    }

    /// Probability of a favorable outcome for the claim in the forum.
    pub fn predict(&self, claim_text: &str, forum: &str) -> Result<f64, ArtifactError> {
        self.outcome_model.predict(claim_text, forum)
    }

    pub fn find_similar(
        &self,
        claim_text: &str,
        top_n: usize,
    ) -> Result<Vec<Neighbor<'_>>, ArtifactError> {
        self.similarity_index
            .find_similar(claim_text, &self.corpus, top_n)
    }

    /// Probability, risk level, similar cases and their success rate.
    pub fn analyze(&self, query: &RiskQuery) -> Result<RiskReport, AnalyzeError> {
        query.validate()?;
        let probability = self.predict(&query.claim_text, &query.forum)?;
        let neighbors = self.find_similar(&query.claim_text, query.top_n)?;
        let historical_success_rate = historical_success_rate(&neighbors);
        let risk_level = RiskLevel::from_probability(probability);

        info!(
            forum = %query.forum,
            probability,
            risk = %risk_level,
            similar = neighbors.len(),
            historical_success_rate,
            "analyzed claim"
        );

        Ok(RiskReport {
            probability,
            risk_level,
            similar_cases: neighbors.into_iter().map(SimilarCase::from).collect(),
            historical_success_rate,
        })
    }
}

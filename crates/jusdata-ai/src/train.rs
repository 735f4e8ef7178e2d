//! Offline training: corpus in, artifact set out.

use chrono::Utc;
use jusdata_core::{CaseRecord, build_classifier_features, distinct_forums};
use tracing::info;

use crate::artifacts::{ARTIFACT_FORMAT_VERSION, ArtifactManifest, TrainedArtifacts, corpus_fingerprint};
use crate::classifier::{FitParams, LogisticRegression, OutcomeModel};
use crate::error::TrainError;
use crate::labels::{LabelEncoding, OutcomeCounts};
use crate::retriever::SimilarityIndex;

#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Inverse L2 regularization strength of the outcome classifier.
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
    /// Store the per-record similarity matrix with the index.
    pub precompute_matrix: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        let fit = FitParams::default();
        Self {
            c: fit.c,
            max_iter: fit.max_iter,
            tol: fit.tol,
            precompute_matrix: true,
        }
    }
}

impl TrainConfig {
    fn fit_params(&self) -> Result<FitParams, TrainError> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(TrainError::InvalidConfig(format!(
                "C must be positive, got {}",
                self.c
            )));
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(TrainError::InvalidConfig(format!(
                "tolerance must be non-negative, got {}",
                self.tol
            )));
        }
        Ok(FitParams {
            c: self.c,
            max_iter: self.max_iter,
            tol: self.tol,
        })
    }
}

/// Fit both components on the full corpus.
pub fn train(corpus: Vec<CaseRecord>, config: &TrainConfig) -> Result<TrainedArtifacts, TrainError> {
    let params = config.fit_params()?;
    if corpus.is_empty() {
        return Err(TrainError::EmptyCorpus);
    }
    for (i, record) in corpus.iter().enumerate() {
        record
            .validate()
            .map_err(|source| TrainError::InvalidRecord { row: i + 1, source })?;
    }

    let outcomes: Vec<_> = corpus.iter().map(|r| r.outcome).collect();
    let labels = LabelEncoding::fit(&outcomes)?;
    let positive = labels.decode(1);
    let y: Vec<f64> = outcomes
        .iter()
        .map(|&o| if Some(o) == positive { 1.0 } else { 0.0 })
        .collect();

    // Outcome classifier over claim + forum.
    let features: Vec<String> = corpus
        .iter()
        .map(|r| build_classifier_features(&r.claim_text, &r.forum))
        .collect();
    let vectorizer = OutcomeModel::fit_vectorizer(&features);
    if vectorizer.dim() == 0 {
        return Err(TrainError::EmptyVocabulary);
    }
    let x = vectorizer.transform_batch(&features);
    let (classifier, fit) = LogisticRegression::fit(&x, &y, vectorizer.dim(), &params)?;

    let mut correct = 0usize;
    for (row, &target) in x.iter().zip(&y) {
        let p1 = classifier.predict_proba(row)?[1];
        if (p1 >= 0.5) == (target == 1.0) {
            correct += 1;
        }
    }
    let training_accuracy = correct as f64 / corpus.len() as f64;

    let forums = distinct_forums(&corpus);
    let outcome_vocabulary = vectorizer.dim();
    let outcome_model = OutcomeModel::new(vectorizer, classifier, labels, forums.clone());

    // Similarity index over claim text only.
    let mut similarity_index = SimilarityIndex::build(&corpus);
    if !config.precompute_matrix {
        similarity_index = similarity_index.without_matrix();
    }

    let manifest = ArtifactManifest {
        format_version: ARTIFACT_FORMAT_VERSION,
        trained_at: Utc::now(),
        corpus_rows: corpus.len(),
        corpus_fingerprint: corpus_fingerprint(&corpus),
        outcome_counts: OutcomeCounts::from_records(&corpus),
        outcome_vocabulary,
        similarity_vocabulary: similarity_index.vectorizer().dim(),
        forums,
        fit,
        training_accuracy,
    };

    info!(
        rows = manifest.corpus_rows,
        forums = manifest.forums.len(),
        outcome_vocabulary,
        similarity_vocabulary = manifest.similarity_vocabulary,
        iterations = fit.iterations,
        converged = fit.converged,
        training_accuracy,
        "training complete"
    );

    Ok(TrainedArtifacts {
        manifest,
        outcome_model,
        similarity_index,
        corpus,
    })
}

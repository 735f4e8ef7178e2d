//! Binary outcome classification: TF-IDF features into an L2-regularized
//! logistic regression.
//!
//! Training minimizes the mean log-loss plus `||w||² / (2·C·n)` (the intercept
//! is not penalized) by full-batch gradient descent with Armijo backtracking,
//! starting from zero. There is no randomness, so a given corpus and config
//! always produce the same weights.

use jusdata_core::{STOP_WORDS, build_classifier_features};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ArtifactError;
use crate::labels::LabelEncoding;
use crate::sparse::{SparseError, SparseVector};
use crate::vectorizer::TfidfVectorizer;

/// Optimizer settings for [`LogisticRegression::fit`].
#[derive(Debug, Clone, Copy)]
pub struct FitParams {
    /// Inverse regularization strength.
    pub c: f64,
    pub max_iter: usize,
    /// Stop once the largest gradient component falls below this.
    pub tol: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 5000,
            tol: 1e-6,
        }
    }
}

/// What the optimizer did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub iterations: usize,
    pub converged: bool,
    pub final_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    /// Fit on rows `x` with binary targets `y` (0 or 1). All rows must share
    /// dimension `dim`.
    pub fn fit(
        x: &[SparseVector],
        y: &[f64],
        dim: usize,
        params: &FitParams,
    ) -> Result<(Self, FitReport), SparseError> {
        if let Some(row) = x.iter().find(|r| r.dim() != dim) {
            return Err(SparseError::DimensionMismatch {
                left: row.dim(),
                right: dim,
            });
        }

        let objective = Objective {
            x,
            y,
            reg: 1.0 / (params.c * x.len().max(1) as f64),
        };

        let mut model = Self {
            weights: vec![0.0; dim],
            intercept: 0.0,
        };
        let mut loss = objective.loss(&model);
        let mut step = 1.0;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < params.max_iter {
            let (grad_w, grad_b) = objective.gradient(&model);
            let grad_max = grad_w
                .iter()
                .chain(std::iter::once(&grad_b))
                .fold(0.0f64, |m, g| m.max(g.abs()));
            if grad_max < params.tol {
                converged = true;
                break;
            }
            let grad_sq: f64 = grad_w.iter().map(|g| g * g).sum::<f64>() + grad_b * grad_b;

            // Armijo backtracking; grow the step again after each accepted move.
            loop {
                let candidate = Self {
                    weights: model
                        .weights
                        .iter()
                        .zip(&grad_w)
                        .map(|(w, g)| w - step * g)
                        .collect(),
                    intercept: model.intercept - step * grad_b,
                };
                let candidate_loss = objective.loss(&candidate);
                if candidate_loss <= loss - 0.5 * step * grad_sq {
                    model = candidate;
                    loss = candidate_loss;
                    step *= 2.0;
                    break;
                }
                step *= 0.5;
                if step < 1e-12 {
                    break;
                }
            }
            iterations += 1;
            if step < 1e-12 {
                warn!(iterations, loss, "line search stalled");
                break;
            }
        }

        debug!(iterations, converged, loss, "fitted logistic regression");
        Ok((
            model,
            FitReport {
                iterations,
                converged,
                final_loss: loss,
            },
        ))
    }

    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn decision_function(&self, x: &SparseVector) -> Result<f64, SparseError> {
        Ok(x.dot_dense(&self.weights)? + self.intercept)
    }

    /// Class probabilities `[P(class 0), P(class 1)]`.
    pub fn predict_proba(&self, x: &SparseVector) -> Result<[f64; 2], SparseError> {
        let p1 = sigmoid(self.decision_function(x)?);
        Ok([1.0 - p1, p1])
    }
}

struct Objective<'a> {
    x: &'a [SparseVector],
    y: &'a [f64],
    reg: f64,
}

impl Objective<'_> {
    fn margins(&self, model: &LogisticRegression) -> Vec<f64> {
        self.x
            .iter()
            .map(|row| row.iter().map(|(i, v)| v * model.weights[i]).sum::<f64>() + model.intercept)
            .collect()
    }

    fn loss(&self, model: &LogisticRegression) -> f64 {
        let n = self.x.len().max(1) as f64;
        let data: f64 = self
            .margins(model)
            .iter()
            .zip(self.y)
            .map(|(&z, &y)| softplus(z) - y * z)
            .sum();
        let penalty: f64 = model.weights.iter().map(|w| w * w).sum();
        data / n + 0.5 * self.reg * penalty
    }

    fn gradient(&self, model: &LogisticRegression) -> (Vec<f64>, f64) {
        let n = self.x.len().max(1) as f64;
        let mut grad_w: Vec<f64> = model.weights.iter().map(|w| self.reg * w).collect();
        let mut grad_b = 0.0;
        for ((row, &z), &y) in self.x.iter().zip(self.margins(model).iter()).zip(self.y) {
            let residual = (sigmoid(z) - y) / n;
            for (i, v) in row.iter() {
                grad_w[i] += residual * v;
            }
            grad_b += residual;
        }
        (grad_w, grad_b)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// The trained outcome model: vectorizer, classifier, and label encoding
/// bound together, plus the forums seen in training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeModel {
    vectorizer: TfidfVectorizer,
    classifier: LogisticRegression,
    labels: LabelEncoding,
    forums: Vec<String>,
}

impl OutcomeModel {
    pub fn new(
        vectorizer: TfidfVectorizer,
        classifier: LogisticRegression,
        labels: LabelEncoding,
        forums: Vec<String>,
    ) -> Self {
        Self {
            vectorizer,
            classifier,
            labels,
            forums,
        }
    }

    /// Fit the vectorizer on the combined claim/forum strings of a corpus.
    pub fn fit_vectorizer(feature_strings: &[String]) -> TfidfVectorizer {
        TfidfVectorizer::fit(feature_strings, STOP_WORDS)
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    pub fn labels(&self) -> &LabelEncoding {
        &self.labels
    }

    /// Forums seen in training, sorted.
    pub fn forums(&self) -> &[String] {
        &self.forums
    }

    pub fn knows_forum(&self, forum: &str) -> bool {
        self.forums.binary_search_by(|f| f.as_str().cmp(forum)).is_ok()
    }

    /// Consistency checks run once when artifacts are loaded.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        self.vectorizer.validate()?;
        self.labels.verify()?;
        if self.classifier.dim() != self.vectorizer.dim() {
            return Err(ArtifactError::DimensionMismatch {
                what: "outcome classifier weights",
                expected: self.vectorizer.dim(),
                found: self.classifier.dim(),
            });
        }
        if self
            .classifier
            .weights()
            .iter()
            .chain(std::iter::once(&self.classifier.intercept()))
            .any(|w| !w.is_finite())
        {
            return Err(ArtifactError::InvalidModel(
                "non-finite classifier weight".into(),
            ));
        }
        if !self.forums.windows(2).all(|w| w[0] < w[1]) {
            return Err(ArtifactError::InvalidModel(
                "forum list is not sorted and unique".into(),
            ));
        }
        Ok(())
    }

    /// Probability that a claim in the given forum is judged favorably.
    ///
    /// Unseen forums are not an error: their tokens have no weight.
    pub fn predict(&self, claim_text: &str, forum: &str) -> Result<f64, ArtifactError> {
        if !self.knows_forum(forum) {
            warn!(forum, "forum not seen in training; prediction relies on claim text");
        }
        let features = build_classifier_features(claim_text, forum);
        let x = self.vectorizer.transform(&features);
        let proba = self.classifier.predict_proba(&x)?;
        Ok(proba[self.labels.favorable_index()?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_data() -> (TfidfVectorizer, Vec<SparseVector>, Vec<f64>) {
        let docs = [
            "good outcome alpha",
            "good result alpha",
            "bad outcome beta",
            "bad result beta",
        ];
        let v = TfidfVectorizer::fit(&docs, &[]);
        let x = v.transform_batch(&docs);
        (v, x, vec![1.0, 1.0, 0.0, 0.0])
    }

    #[test]
    fn sigmoid_is_bounded_and_symmetric() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(3.0) + sigmoid(-3.0) - 1.0).abs() < 1e-12);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0) >= 0.0);
    }

    #[test]
    fn softplus_is_stable() {
        assert!((softplus(0.0) - 2.0f64.ln()).abs() < 1e-12);
        assert!((softplus(800.0) - 800.0).abs() < 1e-9);
        assert!(softplus(-800.0) >= 0.0);
    }

    #[test]
    fn fit_separates_toy_data() {
        let (v, x, y) = toy_data();
        let (clf, report) = LogisticRegression::fit(&x, &y, v.dim(), &FitParams::default()).unwrap();
        assert!(report.iterations > 0);
        let good = clf.predict_proba(&v.transform("good alpha")).unwrap()[1];
        let bad = clf.predict_proba(&v.transform("bad beta")).unwrap()[1];
        assert!(good > 0.5, "good = {good}");
        assert!(bad < 0.5, "bad = {bad}");
    }

    #[test]
    fn fit_decreases_loss_from_zero_model() {
        let (v, x, y) = toy_data();
        let (_, report) = LogisticRegression::fit(&x, &y, v.dim(), &FitParams::default()).unwrap();
        // The zero model has loss ln 2.
        assert!(report.final_loss < 2.0f64.ln());
    }

    #[test]
    fn stronger_regularization_shrinks_weights() {
        let (v, x, y) = toy_data();
        let loose = FitParams {
            c: 10.0,
            ..FitParams::default()
        };
        let tight = FitParams {
            c: 0.01,
            ..FitParams::default()
        };
        let (a, _) = LogisticRegression::fit(&x, &y, v.dim(), &loose).unwrap();
        let (b, _) = LogisticRegression::fit(&x, &y, v.dim(), &tight).unwrap();
        let norm = |m: &LogisticRegression| m.weights().iter().map(|w| w * w).sum::<f64>();
        assert!(norm(&a) > norm(&b));
    }

    #[test]
    fn fit_is_deterministic() {
        let (v, x, y) = toy_data();
        let (a, ra) = LogisticRegression::fit(&x, &y, v.dim(), &FitParams::default()).unwrap();
        let (b, rb) = LogisticRegression::fit(&x, &y, v.dim(), &FitParams::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(ra, rb);
    }

    #[test]
    fn fit_rejects_wrong_dimension() {
        let (v, x, y) = toy_data();
        assert!(LogisticRegression::fit(&x, &y, v.dim() + 1, &FitParams::default()).is_err());
    }

    #[test]
    fn proba_sums_to_one() {
        let (v, x, y) = toy_data();
        let (clf, _) = LogisticRegression::fit(&x, &y, v.dim(), &FitParams::default()).unwrap();
        let [p0, p1] = clf.predict_proba(&v.transform("good beta")).unwrap();
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
        assert!((0.0..=1.0).contains(&p1));
    }

    #[test]
    fn outcome_model_validate_catches_dimension_skew() {
        let (v, x, y) = toy_data();
        let (clf, _) = LogisticRegression::fit(&x, &y, v.dim(), &FitParams::default()).unwrap();
        let other = TfidfVectorizer::fit(&["just two"], &[]);
        let model = OutcomeModel::new(other, clf, LabelEncoding::canonical(), vec![]);
        assert!(matches!(
            model.validate(),
            Err(ArtifactError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn knows_forum_uses_sorted_list() {
        let (v, x, y) = toy_data();
        let (clf, _) = LogisticRegression::fit(&x, &y, v.dim(), &FitParams::default()).unwrap();
        let model = OutcomeModel::new(
            v,
            clf,
            LabelEncoding::canonical(),
            vec!["a forum".into(), "b forum".into()],
        );
        assert!(model.validate().is_ok());
        assert!(model.knows_forum("b forum"));
        assert!(!model.knows_forum("c forum"));
    }
}

//! Outcome label encoding for the binary classifier.
//!
//! Classes are ordered by sorting their canonical corpus spelling, so
//! `Improcedente` encodes to 0 and `Procedente` to 1. The encoding travels with
//! the trained model and is checked on load; the favorable-class probability is
//! always looked up through it rather than assumed to sit at index 1.

use std::collections::HashSet;

use jusdata_core::{CaseRecord, Outcome};
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, TrainError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoding {
    /// Encoded value → outcome.
    classes: Vec<Outcome>,
}

/// Outcome counts over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub total: usize,
    pub favorable: usize,
    pub unfavorable: usize,
}

impl OutcomeCounts {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CaseRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.total += 1;
            if record.outcome.is_favorable() {
                counts.favorable += 1;
            } else {
                counts.unfavorable += 1;
            }
        }
        counts
    }

    /// Fraction of favorable outcomes; 0 for an empty set.
    pub fn favorable_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.favorable as f64 / self.total as f64
        }
    }
}

impl LabelEncoding {
    /// The deterministic encoding over both outcomes.
    pub fn canonical() -> Self {
        Self::sorted(Outcome::ALL.to_vec())
    }

    /// Fit an encoding on observed outcomes. Both classes must be present.
    pub fn fit(outcomes: &[Outcome]) -> Result<Self, TrainError> {
        let distinct: HashSet<Outcome> = outcomes.iter().copied().collect();
        match distinct.len() {
            0 => Err(TrainError::EmptyCorpus),
            1 => Err(TrainError::SingleClass(outcomes[0])),
            _ => Ok(Self::sorted(distinct.into_iter().collect())),
        }
    }

    fn sorted(mut classes: Vec<Outcome>) -> Self {
        classes.sort_by_key(|o| o.as_str());
        Self { classes }
    }

    pub fn classes(&self) -> &[Outcome] {
        &self.classes
    }

    pub fn encode(&self, outcome: Outcome) -> Option<usize> {
        self.classes.iter().position(|&c| c == outcome)
    }

    pub fn decode(&self, index: usize) -> Option<Outcome> {
        self.classes.get(index).copied()
    }

    /// Encoded value of the positive (favorable) class.
    pub fn favorable_index(&self) -> Result<usize, ArtifactError> {
        self.encode(Outcome::Favorable).ok_or_else(|| {
            ArtifactError::LabelEncoding("favorable class missing from encoding".into())
        })
    }

    /// Check that a loaded encoding is the one training produces.
    pub fn verify(&self) -> Result<(), ArtifactError> {
        let expected = Self::canonical();
        if *self != expected {
            return Err(ArtifactError::LabelEncoding(format!(
                "stored classes {:?}, expected {:?}",
                self.class_names(),
                expected.class_names()
            )));
        }
        Ok(())
    }

    fn class_names(&self) -> Vec<&'static str> {
        self.classes.iter().map(|c| c.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_alphabetical_by_corpus_label() {
        let enc = LabelEncoding::canonical();
        assert_eq!(enc.classes(), &[Outcome::Unfavorable, Outcome::Favorable]);
        assert_eq!(enc.encode(Outcome::Unfavorable), Some(0));
        assert_eq!(enc.favorable_index().unwrap(), 1);
        assert_eq!(enc.decode(1), Some(Outcome::Favorable));
        assert_eq!(enc.decode(2), None);
    }

    #[test]
    fn fit_is_independent_of_observation_order() {
        let a = LabelEncoding::fit(&[Outcome::Favorable, Outcome::Unfavorable]).unwrap();
        let b = LabelEncoding::fit(&[Outcome::Unfavorable, Outcome::Favorable]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, LabelEncoding::canonical());
    }

    #[test]
    fn fit_requires_two_classes() {
        assert!(matches!(
            LabelEncoding::fit(&[Outcome::Favorable, Outcome::Favorable]),
            Err(TrainError::SingleClass(Outcome::Favorable))
        ));
        assert!(matches!(
            LabelEncoding::fit(&[]),
            Err(TrainError::EmptyCorpus)
        ));
    }

    #[test]
    fn verify_rejects_swapped_classes() {
        let swapped: LabelEncoding =
            serde_json::from_str(r#"{"classes":["Procedente","Improcedente"]}"#).unwrap();
        assert!(matches!(
            swapped.verify(),
            Err(ArtifactError::LabelEncoding(_))
        ));
        assert!(LabelEncoding::canonical().verify().is_ok());
    }

    #[test]
    fn outcome_counts() {
        let records = vec![
            CaseRecord::new("f", "a", Outcome::Favorable, ""),
            CaseRecord::new("f", "b", Outcome::Unfavorable, ""),
            CaseRecord::new("f", "c", Outcome::Favorable, ""),
            CaseRecord::new("f", "d", Outcome::Favorable, ""),
        ];
        let counts = OutcomeCounts::from_records(&records);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.favorable, 3);
        assert_eq!(counts.unfavorable, 1);
        assert!((counts.favorable_rate() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn empty_counts_rate_is_zero() {
        assert_eq!(OutcomeCounts::default().favorable_rate(), 0.0);
    }
}

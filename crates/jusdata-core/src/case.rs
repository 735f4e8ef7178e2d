//! Historical case records and the binary outcome label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("unknown outcome label: {0:?}")]
    UnknownOutcome(String),

    #[error("claim text is empty")]
    EmptyClaim,

    #[error("forum is empty")]
    EmptyForum,
}

/// Outcome of a historical decision.
///
/// Serialized with the corpus spelling (`Procedente` / `Improcedente`).
/// Parsing also accepts the English names, case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "Procedente", alias = "Favorable")]
    Favorable,
    #[serde(rename = "Improcedente", alias = "Unfavorable")]
    Unfavorable,
}

impl Outcome {
    pub const ALL: [Outcome; 2] = [Outcome::Favorable, Outcome::Unfavorable];

    /// Canonical label as it appears in the corpus.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorable => "Procedente",
            Self::Unfavorable => "Improcedente",
        }
    }

    pub fn is_favorable(&self) -> bool {
        matches!(self, Self::Favorable)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "procedente" | "favorable" | "favourable" => Ok(Self::Favorable),
            "improcedente" | "unfavorable" | "unfavourable" => Ok(Self::Unfavorable),
            _ => Err(RecordError::UnknownOutcome(s.to_string())),
        }
    }
}

/// One historical decision.
///
/// `decision_text` is carried for display only and never feeds a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub forum: String,
    pub claim_text: String,
    pub outcome: Outcome,
    pub decision_text: String,
}

impl CaseRecord {
    pub fn new(
        forum: impl Into<String>,
        claim_text: impl Into<String>,
        outcome: Outcome,
        decision_text: impl Into<String>,
    ) -> Self {
        Self {
            forum: forum.into(),
            claim_text: claim_text.into(),
            outcome,
            decision_text: decision_text.into(),
        }
    }

    /// Check the corpus invariant: non-empty claim text and forum.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.claim_text.trim().is_empty() {
            return Err(RecordError::EmptyClaim);
        }
        if self.forum.trim().is_empty() {
            return Err(RecordError::EmptyForum);
        }
        Ok(())
    }
}

/// Sorted, de-duplicated forums appearing in a corpus.
pub fn distinct_forums(records: &[CaseRecord]) -> Vec<String> {
    let mut forums: Vec<String> = records.iter().map(|r| r.forum.clone()).collect();
    forums.sort();
    forums.dedup();
    forums
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_corpus_and_english_labels() {
        assert_eq!("Procedente".parse::<Outcome>(), Ok(Outcome::Favorable));
        assert_eq!("Improcedente".parse::<Outcome>(), Ok(Outcome::Unfavorable));
        assert_eq!(" favorable ".parse::<Outcome>(), Ok(Outcome::Favorable));
        assert_eq!("UNFAVORABLE".parse::<Outcome>(), Ok(Outcome::Unfavorable));
    }

    #[test]
    fn rejects_unknown_label() {
        assert_eq!(
            "Parcialmente procedente".parse::<Outcome>(),
            Err(RecordError::UnknownOutcome("Parcialmente procedente".into()))
        );
    }

    #[test]
    fn serializes_with_corpus_spelling() {
        let json = serde_json::to_string(&Outcome::Favorable).unwrap();
        assert_eq!(json, "\"Procedente\"");
        let parsed: Outcome = serde_json::from_str("\"Unfavorable\"").unwrap();
        assert_eq!(parsed, Outcome::Unfavorable);
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let ok = CaseRecord::new("1ª Vara Cível", "Negativação indevida", Outcome::Favorable, "");
        assert!(ok.validate().is_ok());

        let no_claim = CaseRecord::new("1ª Vara Cível", "   ", Outcome::Favorable, "");
        assert_eq!(no_claim.validate(), Err(RecordError::EmptyClaim));

        let no_forum = CaseRecord::new("", "Negativação indevida", Outcome::Favorable, "");
        assert_eq!(no_forum.validate(), Err(RecordError::EmptyForum));
    }

    #[test]
    fn distinct_forums_sorted_and_unique() {
        let records = vec![
            CaseRecord::new("b", "x", Outcome::Favorable, ""),
            CaseRecord::new("a", "y", Outcome::Unfavorable, ""),
            CaseRecord::new("b", "z", Outcome::Favorable, ""),
        ];
        assert_eq!(distinct_forums(&records), vec!["a", "b"]);
    }
}

//! Content-based retrieval of similar historical claims.
//!
//! The index holds a TF-IDF vectorizer fitted on claim text only. At query
//! time every historical claim is re-vectorized with that same vectorizer, so
//! query and corpus vectors always share a vocabulary. The precomputed matrix
//! stored alongside is only shape-checked on load.

use jusdata_core::{CaseRecord, STOP_WORDS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ArtifactError;
use crate::sparse::SparseVector;
use crate::vectorizer::TfidfVectorizer;

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityIndex {
    vectorizer: TfidfVectorizer,
    /// One row per corpus record, in corpus order.
    matrix: Option<Vec<SparseVector>>,
}

/// A retrieved historical case with its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    /// Position in the corpus.
    pub index: usize,
    pub record: &'a CaseRecord,
    pub similarity: f64,
}

impl SimilarityIndex {
    /// Fit on the corpus claims and precompute one vector per record.
    pub fn build(corpus: &[CaseRecord]) -> Self {
        let claims: Vec<&str> = corpus.iter().map(|r| r.claim_text.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&claims, STOP_WORDS);
        let matrix = vectorizer.transform_batch(&claims);
        Self {
            vectorizer,
            matrix: Some(matrix),
        }
    }

    /// Drop the precomputed matrix. Retrieval does not depend on it.
    pub fn without_matrix(self) -> Self {
        Self {
            matrix: None,
            ..self
        }
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn has_matrix(&self) -> bool {
        self.matrix.is_some()
    }

    /// Check the index against the corpus it will be queried with.
    pub fn validate(&self, corpus_len: usize) -> Result<(), ArtifactError> {
        self.vectorizer.validate()?;
        let Some(matrix) = &self.matrix else {
            return Ok(());
        };
        if matrix.len() != corpus_len {
            return Err(ArtifactError::RowCount {
                what: "similarity matrix",
                expected: corpus_len,
                found: matrix.len(),
            });
        }
        for row in matrix {
            if row.dim() != self.vectorizer.dim() {
                return Err(ArtifactError::DimensionMismatch {
                    what: "similarity matrix row",
                    expected: self.vectorizer.dim(),
                    found: row.dim(),
                });
            }
            row.validate()?;
        }
        Ok(())
    }

    /// The `top_n` corpus records most similar to `claim_text`.
    ///
    /// Ordered by similarity descending; ties keep corpus order. Returns
    /// `min(top_n, corpus.len())` neighbors, even when every similarity is 0.
    pub fn find_similar<'a>(
        &self,
        claim_text: &str,
        corpus: &'a [CaseRecord],
        top_n: usize,
    ) -> Result<Vec<Neighbor<'a>>, ArtifactError> {
        let query = self.vectorizer.transform(claim_text);
        let scores = corpus
            .iter()
            .map(|record| {
                let row = self.vectorizer.transform(&record.claim_text);
                if row.dim() != query.dim() {
                    return Err(ArtifactError::DimensionMismatch {
                        what: "historical claim vector",
                        expected: query.dim(),
                        found: row.dim(),
                    });
                }
                Ok(query.cosine(&row)?)
            })
            .collect::<Result<Vec<f64>, ArtifactError>>()?;

        let mut order: Vec<usize> = (0..corpus.len()).collect();
        // Stable: equal scores stay in corpus order.
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
        order.truncate(top_n);

        debug!(
            top_n,
            returned = order.len(),
            best = ?order.first().map(|&i| scores[i]),
            "retrieved similar cases"
        );

        Ok(order
            .into_iter()
            .map(|index| Neighbor {
                index,
                record: &corpus[index],
                similarity: scores[index],
            })
            .collect())
    }
}

/// Fraction of favorable outcomes among the neighbors; 0 when there are none.
pub fn historical_success_rate(neighbors: &[Neighbor<'_>]) -> f64 {
    if neighbors.is_empty() {
        return 0.0;
    }
    let favorable = neighbors
        .iter()
        .filter(|n| n.record.outcome.is_favorable())
        .count();
    favorable as f64 / neighbors.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use jusdata_core::{Outcome, synthetic_corpus};

    fn small_corpus() -> Vec<CaseRecord> {
        vec![
            CaseRecord::new("f1", "atraso na entrega do produto", Outcome::Favorable, "d0"),
            CaseRecord::new("f2", "cobrança indevida de taxa", Outcome::Unfavorable, "d1"),
            CaseRecord::new("f1", "atraso na entrega do produto", Outcome::Unfavorable, "d2"),
            CaseRecord::new("f3", "vício oculto no produto", Outcome::Favorable, "d3"),
        ]
    }

    #[test]
    fn returns_min_of_top_n_and_corpus_size() {
        let corpus = small_corpus();
        let index = SimilarityIndex::build(&corpus);
        for top_n in [0, 1, 3, 4, 10] {
            let hits = index.find_similar("produto", &corpus, top_n).unwrap();
            assert_eq!(hits.len(), top_n.min(corpus.len()), "top_n = {top_n}");
        }
    }

    #[test]
    fn ordered_by_non_increasing_similarity() {
        let corpus = synthetic_corpus(2);
        let index = SimilarityIndex::build(&corpus);
        let hits = index
            .find_similar("cobrança indevida de serviço", &corpus, corpus.len())
            .unwrap();
        for pair in hits.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn verbatim_claim_scores_one_and_ranks_first() {
        let corpus = small_corpus();
        let index = SimilarityIndex::build(&corpus);
        let hits = index.find_similar("vício oculto no produto", &corpus, 2).unwrap();
        assert_eq!(hits[0].index, 3);
        assert!((hits[0].similarity - 1.0).abs() < 1e-9);
        assert!(hits[1].similarity < 1.0);
    }

    #[test]
    fn ties_keep_corpus_order() {
        let corpus = small_corpus();
        let index = SimilarityIndex::build(&corpus);
        let hits = index
            .find_similar("atraso na entrega do produto", &corpus, 2)
            .unwrap();
        assert_eq!(hits[0].index, 0);
        assert_eq!(hits[1].index, 2);
        assert_eq!(hits[0].similarity, hits[1].similarity);
    }

    #[test]
    fn no_shared_vocabulary_returns_corpus_order_with_zero_scores() {
        let corpus = small_corpus();
        let index = SimilarityIndex::build(&corpus);
        let hits = index.find_similar("xyz qwerty", &corpus, 3).unwrap();
        let indices: Vec<_> = hits.iter().map(|h| h.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(hits.iter().all(|h| h.similarity == 0.0));
    }

    #[test]
    fn success_rate_counts_returned_records_only() {
        let corpus = small_corpus();
        let index = SimilarityIndex::build(&corpus);
        let hits = index
            .find_similar("atraso na entrega do produto", &corpus, 2)
            .unwrap();
        assert!((historical_success_rate(&hits) - 0.5).abs() < 1e-12);
        assert_eq!(historical_success_rate(&[]), 0.0);
    }

    #[test]
    fn empty_corpus_returns_nothing() {
        let index = SimilarityIndex::build(&small_corpus());
        let hits = index.find_similar("produto", &[], 5).unwrap();
        assert!(hits.is_empty());
        assert_eq!(historical_success_rate(&hits), 0.0);
    }

    #[test]
    fn validate_checks_matrix_shape() {
        let corpus = small_corpus();
        let index = SimilarityIndex::build(&corpus);
        assert!(index.validate(corpus.len()).is_ok());
        assert!(matches!(
            index.validate(corpus.len() + 1),
            Err(ArtifactError::RowCount { .. })
        ));
        assert!(index.without_matrix().validate(99).is_ok());
    }

    #[test]
    fn validate_rejects_rows_from_another_vocabulary() {
        let corpus = small_corpus();
        let mut index = SimilarityIndex::build(&corpus);
        let foreign = SimilarityIndex::build(&synthetic_corpus(1));
        index.matrix = foreign.matrix.map(|m| m.into_iter().take(corpus.len()).collect());
        assert!(matches!(
            index.validate(corpus.len()),
            Err(ArtifactError::DimensionMismatch { .. })
        ));
    }
}

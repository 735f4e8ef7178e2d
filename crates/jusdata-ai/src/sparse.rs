//! Sparse vectors in coordinate form.
//!
//! Indices are strictly increasing and bounded by the declared dimension.
//! Operations between vectors of different dimension are errors, never
//! silently truncated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SparseError {
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("length mismatch: {indices} indices, {values} values")]
    LengthMismatch { indices: usize, values: usize },

    #[error("index {index} out of bounds for dimension {dim}")]
    IndexOutOfBounds { index: usize, dim: usize },

    #[error("indices not strictly increasing at position {0}")]
    Unsorted(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// The all-zero vector of the given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build from parallel arrays already strictly increasing and below `dim`.
    pub(crate) fn from_sorted(dim: usize, indices: Vec<usize>, values: Vec<f64>) -> Self {
        let vector = Self {
            dim,
            indices,
            values,
        };
        debug_assert!(vector.validate().is_ok());
        vector
    }

    /// Build from `(index, value)` pairs. Pairs are sorted; duplicates are summed.
    pub fn from_pairs(
        dim: usize,
        mut pairs: Vec<(usize, f64)>,
    ) -> Result<Self, SparseError> {
        pairs.sort_by_key(|(i, _)| *i);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            if index >= dim {
                return Err(SparseError::IndexOutOfBounds { index, dim });
            }
            if indices.last() == Some(&index) {
                if let Some(v) = values.last_mut() {
                    *v += value;
                }
            } else {
                indices.push(index);
                values.push(value);
            }
        }

        Ok(Self {
            dim,
            indices,
            values,
        })
    }

    /// Check the structural invariants. Used on deserialized vectors.
    pub fn validate(&self) -> Result<(), SparseError> {
        if self.indices.len() != self.values.len() {
            return Err(SparseError::LengthMismatch {
                indices: self.indices.len(),
                values: self.values.len(),
            });
        }
        for (pos, &index) in self.indices.iter().enumerate() {
            if index >= self.dim {
                return Err(SparseError::IndexOutOfBounds {
                    index,
                    dim: self.dim,
                });
            }
            if pos > 0 && self.indices[pos - 1] >= index {
                return Err(SparseError::Unsorted(pos));
            }
        }
        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// L2-normalize in place. The zero vector is left unchanged.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

    /// Dot product of two sparse vectors (merge over sorted indices).
    pub fn dot(&self, other: &SparseVector) -> Result<f64, SparseError> {
        if self.dim != other.dim {
            return Err(SparseError::DimensionMismatch {
                left: self.dim,
                right: other.dim,
            });
        }

        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        Ok(sum)
    }

    /// Dot product against a dense vector of the same dimension.
    pub fn dot_dense(&self, dense: &[f64]) -> Result<f64, SparseError> {
        if self.dim != dense.len() {
            return Err(SparseError::DimensionMismatch {
                left: self.dim,
                right: dense.len(),
            });
        }
        Ok(self.iter().map(|(i, v)| v * dense[i]).sum())
    }

    /// Cosine similarity. Zero when either vector has zero norm.
    pub fn cosine(&self, other: &SparseVector) -> Result<f64, SparseError> {
        let dot = self.dot(other)?;
        let denom = self.norm() * other.norm();
        if denom > 0.0 {
            Ok(dot / denom)
        } else {
            Ok(0.0)
        }
    }
}

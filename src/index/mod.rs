//! Exact nearest-neighbor search over the movie embedding matrix.
//!
//! Rows are L2-normalized at build time so an inner product against them is a
//! cosine similarity. The index is built offline, persisted, and loaded as
//! read-only shared state; reflecting catalog changes means rebuilding.

use serde::{Deserialize, Serialize};

use crate::catalog::EmbeddingMatrix;

pub mod distance;

use distance::{dot_product, normalize};

/// Errors from querying or validating the similarity index
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("invalid k: {k} (index holds {rows} rows)")]
    InvalidK { k: usize, rows: usize },

    #[error("corrupt index: {rows} rows x {dim} dims but {len} values")]
    Corrupt { rows: usize, dim: usize, len: usize },
}

/// A single nearest-neighbor hit: matrix row and cosine score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub score: f32,
}

/// Exact top-K similarity index under normalized inner product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityIndex {
    rows: usize,
    dim: usize,
    /// Row-major unit-length vectors, `rows * dim` entries.
    data: Vec<f32>,
}

impl SimilarityIndex {
    /// Build the index from an embedding matrix.
    ///
    /// One-time and non-incremental: the normalized rows are frozen here and
    /// row ids stay aligned with the matrix for the index's whole lifetime.
    pub fn build(matrix: &EmbeddingMatrix) -> Self {
        let mut data = matrix.data().to_vec();
        for row in data.chunks_mut(matrix.dim().max(1)) {
            normalize(row);
        }

        SimilarityIndex {
            rows: matrix.rows(),
            dim: matrix.dim(),
            data,
        }
    }

    /// Top-`k` rows by cosine similarity to `query`, highest first.
    ///
    /// `k` must lie in `[1, rows]`. The query is normalized internally, so
    /// scores are true cosine values whatever the input scale. Ties are
    /// broken by ascending row, which pins a total order and makes repeated
    /// queries return identical sequences.
    pub fn query(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if query.len() != self.dim {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim,
                got: query.len(),
            });
        }
        if k == 0 || k > self.rows {
            return Err(IndexError::InvalidK { k, rows: self.rows });
        }

        let mut needle = query.to_vec();
        normalize(&mut needle);

        let mut neighbors: Vec<Neighbor> = self
            .data
            .chunks(self.dim)
            .enumerate()
            .map(|(row, vector)| Neighbor {
                row,
                score: dot_product(&needle, vector),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.row.cmp(&b.row))
        });
        neighbors.truncate(k);

        Ok(neighbors)
    }

    /// Number of indexed rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Vector dimensionality the index was built with.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Integrity check for deserialized artifacts.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.data.len() != self.rows * self.dim {
            return Err(IndexError::Corrupt {
                rows: self.rows,
                dim: self.dim,
                len: self.data.len(),
            });
        }
        Ok(())
    }
}

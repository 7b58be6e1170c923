//! Pairwise cosine similarity over the count vectors.
//!
//! Rows are reduced to `f32` and L2-normalised once, then every pair is a
//! dot product over the non-zero entries. Only the upper triangle is
//! computed; the lower one is mirrored so the matrix is exactly symmetric.
//! A zero row has similarity 0 with everything, itself included.

use crate::vectorizer::VectorMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Square matrix of cosine similarities, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SimilarityParts")]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct SimilarityParts {
    size: usize,
    values: Vec<f32>,
}

impl TryFrom<SimilarityParts> for SimilarityMatrix {
    type Error = String;

    fn try_from(parts: SimilarityParts) -> Result<Self, Self::Error> {
        Self::from_parts(parts.size, parts.values)
    }
}

impl SimilarityMatrix {
    /// Build from raw row-major values; `values` must hold `size * size` entries
    pub fn from_parts(size: usize, values: Vec<f32>) -> Result<Self, String> {
        let expected = size.checked_mul(size).ok_or("matrix size overflows")?;
        if values.len() != expected {
            return Err(format!(
                "expected {} values for a {}x{} matrix, got {}",
                expected,
                size,
                size,
                values.len()
            ));
        }
        Ok(Self { size, values })
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.size + j]
    }
}

type SparseRow = Vec<(usize, f32)>;

/// Unit-length sparse row; empty for a zero vector
fn normalized(counts: &[u32]) -> SparseRow {
    let entries: SparseRow = counts
        .iter()
        .enumerate()
        .filter(|(_, c)| **c > 0)
        .map(|(col, c)| (col, *c as f32))
        .collect();
    let norm = entries.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return Vec::new();
    }
    entries.into_iter().map(|(col, v)| (col, v / norm)).collect()
}

/// Dot product of two sparse rows with ascending column indices
fn sparse_dot(a: &[(usize, f32)], b: &[(usize, f32)]) -> f32 {
    let (mut i, mut j, mut sum) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine;

impl SimilarityEngine {
    pub fn new() -> Self {
        Self
    }

    /// Cosine similarity of every pair of rows
    pub fn compute_similarity(&self, vectors: &VectorMatrix) -> SimilarityMatrix {
        let n = vectors.rows();
        let rows: Vec<SparseRow> = (0..n).map(|i| normalized(vectors.row(i))).collect();

        // Row i holds similarities to rows i..n
        let upper: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (i..n)
                    .map(|j| {
                        if i == j {
                            if rows[i].is_empty() { 0.0 } else { 1.0 }
                        } else {
                            sparse_dot(&rows[i], &rows[j])
                        }
                    })
                    .collect()
            })
            .collect();

        let mut values = vec![0.0f32; n * n];
        for (i, tail) in upper.iter().enumerate() {
            for (offset, &sim) in tail.iter().enumerate() {
                let j = i + offset;
                values[i * n + j] = sim;
                values[j * n + i] = sim;
            }
        }

        debug!("Computed {}x{} similarity matrix", n, n);
        SimilarityMatrix { size: n, values }
    }
}

//! Exact L2 vector index.
//!
//! Rows are append-only: the row number of a vector is the position of the
//! chunk it embeds. The dimension is fixed by the first insert.

use crate::error::{RagError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, Default)]
pub struct FlatL2Index {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub const fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.len() {
            return None;
        }
        let start = row * self.dimension;
        self.data.get(start..start + self.dimension)
    }

    /// Checks a batch against the index dimension without inserting it.
    pub fn check_batch(&self, vectors: &[Vec<f32>]) -> Result<()> {
        let expected = if self.dimension == 0 {
            vectors.first().map_or(0, Vec::len)
        } else {
            self.dimension
        };

        if expected == 0 && !vectors.is_empty() {
            return Err(RagError::Embedding("empty embedding vector".to_string()));
        }

        for v in vectors {
            if v.len() != expected {
                return Err(RagError::EmbeddingDimension {
                    expected,
                    actual: v.len(),
                });
            }
            if !v.iter().all(|x| x.is_finite()) {
                return Err(RagError::Embedding(
                    "embedding contains NaN or infinite values".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Appends a batch, returning the row of its first vector. All or nothing.
    pub fn add_batch(&mut self, vectors: &[Vec<f32>]) -> Result<usize> {
        self.check_batch(vectors)?;
        let first_row = self.len();

        if let Some(first) = vectors.first()
            && self.dimension == 0
        {
            self.dimension = first.len();
        }

        self.data.reserve(vectors.len() * self.dimension);
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(first_row)
    }

    /// The `k` rows nearest to `query`, by ascending L2 distance then row.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(RagError::EmbeddingDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if !query.iter().all(|x| x.is_finite()) {
            return Err(RagError::Embedding(
                "query embedding contains NaN or infinite values".to_string(),
            ));
        }

        let mut neighbors: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(row, v)| Neighbor {
                row,
                distance: euclidean_distance(query, v),
            })
            .collect();

        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.row.cmp(&b.row)));
        neighbors.truncate(k);
        Ok(neighbors)
    }
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt()
}

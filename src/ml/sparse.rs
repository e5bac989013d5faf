//! Sparse feature vectors and row-major matrices.

use serde::{Deserialize, Serialize};

use crate::error::{BhavaError, Result};

/// A sparse vector with strictly increasing indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Create an empty (all-zero) vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vector from `(index, value)` pairs.
    ///
    /// Pairs are sorted by index; duplicate indices are summed and zero
    /// values dropped.
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(index, _)| index);

        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (index, value) in pairs {
            if indices.last() == Some(&index) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(index);
                values.push(value);
            }
        }

        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|&(_, value)| value != 0.0)
            .unzip();
        Self { indices, values }
    }

    /// Non-zero indices, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Values aligned with [`indices`](Self::indices).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Whether every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over `(index, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `index` (zero when absent).
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Dot product with a dense weight vector. Indices past its end count as zero.
    pub fn dot_dense(&self, dense: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(index, value)| dense.get(index).map(|w| w * value))
            .sum()
    }

    /// Add `scale * self` into a dense vector.
    pub fn add_scaled_to(&self, dense: &mut [f64], scale: f64) {
        for (index, value) in self.iter() {
            if let Some(slot) = dense.get_mut(index) {
                *slot += scale * value;
            }
        }
    }

    /// Sum of squared values.
    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Scale to unit Euclidean length. The zero vector stays zero.
    pub fn l2_normalize(&mut self) {
        let norm = self.squared_norm().sqrt();
        if norm > 0.0 {
            for value in &mut self.values {
                *value /= norm;
            }
        }
    }

    /// Concatenate `other` after this vector, shifting its indices by `offset`.
    pub fn concat(&self, other: &SparseVector, offset: usize) -> SparseVector {
        let mut indices = self.indices.clone();
        let mut values = self.values.clone();
        indices.extend(other.indices.iter().map(|index| index + offset));
        values.extend_from_slice(&other.values);
        SparseVector { indices, values }
    }
}

/// A row-major sparse matrix: one [`SparseVector`] per input line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseMatrix {
    rows: Vec<SparseVector>,
    n_cols: usize,
}

impl SparseMatrix {
    /// Create a matrix from rows. Every row index must be below `n_cols`.
    pub fn new(rows: Vec<SparseVector>, n_cols: usize) -> Result<Self> {
        if let Some(max) = rows.iter().filter_map(|row| row.indices.last()).max() {
            if *max >= n_cols {
                return Err(BhavaError::dimension_mismatch(
                    "sparse matrix columns",
                    n_cols,
                    max + 1,
                ));
            }
        }
        Ok(Self { rows, n_cols })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// All rows.
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Row `i`.
    pub fn row(&self, i: usize) -> &SparseVector {
        &self.rows[i]
    }

    /// Smallest stored value, if any.
    pub fn min_value(&self) -> Option<f64> {
        self.rows
            .iter()
            .flat_map(|row| row.values.iter().copied())
            .reduce(f64::min)
    }

    /// Horizontally concatenate `left` and `right`: every output row holds the
    /// left row's columns first, then the right row's columns.
    pub fn hstack(left: &SparseMatrix, right: &SparseMatrix) -> Result<SparseMatrix> {
        if left.n_rows() != right.n_rows() {
            return Err(BhavaError::dimension_mismatch(
                "hstack row count",
                left.n_rows(),
                right.n_rows(),
            ));
        }

        let rows = left
            .rows
            .iter()
            .zip(&right.rows)
            .map(|(l, r)| l.concat(r, left.n_cols))
            .collect();
        Ok(SparseMatrix {
            rows,
            n_cols: left.n_cols + right.n_cols,
        })
    }
}

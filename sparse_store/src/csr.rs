//! Compressed sparse row matrix.
//!
//! Read-optimized storage: row pointers plus parallel column/value arrays,
//! columns sorted within each row. Zero values are never stored - a lookup
//! that misses the stored columns is a contextual zero, not an entry.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SparseError};
use crate::lil::LilMatrix;

/// A sparse matrix in compressed sparse row format.
///
/// Construction sorts entries by `(row, col)` and sums duplicates in input
/// order, so building the same triplet stream twice yields identical
/// matrices bit for bit.
///
/// # Example
///
/// ```
/// use sparse_store::CsrMatrix;
///
/// let m = CsrMatrix::from_triplets(2, 3, vec![(0, 2, 1.5), (1, 0, 2.0), (0, 2, 0.5)]).unwrap();
/// assert_eq!(m.nnz(), 2);
/// assert_eq!(m.get(0, 2), 2.0);
/// assert_eq!(m.get(0, 1), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    /// Row pointers, length `rows + 1`.
    indptr: Vec<usize>,
    /// Column indices, sorted within each row.
    indices: Vec<u32>,
    /// Stored values, parallel to `indices`.
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Create an empty matrix with the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            indptr: vec![0; rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build from `(row, col, value)` triplets.
    ///
    /// Duplicate coordinates are summed in input order; zero results are
    /// dropped. Returns `EntryOutOfBounds` if any triplet falls outside the
    /// shape.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        mut triplets: Vec<(usize, usize, f64)>,
    ) -> Result<Self> {
        for &(r, c, _) in &triplets {
            if r >= rows || c >= cols {
                return Err(SparseError::EntryOutOfBounds {
                    row: r,
                    col: c,
                    rows,
                    cols,
                });
            }
        }

        // Stable sort keeps duplicate coordinates in input order, so the
        // summation order below is deterministic.
        triplets.sort_by_key(|&(r, c, _)| (r, c));

        let mut merged: Vec<(usize, u32, f64)> = Vec::with_capacity(triplets.len());
        for (r, c, v) in triplets {
            match merged.last_mut() {
                Some(entry) if entry.0 == r && entry.1 == c as u32 => entry.2 += v,
                _ => merged.push((r, c as u32, v)),
            }
        }
        // Zero doesn't exist - duplicate sums that cancel are not stored.
        merged.retain(|&(_, _, v)| v != 0.0);

        let mut indptr = vec![0usize; rows + 1];
        let mut indices = Vec::with_capacity(merged.len());
        let mut data = Vec::with_capacity(merged.len());
        for (r, c, v) in merged {
            indptr[r + 1] += 1;
            indices.push(c);
            data.push(v);
        }
        for r in 0..rows {
            indptr[r + 1] += indptr[r];
        }

        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// Matrix shape as `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored (non-zero) entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Value at `(row, col)`, zero if not stored.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols, "index out of bounds");

        let lo = self.indptr[row];
        let hi = self.indptr[row + 1];
        match self.indices[lo..hi].binary_search(&(col as u32)) {
            Ok(i) => self.data[lo + i],
            Err(_) => 0.0,
        }
    }

    /// Column indices and values of one row.
    pub fn row(&self, row: usize) -> (&[u32], &[f64]) {
        debug_assert!(row < self.rows, "row out of bounds");
        let lo = self.indptr[row];
        let hi = self.indptr[row + 1];
        (&self.indices[lo..hi], &self.data[lo..hi])
    }

    /// Iterate over stored entries as `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.rows).flat_map(move |r| {
            let lo = self.indptr[r];
            let hi = self.indptr[r + 1];
            self.indices[lo..hi]
                .iter()
                .zip(&self.data[lo..hi])
                .map(move |(&c, &v)| (r, c as usize, v))
        })
    }

    /// Realize as a dense row-major matrix.
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        let mut dense = vec![vec![0.0; self.cols]; self.rows];
        for (r, c, v) in self.iter() {
            dense[r][c] = v;
        }
        dense
    }

    /// Convert to adjacency-list storage for mutation.
    pub fn to_lil(&self) -> LilMatrix {
        let mut lil = LilMatrix::new(self.rows, self.cols);
        for r in 0..self.rows {
            let (cols, vals) = self.row(r);
            lil.set_row_sorted(r, cols.iter().copied().zip(vals.iter().copied()).collect());
        }
        lil
    }

    /// Return a copy with node `node`'s row and column cleared.
    ///
    /// All other entries are carried over unchanged.
    pub fn remove_node(&self, node: usize) -> Result<Self> {
        if node >= self.rows || node >= self.cols {
            return Err(SparseError::NodeOutOfBounds {
                node,
                rows: self.rows,
                cols: self.cols,
            });
        }

        let triplets: Vec<(usize, usize, f64)> = self
            .iter()
            .filter(|&(r, c, _)| r != node && c != node)
            .collect();
        Self::from_triplets(self.rows, self.cols, triplets)
    }

    /// In-place node removal is not supported on compressed storage.
    ///
    /// Always returns `CompressedMutation`; convert with [`Self::to_lil`]
    /// and use [`LilMatrix::remove_node_in_place`] instead.
    pub fn remove_node_in_place(&mut self, _node: usize) -> Result<()> {
        Err(SparseError::CompressedMutation)
    }
}

//! Adjacency-list sparse matrix.
//!
//! Row-wise list-of-lists storage: one sorted `(col, value)` vector per row.
//! This is the mutation-friendly format - row and column surgery is cheap,
//! at the cost of slower bulk reads than compressed storage.

use serde::{Deserialize, Serialize};

use crate::csr::CsrMatrix;
use crate::error::{Result, SparseError};

/// A sparse matrix stored as per-row adjacency lists.
///
/// The only format in this crate that supports in-place node removal;
/// compressed matrices must convert through [`CsrMatrix::to_lil`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LilMatrix {
    rows: usize,
    cols: usize,
    /// Per-row `(col, value)` entries, sorted by column, zeros never stored.
    data: Vec<Vec<(u32, f64)>>,
}

impl LilMatrix {
    /// Create an empty matrix with the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![Vec::new(); rows],
        }
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
    pub fn nnz(&self) -> usize {
        self.data.iter().map(Vec::len).sum()
    }

    /// Value at `(row, col)`, zero if not stored.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols, "index out of bounds");

        match self.data[row].binary_search_by_key(&(col as u32), |&(c, _)| c) {
            Ok(i) => self.data[row][i].1,
            Err(_) => 0.0,
        }
    }

    /// Set the value at `(row, col)`.
    ///
    /// Setting zero removes the entry - zero is absence, not a value.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows && col < self.cols, "index out of bounds");

        let entries = &mut self.data[row];
        match entries.binary_search_by_key(&(col as u32), |&(c, _)| c) {
            Ok(i) => {
                if value == 0.0 {
                    entries.remove(i);
                } else {
                    entries[i].1 = value;
                }
            },
            Err(i) => {
                if value != 0.0 {
                    entries.insert(i, (col as u32, value));
                }
            },
        }
    }

    /// Stored entries of one row, sorted by column.
    pub fn row(&self, row: usize) -> &[(u32, f64)] {
        debug_assert!(row < self.rows, "row out of bounds");
        &self.data[row]
    }

    /// Replace a row wholesale with already-sorted, zero-free entries.
    ///
    /// Internal fast path for format conversion.
    pub(crate) fn set_row_sorted(&mut self, row: usize, entries: Vec<(u32, f64)>) {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        self.data[row] = entries;
    }

    /// Convert to compressed storage for reads.
    pub fn to_csr(&self) -> CsrMatrix {
        let triplets: Vec<(usize, usize, f64)> = self
            .data
            .iter()
            .enumerate()
            .flat_map(|(r, entries)| entries.iter().map(move |&(c, v)| (r, c as usize, v)))
            .collect();
        // Entries are in-bounds and sorted by construction.
        CsrMatrix::from_triplets(self.rows, self.cols, triplets)
            .unwrap_or_else(|_| CsrMatrix::new(self.rows, self.cols))
    }

    /// Return a copy with node `node`'s row and column cleared.
    pub fn remove_node(&self, node: usize) -> Result<Self> {
        let mut copy = self.clone();
        copy.remove_node_in_place(node)?;
        Ok(copy)
    }

    /// Clear node `node`'s incident entries, mutating this matrix.
    ///
    /// Removes the node's row and every reference to it as a column target.
    /// All other adjacency relationships are left untouched.
    pub fn remove_node_in_place(&mut self, node: usize) -> Result<()> {
        if node >= self.rows || node >= self.cols {
            return Err(SparseError::NodeOutOfBounds {
                node,
                rows: self.rows,
                cols: self.cols,
            });
        }

        self.data[node].clear();
        let target = node as u32;
        for entries in &mut self.data {
            if let Ok(i) = entries.binary_search_by_key(&target, |&(c, _)| c) {
                entries.remove(i);
            }
        }
        Ok(())
    }
}

//! Error types for the sparse matrix substrate.

use thiserror::Error;

/// Error type for sparse matrix operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SparseError {
    /// In-place mutation was requested on compressed storage.
    #[error("in-place mutation unsupported for compressed storage: convert with to_lil() first")]
    CompressedMutation,

    /// Node index exceeds the matrix shape.
    #[error("node {node} out of bounds for {rows}x{cols} matrix")]
    NodeOutOfBounds {
        node: usize,
        rows: usize,
        cols: usize,
    },

    /// A stored entry's coordinates exceed the matrix shape.
    #[error("entry ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    EntryOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// Result type alias for sparse matrix operations.
pub type Result<T> = std::result::Result<T, SparseError>;

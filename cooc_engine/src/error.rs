//! Error types for the co-occurrence engine.

use thiserror::Error;

use crate::token::TokenKind;

/// Error type for vocabulary and co-occurrence operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoocError {
    /// Invalid parameter or parameter combination.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The corpus mixes token types.
    #[error("mixed token types in corpus: {first} and {second}")]
    MixedTokenTypes { first: TokenKind, second: TokenKind },

    /// Pruning thresholds eliminated every token.
    #[error("pruning removed all {candidates} distinct tokens: loosen the frequency thresholds")]
    EmptyVocabulary { candidates: usize },

    /// A caller-supplied dictionary is not a proper index assignment.
    #[error("invalid token dictionary: {0}")]
    InvalidDictionary(String),

    /// `transform` was called before a successful `fit`.
    #[error("transform called before fit")]
    NotFitted,

    /// Error from the sparse matrix substrate.
    #[error("sparse storage error: {0}")]
    Sparse(String),
}

impl From<sparse_store::SparseError> for CoocError {
    fn from(e: sparse_store::SparseError) -> Self {
        Self::Sparse(e.to_string())
    }
}

/// Result type alias for co-occurrence operations.
pub type Result<T> = std::result::Result<T, CoocError>;

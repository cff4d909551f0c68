// SPDX-License-Identifier: MIT OR Apache-2.0
//! Gram Engine - document-term feature extraction
//!
//! This crate provides the peripheral vectorizers around the co-occurrence
//! core: bag-of-n-gram and skip-gram document-term counting over token
//! sequences, equal-mass histogram vectorization of numeric sequences, and a
//! sequential-difference transform. Each vectorizer learns its feature
//! labels on `fit`, then counts new corpora against them on `transform`,
//! ignoring features it never learned.
//!
//! # Quick Start
//!
//! ```
//! use cooc_engine::Token;
//! use gram_engine::NgramVectorizer;
//!
//! let corpus: Vec<Vec<Token>> = vec![
//!     vec![Token::from("to"), Token::from("be"), Token::from("or")],
//!     vec![Token::from("not"), Token::from("to"), Token::from("be")],
//! ];
//!
//! let vectorizer = NgramVectorizer::new(2);
//! let matrix = vectorizer.fit_transform(&corpus).unwrap();
//! assert_eq!(matrix.rows(), 2);
//! ```

#![allow(clippy::cast_precision_loss)] // counts fit in f64 mantissa for any realistic corpus
#![allow(clippy::missing_errors_doc)] // Error conditions are self-evident from Result types
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]
#![warn(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;

use cooc_engine::{find_bin_boundaries, ngrams_of, vocabulary, BinBoundaries, Token};
use parking_lot::RwLock;
use sparse_store::CsrMatrix;
use thiserror::Error;
use tracing::{debug, instrument};

/// Error type for document-term vectorization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GramError {
    /// Invalid parameter or parameter combination.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `transform` was called before a successful `fit`.
    #[error("transform called before fit")]
    NotFitted,

    /// Error from the vocabulary scan (for example mixed token types).
    #[error("vocabulary error: {0}")]
    Vocabulary(String),

    /// Error from the sparse matrix substrate.
    #[error("sparse storage error: {0}")]
    Sparse(String),
}

impl From<cooc_engine::CoocError> for GramError {
    fn from(e: cooc_engine::CoocError) -> Self {
        Self::Vocabulary(e.to_string())
    }
}

impl From<sparse_store::SparseError> for GramError {
    fn from(e: sparse_store::SparseError) -> Self {
        Self::Sparse(e.to_string())
    }
}

/// Result type alias for document-term vectorization.
pub type Result<T> = std::result::Result<T, GramError>;

/// Learned n-gram labels with dense column indices.
#[derive(Debug, Clone)]
struct GramFit<L> {
    index: HashMap<L, usize>,
    len: usize,
}

impl<L: std::hash::Hash + Eq + Ord + Clone> GramFit<L> {
    /// Assign column indices to distinct labels in sorted order, so the
    /// assignment depends only on the label set, never on document order.
    fn from_labels(labels: Vec<L>) -> Self {
        let mut labels = labels;
        labels.sort();
        labels.dedup();
        let len = labels.len();
        let index = labels.into_iter().enumerate().map(|(i, l)| (l, i)).collect();
        Self { index, len }
    }
}

/// Count documents against learned labels; one row per document, unseen
/// labels ignored, empty documents all-zero.
fn count_rows<L: std::hash::Hash + Eq>(
    fit: &GramFit<L>,
    rows: usize,
    labelled: impl Iterator<Item = (usize, L)>,
) -> Result<CsrMatrix> {
    let mut triplets: Vec<(usize, usize, f64)> = Vec::new();
    for (row, label) in labelled {
        if let Some(&col) = fit.index.get(&label) {
            triplets.push((row, col, 1.0));
        }
    }
    Ok(CsrMatrix::from_triplets(rows, fit.len, triplets)?)
}

/// Bag-of-n-grams document vectorizer.
///
/// `fit` learns the distinct contiguous n-grams of the corpus as columns;
/// `transform` counts each document's n-grams against them. Consumes the
/// core's [`ngrams_of`] utility and vocabulary scan.
#[derive(Debug)]
pub struct NgramVectorizer {
    ngram_size: usize,
    fitted: RwLock<Option<Arc<GramFit<Vec<Token>>>>>,
}

impl NgramVectorizer {
    /// Create a vectorizer over contiguous n-grams of the given size.
    pub fn new(ngram_size: usize) -> Self {
        Self {
            ngram_size,
            fitted: RwLock::new(None),
        }
    }

    /// Learn the n-gram label set of a corpus.
    #[instrument(skip(self, corpus), fields(documents = corpus.len()))]
    pub fn fit(&self, corpus: &[Vec<Token>]) -> Result<()> {
        if self.ngram_size == 0 {
            return Err(GramError::InvalidConfig(
                "ngram_size must be positive".into(),
            ));
        }
        vocabulary::scan_corpus(corpus)?;

        let labels: Vec<Vec<Token>> = corpus
            .iter()
            .flat_map(|doc| ngrams_of(doc, self.ngram_size).map(<[Token]>::to_vec))
            .collect();
        let fit = GramFit::from_labels(labels);
        debug!(columns = fit.len, "ngram fit complete");
        *self.fitted.write() = Some(Arc::new(fit));
        Ok(())
    }

    /// Count each document's learned n-grams.
    pub fn transform(&self, corpus: &[Vec<Token>]) -> Result<CsrMatrix> {
        let fit = self.fitted.read().clone().ok_or(GramError::NotFitted)?;
        count_rows(
            &fit,
            corpus.len(),
            corpus.iter().enumerate().flat_map(|(row, doc)| {
                ngrams_of(doc, self.ngram_size).map(move |g| (row, g.to_vec()))
            }),
        )
    }

    /// Fit on a corpus and count it in one call.
    pub fn fit_transform(&self, corpus: &[Vec<Token>]) -> Result<CsrMatrix> {
        self.fit(corpus)?;
        self.transform(corpus)
    }
}

/// Skip-gram document vectorizer.
///
/// A skip-gram is an ordered pair `(s[i], s[i + 1 + skip])` with `skip` up
/// to `max_skip`, so `max_skip = 0` degenerates to contiguous bigrams.
#[derive(Debug)]
pub struct SkipgramVectorizer {
    max_skip: usize,
    fitted: RwLock<Option<Arc<GramFit<(Token, Token)>>>>,
}

impl SkipgramVectorizer {
    /// Create a vectorizer counting pairs up to `max_skip` skipped tokens.
    pub fn new(max_skip: usize) -> Self {
        Self {
            max_skip,
            fitted: RwLock::new(None),
        }
    }

    fn pairs<'a>(
        &self,
        doc: &'a [Token],
    ) -> impl Iterator<Item = (Token, Token)> + 'a {
        let max_skip = self.max_skip;
        doc.iter().enumerate().flat_map(move |(i, first)| {
            doc[i + 1..]
                .iter()
                .take(max_skip + 1)
                .map(move |second| (first.clone(), second.clone()))
        })
    }

    /// Learn the skip-gram label set of a corpus.
    #[instrument(skip(self, corpus), fields(documents = corpus.len()))]
    pub fn fit(&self, corpus: &[Vec<Token>]) -> Result<()> {
        vocabulary::scan_corpus(corpus)?;

        let labels: Vec<(Token, Token)> =
            corpus.iter().flat_map(|doc| self.pairs(doc)).collect();
        let fit = GramFit::from_labels(labels);
        debug!(columns = fit.len, "skipgram fit complete");
        *self.fitted.write() = Some(Arc::new(fit));
        Ok(())
    }

    /// Count each document's learned skip-grams.
    pub fn transform(&self, corpus: &[Vec<Token>]) -> Result<CsrMatrix> {
        let fit = self.fitted.read().clone().ok_or(GramError::NotFitted)?;
        count_rows(
            &fit,
            corpus.len(),
            corpus
                .iter()
                .enumerate()
                .flat_map(|(row, doc)| self.pairs(doc).map(move |p| (row, p))),
        )
    }

    /// Fit on a corpus and count it in one call.
    pub fn fit_transform(&self, corpus: &[Vec<Token>]) -> Result<CsrMatrix> {
        self.fit(corpus)?;
        self.transform(corpus)
    }
}

/// Equal-mass histogram vectorizer for numeric sequences.
///
/// `fit` pools every sequence and learns quantile bin boundaries through the
/// core's [`find_bin_boundaries`]; `transform` counts each sequence's values
/// into those bins, clamping out-of-range values into the end bins. A
/// near-zero-variance pool produces a degenerate (single-bin) fit and a
/// warning, not an error.
#[derive(Debug)]
pub struct HistogramVectorizer {
    n_components: usize,
    fitted: RwLock<Option<Arc<BinBoundaries>>>,
}

impl HistogramVectorizer {
    /// Create a vectorizer producing `n_components` bins per sequence.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            fitted: RwLock::new(None),
        }
    }

    /// Learn bin boundaries from the pooled sample.
    #[instrument(skip(self, sequences), fields(sequences = sequences.len()))]
    pub fn fit(&self, sequences: &[Vec<f64>]) -> Result<()> {
        if self.n_components == 0 {
            return Err(GramError::InvalidConfig(
                "n_components must be positive".into(),
            ));
        }
        let pooled: Vec<f64> = sequences.iter().flatten().copied().collect();
        let boundaries = find_bin_boundaries(&pooled, self.n_components);
        debug!(degenerate = boundaries.degenerate, "histogram fit complete");
        *self.fitted.write() = Some(Arc::new(boundaries));
        Ok(())
    }

    /// The learned boundaries, if fitted.
    pub fn boundaries(&self) -> Option<Arc<BinBoundaries>> {
        self.fitted.read().clone()
    }

    /// Histogram each sequence against the learned bins.
    ///
    /// Rows are dense `n_components`-length histograms; with a degenerate
    /// fit every value lands in bin zero.
    pub fn transform(&self, sequences: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let boundaries = self.fitted.read().clone().ok_or(GramError::NotFitted)?;
        Ok(sequences
            .iter()
            .map(|sequence| {
                let mut histogram = vec![0.0; self.n_components];
                for &value in sequence {
                    histogram[boundaries.bin_index(value).min(self.n_components - 1)] += 1.0;
                }
                histogram
            })
            .collect())
    }

    /// Fit on sequences and histogram them in one call.
    pub fn fit_transform(&self, sequences: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.fit(sequences)?;
        self.transform(sequences)
    }
}

/// First differences of numeric sequences.
///
/// Stateless: `fit` learns nothing and exists for interface parity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialDifferenceTransformer;

impl SequentialDifferenceTransformer {
    /// Create the transformer.
    pub fn new() -> Self {
        Self
    }

    /// No-op; the transform has no learned state.
    pub fn fit(&self, _sequences: &[Vec<f64>]) -> Result<()> {
        Ok(())
    }

    /// Difference each sequence: output `i` is `input[i + 1] - input[i]`.
    ///
    /// A sequence of length `n` maps to `n - 1` differences (empty for
    /// lengths 0 and 1).
    pub fn transform(&self, sequences: &[Vec<f64>]) -> Vec<Vec<f64>> {
        sequences
            .iter()
            .map(|sequence| sequence.windows(2).map(|w| w[1] - w[0]).collect())
            .collect()
    }

    /// Transform in one call; identical to [`Self::transform`].
    pub fn fit_transform(&self, sequences: &[Vec<f64>]) -> Vec<Vec<f64>> {
        self.transform(sequences)
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0
//! Co-occurrence Engine - windowed, kernel-weighted token co-occurrence.
//!
//! This crate turns a corpus of token sequences into a sparse token-by-context
//! matrix. A fit pass learns a vocabulary (or accepts a fixed one), prunes it
//! by frequency, slides a weighted window over every sequence, and records the
//! result as an immutable fitted snapshot; transform passes replay new corpora
//! against that snapshot, silently ignoring tokens it never learned.
//!
//! # Guarantees
//!
//! - **Row-order independence**: row and column dictionaries depend only on
//!   the set of tokens and contexts observed, never on sequence order.
//! - **Fit/transform determinism**: transforming the fit corpus reproduces
//!   the fit matrix exactly, and parallel accumulation matches sequential
//!   accumulation bit for bit.
//! - **No partial state**: a failed fit leaves any previous fit untouched.
//!
//! # Example
//!
//! ```
//! use cooc_engine::{CooccurrenceConfig, CooccurrenceEngine, Token, WindowOrientation};
//!
//! let corpus: Vec<Vec<Token>> = vec![
//!     vec![Token::from(1), Token::from(2), Token::from(1)],
//!     vec![Token::from(2), Token::from(1)],
//! ];
//!
//! let engine = CooccurrenceEngine::with_config(
//!     CooccurrenceConfig::new()
//!         .window_radius(1)
//!         .window_orientation(WindowOrientation::After),
//! );
//! let matrix = engine.fit_transform(&corpus).unwrap();
//!
//! // Rows and columns follow sorted token order: row 0 is token 1.
//! assert_eq!(matrix.get(0, 1), 1.0); // 1 followed by 2, once
//! assert_eq!(matrix.get(1, 0), 2.0); // 2 followed by 1, twice
//! ```

#![allow(clippy::cast_possible_truncation)] // u32 row/column ids are ample for vocabulary-sized matrices
#![allow(clippy::needless_pass_by_value)] // config/dictionary ownership is intentional for API design
#![allow(clippy::missing_errors_doc)] // Error conditions are self-evident from Result types
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sparse_store::CsrMatrix;
use tracing::{debug, instrument};

mod binning;
mod config;
mod error;
pub mod kernels;
#[cfg(feature = "metrics")]
pub mod metrics;
mod ngrams;
mod token;
pub mod vocabulary;

#[cfg(test)]
mod tests;

pub use binning::{find_bin_boundaries, BinBoundaries};
pub use config::{CooccurrenceConfig, WindowFunction, WindowOrientation, WindowSide};
pub use error::{CoocError, Result};
pub use ngrams::ngrams_of;
pub use token::{Token, TokenKind};
pub use vocabulary::{CorpusStats, TokenDictionary};

/// A matrix column label: which context token, on which side of the focal
/// token. Direction is part of the label, so before- and after-contexts of
/// the same token occupy distinct columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnLabel {
    /// The context token.
    pub token: Token,
    /// Side of the focal token the context appeared on.
    pub side: WindowSide,
}

impl fmt::Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.side, self.token)
    }
}

/// Mapping from column labels to dense column indices.
///
/// Labels are ordered by context token, then `Before` before `After` - a
/// rule that depends only on the set of labels observed during fit, so two
/// fits over row-permuted corpora agree on every column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDictionary {
    labels: Vec<ColumnLabel>,
    index: HashMap<ColumnLabel, usize>,
}

impl ColumnDictionary {
    fn from_labels(labels: Vec<ColumnLabel>) -> Self {
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Self { labels, index }
    }

    /// Column index of a label, if it was observed during fit.
    pub fn get(&self, label: &ColumnLabel) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Label at a column index.
    pub fn label(&self, index: usize) -> &ColumnLabel {
        &self.labels[index]
    }

    /// All labels in column order.
    pub fn labels(&self) -> &[ColumnLabel] {
        &self.labels
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether no columns were observed.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Accumulation cell key: row index, context index, side.
type CellKey = (u32, u32, WindowSide);

/// Resolved per-contribution weighting.
enum WeightScheme {
    /// Weight by distance from the focal token: `weights[distance - 1]`.
    Positional(Vec<f64>),
    /// Weight by the context token's surprise: `surprise[context]`.
    Surprise(Vec<f64>),
}

impl WeightScheme {
    #[inline]
    fn weight(&self, distance: usize, context: usize) -> f64 {
        match self {
            Self::Positional(weights) => weights[distance - 1],
            Self::Surprise(surprise) => surprise[context],
        }
    }
}

/// Per-distance weights for the fixed kernels, near edge first.
fn positional_weights(config: &CooccurrenceConfig) -> Vec<f64> {
    let offsets: Vec<i64> = (1..=config.window_radius as i64).collect();
    let scale = config.window_radius as f64;
    match config.window_function {
        WindowFunction::FixedFlat => kernels::flat_kernel(&offsets, scale),
        WindowFunction::FixedHarmonic => kernels::harmonic_kernel(&offsets, scale),
        WindowFunction::FixedTriangle => kernels::triangle_kernel(&offsets, scale),
        WindowFunction::Information => Vec::new(),
    }
}

/// Walk one sequence, accumulating weighted co-occurrence cells.
///
/// Tokens absent from the dictionary are dropped before windowing, so
/// offsets count retained tokens only - a sequence containing unknown
/// tokens accumulates exactly like the same sequence with them removed.
/// Offsets falling outside the (filtered) sequence are skipped; there is no
/// wraparound or padding.
fn walk_sequence(
    sequence: &[Token],
    dictionary: &TokenDictionary,
    config: &CooccurrenceConfig,
    scheme: &WeightScheme,
) -> HashMap<CellKey, f64> {
    let indexed: Vec<u32> = sequence
        .iter()
        .filter_map(|t| dictionary.get(t).map(|i| i as u32))
        .collect();

    let mut cells = HashMap::new();
    let radius = config.window_radius;
    let before = matches!(
        config.window_orientation,
        WindowOrientation::Before | WindowOrientation::Symmetric
    );
    let after = matches!(
        config.window_orientation,
        WindowOrientation::After | WindowOrientation::Symmetric
    );

    for (i, &row) in indexed.iter().enumerate() {
        if before {
            for distance in 1..=radius.min(i) {
                let context = indexed[i - distance];
                let w = scheme.weight(distance, context as usize);
                *cells
                    .entry((row, context, WindowSide::Before))
                    .or_insert(0.0) += w;
            }
        }
        if after {
            for distance in 1..=radius.min(indexed.len() - 1 - i) {
                let context = indexed[i + distance];
                let w = scheme.weight(distance, context as usize);
                *cells
                    .entry((row, context, WindowSide::After))
                    .or_insert(0.0) += w;
            }
        }
    }
    cells
}

/// Accumulate a whole corpus into co-occurrence cells.
///
/// Every sequence produces an independent partial map; partials are merged
/// in corpus order, so the parallel and sequential paths sum each cell in
/// the same order and agree bit for bit.
fn accumulate(
    corpus: &[Vec<Token>],
    dictionary: &TokenDictionary,
    config: &CooccurrenceConfig,
    surprise: &[f64],
) -> HashMap<CellKey, f64> {
    let scheme = match config.window_function {
        WindowFunction::Information => WeightScheme::Surprise(surprise.to_vec()),
        _ => WeightScheme::Positional(positional_weights(config)),
    };

    let partials: Vec<HashMap<CellKey, f64>> = if corpus.len() >= config.parallel_threshold {
        corpus
            .par_iter()
            .map(|sequence| walk_sequence(sequence, dictionary, config, &scheme))
            .collect()
    } else {
        corpus
            .iter()
            .map(|sequence| walk_sequence(sequence, dictionary, config, &scheme))
            .collect()
    };

    let mut cells = HashMap::new();
    for partial in partials {
        for (key, value) in partial {
            *cells.entry(key).or_insert(0.0) += value;
        }
    }
    cells
}

/// The immutable result of a successful fit.
///
/// Holds the resolved dictionaries, the fit-corpus frequency table, and the
/// matrix accumulated during the fit pass. Never mutated; re-fitting an
/// engine produces a fresh snapshot and leaves existing handles intact.
#[derive(Debug, Clone)]
pub struct FittedCooccurrence {
    config: CooccurrenceConfig,
    token_dictionary: TokenDictionary,
    column_dictionary: ColumnDictionary,
    frequencies: Vec<f64>,
    surprise: Vec<f64>,
    column_of: HashMap<(u32, WindowSide), u32>,
    matrix: CsrMatrix,
}

impl FittedCooccurrence {
    /// The token-to-row dictionary resolved during fit.
    pub fn token_dictionary(&self) -> &TokenDictionary {
        &self.token_dictionary
    }

    /// The column label dictionary assembled during fit.
    pub fn column_dictionary(&self) -> &ColumnDictionary {
        &self.column_dictionary
    }

    /// The matrix accumulated during the fit pass.
    pub fn matrix(&self) -> &CsrMatrix {
        &self.matrix
    }

    /// Fit-corpus relative frequency per vocabulary token, in row order.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Build the co-occurrence matrix of a corpus against this fit.
    ///
    /// Tokens and contexts outside the fitted dictionaries contribute
    /// nothing; the output always has the fitted shape. Transforming the
    /// fit corpus reproduces the fit matrix exactly.
    #[instrument(skip(self, corpus))]
    pub fn transform(&self, corpus: &[Vec<Token>]) -> Result<CsrMatrix> {
        let cells = accumulate(corpus, &self.token_dictionary, &self.config, &self.surprise);

        let mut triplets = Vec::with_capacity(cells.len());
        for ((row, context, side), value) in cells {
            if let Some(&col) = self.column_of.get(&(context, side)) {
                triplets.push((row as usize, col as usize, value));
            }
        }
        let matrix = CsrMatrix::from_triplets(
            self.token_dictionary.len(),
            self.column_dictionary.len(),
            triplets,
        )?;
        debug!(nnz = matrix.nnz(), "transform complete");
        Ok(matrix)
    }
}

/// Co-occurrence vectorization engine.
///
/// Construct with a [`CooccurrenceConfig`], fit on a corpus, then transform
/// that corpus or new ones. The engine keeps the latest fitted snapshot for
/// the `transform` shortcut; the snapshot itself is immutable and can be
/// held independently of the engine.
#[derive(Debug)]
pub struct CooccurrenceEngine {
    config: CooccurrenceConfig,
    fitted: RwLock<Option<Arc<FittedCooccurrence>>>,
}

impl CooccurrenceEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(CooccurrenceConfig::default())
    }

    /// Create an engine with the given configuration.
    pub fn with_config(config: CooccurrenceConfig) -> Self {
        Self {
            config,
            fitted: RwLock::new(None),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &CooccurrenceConfig {
        &self.config
    }

    /// The latest fitted snapshot, if any.
    pub fn fitted(&self) -> Option<Arc<FittedCooccurrence>> {
        self.fitted.read().clone()
    }

    /// Learn dictionaries and accumulate the co-occurrence matrix.
    ///
    /// Validates the configuration and corpus, resolves the row dictionary
    /// (learned and pruned, or fixed and taken verbatim), accumulates one
    /// weighted window pass, and assembles the column dictionary from the
    /// distinct contexts observed. The snapshot is swapped in only after
    /// every step succeeds; on error the previous fit remains in place.
    #[instrument(skip(self, corpus), fields(sequences = corpus.len()))]
    pub fn fit(&self, corpus: &[Vec<Token>]) -> Result<Arc<FittedCooccurrence>> {
        self.config.validate()?;
        let stats = vocabulary::scan_corpus(corpus)?;

        let token_dictionary = match &self.config.token_dictionary {
            Some(fixed) => TokenDictionary::from_fixed(fixed.clone())?,
            None => {
                let retained = vocabulary::prune(
                    &stats,
                    self.config.min_occurrences,
                    self.config.min_frequency,
                    self.config.max_frequency,
                )?;
                TokenDictionary::from_tokens(retained)
            },
        };

        let frequencies: Vec<f64> = token_dictionary
            .tokens()
            .iter()
            .map(|t| stats.frequency(t))
            .collect();
        let surprise: Vec<f64> = frequencies.iter().map(|&p| kernels::surprise(p)).collect();

        let cells = accumulate(corpus, &token_dictionary, &self.config, &surprise);

        // Column assignment depends only on the set of observed contexts:
        // sort by context index (token order for learned dictionaries, the
        // caller's authoritative order for fixed ones), then side.
        let mut observed: Vec<(u32, WindowSide)> =
            cells.keys().map(|&(_, context, side)| (context, side)).collect();
        observed.sort_unstable();
        observed.dedup();

        let labels: Vec<ColumnLabel> = observed
            .iter()
            .map(|&(context, side)| ColumnLabel {
                token: token_dictionary.token(context as usize).clone(),
                side,
            })
            .collect();
        let column_of: HashMap<(u32, WindowSide), u32> = observed
            .iter()
            .enumerate()
            .map(|(i, &key)| (key, i as u32))
            .collect();
        let column_dictionary = ColumnDictionary::from_labels(labels);

        let triplets: Vec<(usize, usize, f64)> = cells
            .iter()
            .map(|(&(row, context, side), &value)| {
                (
                    row as usize,
                    column_of[&(context, side)] as usize,
                    value,
                )
            })
            .collect();
        let matrix = CsrMatrix::from_triplets(
            token_dictionary.len(),
            column_dictionary.len(),
            triplets,
        )?;

        debug!(
            vocabulary = token_dictionary.len(),
            columns = column_dictionary.len(),
            nnz = matrix.nnz(),
            "fit complete"
        );

        let fitted = Arc::new(FittedCooccurrence {
            config: self.config.clone(),
            token_dictionary,
            column_dictionary,
            frequencies,
            surprise,
            column_of,
            matrix,
        });
        *self.fitted.write() = Some(Arc::clone(&fitted));
        Ok(fitted)
    }

    /// Fit and return the matrix accumulated during that same pass.
    pub fn fit_transform(&self, corpus: &[Vec<Token>]) -> Result<CsrMatrix> {
        let fitted = self.fit(corpus)?;
        Ok(fitted.matrix().clone())
    }

    /// Transform a corpus against the latest fit.
    ///
    /// Returns `NotFitted` if `fit` has not succeeded yet.
    pub fn transform(&self, corpus: &[Vec<Token>]) -> Result<CsrMatrix> {
        let fitted = self.fitted().ok_or(CoocError::NotFitted)?;
        fitted.transform(corpus)
    }
}

impl Default for CooccurrenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

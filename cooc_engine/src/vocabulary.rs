//! Vocabulary construction and pruning.
//!
//! One corpus scan collects token counts and enforces type homogeneity;
//! learned dictionaries assign dense indices in sorted token order so the
//! assignment depends only on the set of retained tokens, never on the
//! order sequences were presented in.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoocError, Result};
use crate::token::{Token, TokenKind};

/// Token occurrence statistics from one corpus scan.
#[derive(Debug, Clone, Default)]
pub struct CorpusStats {
    /// Occurrence count per distinct token.
    pub counts: HashMap<Token, usize>,
    /// Total token occurrences across the corpus.
    pub total: usize,
}

impl CorpusStats {
    /// Relative frequency of a token, zero if unseen.
    pub fn frequency(&self, token: &Token) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.counts.get(token).map_or(0.0, |&c| c as f64 / self.total as f64)
    }
}

/// Scan a corpus once, collecting counts and checking type homogeneity.
///
/// Fails with `MixedTokenTypes` on the first token whose kind differs from
/// the kind already observed, before any further processing.
pub fn scan_corpus(corpus: &[Vec<Token>]) -> Result<CorpusStats> {
    let mut kind: Option<TokenKind> = None;
    let mut stats = CorpusStats::default();

    for sequence in corpus {
        for token in sequence {
            match kind {
                None => kind = Some(token.kind()),
                Some(k) if k != token.kind() => {
                    return Err(CoocError::MixedTokenTypes {
                        first: k,
                        second: token.kind(),
                    });
                },
                Some(_) => {},
            }
            *stats.counts.entry(token.clone()).or_insert(0) += 1;
            stats.total += 1;
        }
    }

    debug!(
        distinct = stats.counts.len(),
        total = stats.total,
        "corpus scan complete"
    );
    Ok(stats)
}

/// Tokens surviving the pruning thresholds, in sorted order.
///
/// Removes tokens with fewer than `min_occurrences` absolute occurrences or
/// with relative frequency outside `[min_frequency, max_frequency]`. An
/// emptied vocabulary is a configuration error, not a valid empty result.
pub fn prune(
    stats: &CorpusStats,
    min_occurrences: Option<usize>,
    min_frequency: Option<f64>,
    max_frequency: Option<f64>,
) -> Result<Vec<Token>> {
    let total = stats.total.max(1) as f64;
    let mut retained: Vec<Token> = stats
        .counts
        .iter()
        .filter(|&(_, &count)| {
            let frequency = count as f64 / total;
            min_occurrences.map_or(true, |min| count >= min)
                && min_frequency.map_or(true, |min| frequency >= min)
                && max_frequency.map_or(true, |max| frequency <= max)
        })
        .map(|(token, _)| token.clone())
        .collect();

    if retained.is_empty() {
        return Err(CoocError::EmptyVocabulary {
            candidates: stats.counts.len(),
        });
    }

    retained.sort();
    Ok(retained)
}

/// One-to-one mapping from tokens to dense row indices `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDictionary {
    index: HashMap<Token, usize>,
    tokens: Vec<Token>,
}

impl TokenDictionary {
    /// Build from a set of tokens, assigning indices in sorted order.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        tokens.sort();
        tokens.dedup();
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { index, tokens }
    }

    /// Accept a caller-supplied mapping as authoritative.
    ///
    /// Validates that the indices are exactly `0..len` with no duplicates;
    /// the mapping is then used verbatim, with no pruning applied.
    pub fn from_fixed(mapping: HashMap<Token, usize>) -> Result<Self> {
        let n = mapping.len();
        let mut tokens: Vec<Option<Token>> = vec![None; n];
        for (token, &i) in &mapping {
            if i >= n {
                return Err(CoocError::InvalidDictionary(format!(
                    "index {i} out of range for {n} tokens"
                )));
            }
            if tokens[i].is_some() {
                return Err(CoocError::InvalidDictionary(format!(
                    "duplicate index {i}"
                )));
            }
            tokens[i] = Some(token.clone());
        }
        // n distinct in-range indices over n slots: every slot is filled.
        let tokens: Vec<Token> = tokens.into_iter().flatten().collect();
        debug_assert_eq!(tokens.len(), n);
        Ok(Self {
            index: mapping,
            tokens,
        })
    }

    /// Row index of a token, if present.
    #[inline]
    pub fn get(&self, token: &Token) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Token at a row index.
    pub fn token(&self, index: usize) -> &Token {
        &self.tokens[index]
    }

    /// All tokens in index order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

//! Configuration for the co-occurrence engine.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoocError, Result};
use crate::token::Token;

/// Which side(s) of the focal token the window covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowOrientation {
    /// Offsets `-radius..=-1` only.
    Before,
    /// Offsets `1..=radius` only.
    After,
    /// Both sides, with before/after contexts kept as distinct columns.
    Symmetric,
}

impl fmt::Display for WindowOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
            Self::Symmetric => write!(f, "symmetric"),
        }
    }
}

impl FromStr for WindowOrientation {
    type Err = CoocError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "symmetric" => Ok(Self::Symmetric),
            other => Err(CoocError::InvalidConfig(format!(
                "unknown window orientation '{other}' (expected before, after, or symmetric)"
            ))),
        }
    }
}

/// Which side of the focal token a context was observed on.
///
/// Part of every column label; direction is never collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WindowSide {
    Before,
    After,
}

impl fmt::Display for WindowSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => write!(f, "pre"),
            Self::After => write!(f, "post"),
        }
    }
}

/// Weighting applied across window positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowFunction {
    /// Uniform counting.
    FixedFlat,
    /// Harmonic decay, `1 / (i + 1)`.
    FixedHarmonic,
    /// Linear decay, `radius - i`.
    FixedTriangle,
    /// Per-token surprise under the fit corpus frequencies.
    Information,
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedFlat => write!(f, "fixed-flat"),
            Self::FixedHarmonic => write!(f, "fixed-harmonic"),
            Self::FixedTriangle => write!(f, "fixed-triangle"),
            Self::Information => write!(f, "information"),
        }
    }
}

impl FromStr for WindowFunction {
    type Err = CoocError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fixed-flat" => Ok(Self::FixedFlat),
            "fixed-harmonic" => Ok(Self::FixedHarmonic),
            "fixed-triangle" => Ok(Self::FixedTriangle),
            "information" => Ok(Self::Information),
            other => Err(CoocError::InvalidConfig(format!(
                "unknown window function '{other}' (expected fixed-flat, fixed-harmonic, \
                 fixed-triangle, or information)"
            ))),
        }
    }
}

/// Configuration for `CooccurrenceEngine` fit behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct CooccurrenceConfig {
    /// Window radius in tokens; must be positive.
    pub window_radius: usize,
    /// Window orientation.
    pub window_orientation: WindowOrientation,
    /// Window weighting function.
    pub window_function: WindowFunction,
    /// Caller-fixed token dictionary; learned from the corpus when absent.
    pub token_dictionary: Option<HashMap<Token, usize>>,
    /// Minimum absolute occurrence count for a token to be retained.
    pub min_occurrences: Option<usize>,
    /// Minimum relative frequency, in `[0, 1]`.
    pub min_frequency: Option<f64>,
    /// Maximum relative frequency, in `[0, 1]`.
    pub max_frequency: Option<f64>,
    /// Corpus size at which accumulation fans out across threads.
    pub parallel_threshold: usize,
}

impl Default for CooccurrenceConfig {
    fn default() -> Self {
        Self {
            window_radius: 5,
            window_orientation: WindowOrientation::Symmetric,
            window_function: WindowFunction::FixedFlat,
            token_dictionary: None,
            min_occurrences: None,
            min_frequency: None,
            max_frequency: None,
            parallel_threshold: 128,
        }
    }
}

impl CooccurrenceConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn window_radius(mut self, radius: usize) -> Self {
        self.window_radius = radius;
        self
    }

    #[must_use]
    pub const fn window_orientation(mut self, orientation: WindowOrientation) -> Self {
        self.window_orientation = orientation;
        self
    }

    #[must_use]
    pub const fn window_function(mut self, function: WindowFunction) -> Self {
        self.window_function = function;
        self
    }

    #[must_use]
    pub fn token_dictionary(mut self, dictionary: HashMap<Token, usize>) -> Self {
        self.token_dictionary = Some(dictionary);
        self
    }

    #[must_use]
    pub const fn min_occurrences(mut self, count: usize) -> Self {
        self.min_occurrences = Some(count);
        self
    }

    #[must_use]
    pub const fn min_frequency(mut self, frequency: f64) -> Self {
        self.min_frequency = Some(frequency);
        self
    }

    #[must_use]
    pub const fn max_frequency(mut self, frequency: f64) -> Self {
        self.max_frequency = Some(frequency);
        self
    }

    #[must_use]
    pub const fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Check parameter ranges; surfaced at fit time.
    pub fn validate(&self) -> Result<()> {
        if self.window_radius == 0 {
            return Err(CoocError::InvalidConfig(
                "window_radius must be positive".into(),
            ));
        }
        for (name, value) in [
            ("min_frequency", self.min_frequency),
            ("max_frequency", self.max_frequency),
        ] {
            if let Some(f) = value {
                if !(0.0..=1.0).contains(&f) {
                    return Err(CoocError::InvalidConfig(format!(
                        "{name} must lie in [0, 1], got {f}"
                    )));
                }
            }
        }
        if let (Some(lo), Some(hi)) = (self.min_frequency, self.max_frequency) {
            if lo > hi {
                return Err(CoocError::InvalidConfig(format!(
                    "min_frequency {lo} exceeds max_frequency {hi}"
                )));
            }
        }
        Ok(())
    }
}

//! Histogram bin boundary computation.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Bin edges computed from a 1-D sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinBoundaries {
    /// Edge values. `bins + 1` entries in the normal case, a single entry
    /// (or none for an empty sample) in the degenerate case.
    pub edges: Vec<f64>,
    /// True when the sample had fewer than two distinct values and the
    /// edges are a degenerate best-effort result.
    pub degenerate: bool,
}

impl BinBoundaries {
    /// Number of bins these edges delimit.
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Bin index for a value, clamping out-of-range values into the end
    /// bins. Always 0 for degenerate boundaries.
    pub fn bin_index(&self, value: f64) -> usize {
        if self.edges.len() < 2 {
            return 0;
        }
        let bins = self.edges.len() - 1;
        let below_or_at = self.edges.partition_point(|&e| e <= value);
        below_or_at.saturating_sub(1).min(bins - 1)
    }
}

/// Compute `bins + 1` quantile edges partitioning `sample`'s range.
///
/// Edges are equal-mass quantiles of the sorted sample, so the first edge is
/// the minimum and the last the maximum. A sample with fewer than two
/// distinct values cannot be partitioned; the result is flagged degenerate
/// and a warning is logged, but this is never an error - it means the data
/// has almost no variance, and callers should carry on.
pub fn find_bin_boundaries(sample: &[f64], bins: usize) -> BinBoundaries {
    debug_assert!(bins >= 1, "bin count must be at least 1");

    let mut sorted: Vec<f64> = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let distinct = {
        let mut n = usize::from(!sorted.is_empty());
        for w in sorted.windows(2) {
            if w[0] != w[1] {
                n += 1;
            }
        }
        n
    };

    if distinct < 2 {
        warn!(
            sample_len = sample.len(),
            distinct, "degenerate binning: sample has almost no variance"
        );
        let edges = sorted.first().map(|&v| vec![v]).unwrap_or_default();
        return BinBoundaries {
            edges,
            degenerate: true,
        };
    }

    let n = sorted.len();
    let bins = bins.max(1);
    let edges = (0..=bins)
        .map(|j| {
            let pos = (j as f64 / bins as f64) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let frac = pos - lo as f64;
            if lo + 1 < n {
                sorted[lo] * (1.0 - frac) + sorted[lo + 1] * frac
            } else {
                sorted[n - 1]
            }
        })
        .collect();

    BinBoundaries {
        edges,
        degenerate: false,
    }
}

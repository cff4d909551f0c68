//! Window kernels - per-offset weights for co-occurrence windows.
//!
//! Each kernel maps an ordered sequence of relative offsets (position 0 is
//! the window's near edge) and a scale parameter to one non-negative weight
//! per offset. All kernels are pure: same inputs, same output, output length
//! equals input length.

/// Uniform counting: every position weighs 1.0.
pub fn flat_kernel(offsets: &[i64], _scale: f64) -> Vec<f64> {
    vec![1.0; offsets.len()]
}

/// Harmonic decay: position `i` weighs `1 / (i + 1)`.
///
/// Independent of the scale parameter; the nearest context always weighs 1.
pub fn harmonic_kernel(offsets: &[i64], _scale: f64) -> Vec<f64> {
    (0..offsets.len()).map(|i| 1.0 / (i + 1) as f64).collect()
}

/// Linear decay: position `i` weighs `scale - i`.
///
/// Caller must ensure `scale >= offsets.len()`, otherwise weights at the far
/// edge go non-positive. This precondition is not checked at runtime.
pub fn triangle_kernel(offsets: &[i64], scale: f64) -> Vec<f64> {
    (0..offsets.len()).map(|i| scale - i as f64).collect()
}

/// Surprise of a token with relative frequency `p`, in bits.
///
/// Zero for `p` outside `(0, 1]`, so absent or degenerate frequencies never
/// produce negative weights.
pub fn surprise(p: f64) -> f64 {
    if p > 0.0 && p <= 1.0 {
        -p.log2()
    } else {
        0.0
    }
}

/// Information weighting: one weight per context token, equal to that
/// token's surprise under the supplied corpus frequencies.
///
/// Unlike the positional kernels this depends on *which* token occupies each
/// window slot, so callers pass the per-slot frequencies rather than
/// offsets. Locally informative (rare) tokens weigh more than frequent ones.
pub fn information_kernel(context_frequencies: &[f64], _scale: f64) -> Vec<f64> {
    context_frequencies.iter().map(|&p| surprise(p)).collect()
}

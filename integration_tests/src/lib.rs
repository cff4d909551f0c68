//! Shared fixtures for cross-crate integration tests.

use cooc_engine::Token;

/// Integer token sequences used across the integration suite.
///
/// Six sequences over the tokens 1..=4; with `window_radius = 1`,
/// orientation `after` and the flat kernel, token 1 is followed by token 3
/// exactly 8 times and token 2 by token 1 exactly 6 times.
pub fn token_data() -> Vec<Vec<Token>> {
    [
        &[1, 3, 1, 4, 2][..],
        &[2, 1, 2, 3, 4, 1, 2, 1, 3, 2, 4],
        &[4, 1, 1, 3, 2, 4, 2],
        &[1, 2, 2, 1, 2, 1, 3, 4, 3, 2, 4],
        &[3, 4, 2, 1, 3, 1, 4, 4, 1, 3, 2],
        &[2, 1, 3, 1, 4, 4, 1, 4, 1, 3, 2, 4],
    ]
    .iter()
    .map(|s| s.iter().map(|&v| Token::from(v)).collect())
    .collect()
}

/// Occurrence count of each token 1..=4 in [`token_data`], in token order.
pub const TOKEN_DATA_COUNTS: [usize; 4] = [17, 15, 11, 14];

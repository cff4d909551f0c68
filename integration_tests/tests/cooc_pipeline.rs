//! End-to-end scenarios across the vectorization crates.

use cooc_engine::{
    CooccurrenceConfig, CooccurrenceEngine, Token, WindowOrientation,
};
use gram_engine::NgramVectorizer;
use integration_tests::{token_data, TOKEN_DATA_COUNTS};
use sparse_store::SparseError;

fn after_radius_one() -> CooccurrenceConfig {
    CooccurrenceConfig::new()
        .window_radius(1)
        .window_orientation(WindowOrientation::After)
}

#[test]
fn adjacency_graph_node_removal_round_trip() {
    // With every token observed as a follower, the after-oriented count
    // matrix is a square token-adjacency graph.
    let engine = CooccurrenceEngine::with_config(after_radius_one());
    let graph = engine.fit_transform(&token_data()).unwrap();
    assert_eq!(graph.shape(), (4, 4));

    let node = 1;

    // Copying removal works directly on the compressed matrix.
    let pruned = graph.remove_node(node).unwrap();

    // In-place removal on the compressed format is a format error, not a
    // silent fallback.
    let mut compressed = graph.clone();
    assert_eq!(
        compressed.remove_node_in_place(node),
        Err(SparseError::CompressedMutation)
    );

    // Convert to the adjacency-list format, mutate, and convert back: the
    // two paths agree exactly.
    let mut lil = graph.to_lil();
    lil.remove_node_in_place(node).unwrap();
    assert_eq!(lil.to_csr(), pruned);

    // No surviving edge references the removed node in either direction,
    // and every other edge carries its original weight.
    for (row, col, value) in pruned.iter() {
        assert_ne!(row, node);
        assert_ne!(col, node);
        assert_eq!(value, graph.get(row, col));
    }
    assert_eq!(
        graph.iter().filter(|&(r, c, _)| r != node && c != node).count(),
        pruned.nnz()
    );
}

#[test]
fn unigram_counts_agree_with_cooccurrence_frequencies() {
    let corpus = token_data();

    // Both engines assign rows/columns in sorted token order, so column j
    // of the unigram matrix counts the same token as row j of the
    // co-occurrence vocabulary.
    let unigrams = NgramVectorizer::new(1);
    let counts = unigrams.fit_transform(&corpus).unwrap();

    let engine = CooccurrenceEngine::with_config(after_radius_one());
    let fitted = engine.fit(&corpus).unwrap();
    assert_eq!(counts.cols(), fitted.token_dictionary().len());

    let total: usize = TOKEN_DATA_COUNTS.iter().sum();
    for (j, &expected) in TOKEN_DATA_COUNTS.iter().enumerate() {
        let column_sum: f64 = (0..counts.rows()).map(|i| counts.get(i, j)).sum();
        assert_eq!(column_sum, expected as f64);
        assert_eq!(
            fitted.frequencies()[j],
            expected as f64 / total as f64
        );
    }
}

#[test]
fn transform_of_disjoint_corpus_is_empty_but_shaped() {
    let engine = CooccurrenceEngine::with_config(after_radius_one());
    let fitted = engine.fit(&token_data()).unwrap();

    let disjoint = vec![vec![Token::from(9), Token::from(9), Token::from(8)]];
    let matrix = engine.transform(&disjoint).unwrap();

    assert_eq!(matrix.shape(), fitted.matrix().shape());
    assert_eq!(matrix.nnz(), 0);
}

#[test]
fn fit_transform_round_trip_survives_row_permutation() {
    let corpus = token_data();
    let mut permuted = corpus.clone();
    permuted.reverse();

    let a = CooccurrenceEngine::with_config(after_radius_one());
    let b = CooccurrenceEngine::with_config(after_radius_one());
    a.fit(&corpus).unwrap();
    b.fit(&permuted).unwrap();

    // Either fit transforms either ordering to the same matrix.
    assert_eq!(
        a.transform(&corpus).unwrap(),
        b.transform(&corpus).unwrap()
    );
    assert_eq!(
        a.transform(&permuted).unwrap(),
        b.transform(&permuted).unwrap()
    );
    assert_eq!(
        a.fitted().unwrap().column_dictionary(),
        b.fitted().unwrap().column_dictionary()
    );
}

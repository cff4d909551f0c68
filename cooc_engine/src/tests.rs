use std::collections::HashMap;

use super::*;

fn ints(values: &[i64]) -> Vec<Token> {
    values.iter().map(|&v| Token::from(v)).collect()
}

fn texts(values: &[&str]) -> Vec<Token> {
    values.iter().map(|&v| Token::from(v)).collect()
}

/// Six integer sequences over the tokens 1..=4.
fn token_data() -> Vec<Vec<Token>> {
    vec![
        ints(&[1, 3, 1, 4, 2]),
        ints(&[2, 1, 2, 3, 4, 1, 2, 1, 3, 2, 4]),
        ints(&[4, 1, 1, 3, 2, 4, 2]),
        ints(&[1, 2, 2, 1, 2, 1, 3, 4, 3, 2, 4]),
        ints(&[3, 4, 2, 1, 3, 1, 4, 4, 1, 3, 2]),
        ints(&[2, 1, 3, 1, 4, 4, 1, 4, 1, 3, 2, 4]),
    ]
}

/// Seven text sequences over foo/bar/pok/wer, including an empty document.
fn text_token_data() -> Vec<Vec<Token>> {
    vec![
        texts(&["foo", "pok", "foo", "wer", "bar"]),
        texts(&[]),
        texts(&["bar", "foo", "bar", "pok", "wer", "foo", "bar", "foo", "pok", "bar", "wer"]),
        texts(&["wer", "foo", "foo", "pok", "bar", "wer", "bar"]),
        texts(&["foo", "bar", "bar", "foo", "bar", "foo", "pok", "wer", "pok", "bar", "wer"]),
        texts(&["pok", "wer", "bar", "foo", "pok", "foo", "wer", "wer", "foo", "pok", "bar"]),
        texts(&["bar", "foo", "pok", "foo", "wer", "wer", "foo", "wer", "foo", "pok", "bar", "wer"]),
    ]
}

fn text_token_data_subset() -> Vec<Vec<Token>> {
    vec![texts(&["foo", "pok"]), texts(&["pok", "foo", "foo"])]
}

fn mixed_token_data() -> Vec<Vec<Token>> {
    vec![
        vec![Token::from(1), Token::from("pok"), Token::from(1)],
        vec![Token::from("bar"), Token::from(1), Token::from(3.1415)],
    ]
}

fn after_radius_one() -> CooccurrenceConfig {
    CooccurrenceConfig::new()
        .window_radius(1)
        .window_orientation(WindowOrientation::After)
}

#[test]
fn fit_counts_adjacent_pairs_integer_corpus() {
    let engine = CooccurrenceEngine::with_config(after_radius_one());
    let matrix = engine.fit_transform(&token_data()).unwrap();

    // Rows and columns follow sorted token order: 1, 2, 3, 4.
    assert_eq!(matrix.get(0, 2), 8.0); // 1 followed by 3
    assert_eq!(matrix.get(1, 0), 6.0); // 2 followed by 1
    assert_eq!(matrix.get(0, 0), 1.0); // 1 followed by 1
    assert_eq!(matrix.get(3, 3), 2.0); // 4 followed by 4
}

#[test]
fn fit_counts_adjacent_pairs_text_corpus() {
    let engine = CooccurrenceEngine::with_config(after_radius_one());
    let matrix = engine.fit_transform(&text_token_data()).unwrap();

    // Sorted token order: bar, foo, pok, wer.
    assert_eq!(matrix.get(1, 2), 8.0); // foo followed by pok
    assert_eq!(matrix.get(0, 1), 6.0); // bar followed by foo
}

#[test]
fn transform_reproduces_fit_matrix_exactly() {
    let corpus = token_data();
    let engine = CooccurrenceEngine::new();
    let fit_result = engine.fit_transform(&corpus).unwrap();
    let transform_result = engine.transform(&corpus).unwrap();
    assert_eq!(fit_result, transform_result);

    let engine = CooccurrenceEngine::with_config(after_radius_one());
    let fit_result = engine.fit_transform(&corpus).unwrap();
    let transform_result = engine.transform(&corpus).unwrap();
    assert_eq!(fit_result, transform_result);
}

#[test]
fn transform_reproduces_fit_matrix_with_information_kernel() {
    let corpus = text_token_data();
    let engine = CooccurrenceEngine::with_config(
        CooccurrenceConfig::new().window_function(WindowFunction::Information),
    );
    let fit_result = engine.fit_transform(&corpus).unwrap();
    let transform_result = engine.transform(&corpus).unwrap();
    assert_eq!(fit_result, transform_result);
}

#[test]
fn column_dictionary_is_row_order_independent() {
    let corpus = token_data();
    let mut permuted = corpus.clone();
    permuted.rotate_left(3);
    permuted.reverse();

    let a = CooccurrenceEngine::new().fit(&corpus).unwrap();
    let b = CooccurrenceEngine::new().fit(&permuted).unwrap();

    assert_eq!(a.column_dictionary(), b.column_dictionary());
    assert_eq!(a.token_dictionary(), b.token_dictionary());
    // With the flat kernel the accumulated matrices agree as well.
    assert_eq!(a.matrix(), b.matrix());
}

#[test]
fn transform_ignores_unseen_tokens() {
    let engine = CooccurrenceEngine::new();
    engine.fit(&text_token_data_subset()).unwrap();

    // "zaz" was never fitted; dropping it must not change anything, even
    // mid-sequence where it sits between two known tokens.
    let with_unseen = vec![
        texts(&["foo", "pok"]),
        texts(&["pok", "zaz", "foo", "foo", "zaz"]),
    ];
    let without = vec![texts(&["foo", "pok"]), texts(&["pok", "foo", "foo"])];

    assert_eq!(
        engine.transform(&with_unseen).unwrap(),
        engine.transform(&without).unwrap()
    );
}

#[test]
fn transform_keeps_fitted_shape() {
    let engine = CooccurrenceEngine::new();
    let fitted = engine.fit(&text_token_data_subset()).unwrap();
    let transformed = engine.transform(&text_token_data()).unwrap();

    assert_eq!(transformed.shape(), fitted.matrix().shape());
    assert_eq!(fitted.token_dictionary().len(), 2);
}

#[test]
fn empty_sequences_contribute_nothing() {
    let mut corpus = token_data();
    corpus.insert(2, vec![]);

    let with_empty = CooccurrenceEngine::with_config(after_radius_one())
        .fit_transform(&corpus)
        .unwrap();
    let without_empty = CooccurrenceEngine::with_config(after_radius_one())
        .fit_transform(&token_data())
        .unwrap();
    assert_eq!(with_empty, without_empty);
}

#[test]
fn excessive_pruning_is_configuration_error() {
    let engine =
        CooccurrenceEngine::with_config(CooccurrenceConfig::new().min_frequency(1.0));
    let result = engine.fit_transform(&token_data());
    assert!(matches!(
        result,
        Err(CoocError::EmptyVocabulary { candidates: 4 })
    ));
}

#[test]
fn min_occurrences_prunes_rare_tokens() {
    let corpus = vec![ints(&[1, 2, 1, 2, 9]), ints(&[2, 1, 2, 1])];
    let engine =
        CooccurrenceEngine::with_config(after_radius_one().min_occurrences(2));
    let fitted = engine.fit(&corpus).unwrap();

    // Token 9 occurs once and is gone - as a row and as a context.
    assert_eq!(fitted.token_dictionary().len(), 2);
    assert_eq!(fitted.token_dictionary().get(&Token::from(9)), None);

    let matrix = fitted.matrix();
    assert_eq!(matrix.shape(), (2, 2));
    assert_eq!(matrix.get(0, 1), 3.0); // 1 followed by 2
    assert_eq!(matrix.get(1, 0), 3.0); // 2 followed by 1
}

#[test]
fn max_frequency_prunes_dominant_tokens() {
    // 1 carries half the corpus mass.
    let corpus = vec![ints(&[1, 1, 1, 2, 3, 1]), ints(&[2, 3])];
    let engine = CooccurrenceEngine::with_config(
        CooccurrenceConfig::new().max_frequency(0.4),
    );
    let fitted = engine.fit(&corpus).unwrap();
    assert_eq!(fitted.token_dictionary().get(&Token::from(1)), None);
    assert_eq!(fitted.token_dictionary().len(), 2);
}

#[test]
fn mixed_token_types_rejected_before_accumulation() {
    let engine = CooccurrenceEngine::new();
    let result = engine.fit(&mixed_token_data());
    assert!(matches!(result, Err(CoocError::MixedTokenTypes { .. })));
    // The failed fit left no state behind.
    assert!(engine.fitted().is_none());
}

#[test]
fn failed_fit_preserves_previous_snapshot() {
    let engine = CooccurrenceEngine::with_config(after_radius_one());
    engine.fit(&token_data()).unwrap();

    assert!(engine.fit(&mixed_token_data()).is_err());

    // The earlier fit still answers transforms.
    let matrix = engine.transform(&token_data()).unwrap();
    assert_eq!(matrix.get(0, 2), 8.0);
}

#[test]
fn refit_leaves_existing_snapshots_intact() {
    let engine = CooccurrenceEngine::with_config(after_radius_one());
    let first = engine.fit(&token_data()).unwrap();
    let first_nnz = first.matrix().nnz();

    engine.fit(&text_token_data()).unwrap();

    // The old handle is unchanged; the engine answers with the new fit.
    assert_eq!(first.matrix().nnz(), first_nnz);
    assert_eq!(first.token_dictionary().get(&Token::from(1)), Some(0));
    assert_eq!(
        engine.fitted().unwrap().token_dictionary().get(&Token::from("bar")),
        Some(0)
    );
}

#[test]
fn fixed_dictionary_restricts_rows_and_columns() {
    let mapping: HashMap<Token, usize> = [
        (Token::from(1), 0),
        (Token::from(2), 1),
        (Token::from(3), 2),
    ]
    .into();
    let engine =
        CooccurrenceEngine::with_config(after_radius_one().token_dictionary(mapping));
    let fitted = engine.fit(&token_data()).unwrap();
    let matrix = fitted.matrix();

    assert_eq!(matrix.shape(), (3, 3));
    // Token 4 is invisible: windows slide over the remaining tokens, so a
    // "1 4 3" run counts as 1 followed by 3.
    assert_eq!(matrix.get(0, 2), 8.0); // 1 followed by 3
    assert_eq!(matrix.get(2, 1), 6.0); // 3 followed by 2, includes one pair bridged across a 4
}

#[test]
fn invalid_fixed_dictionary_rejected() {
    // Index 2 with only two entries: not onto 0..2.
    let mapping: HashMap<Token, usize> = [(Token::from(1), 0), (Token::from(2), 2)].into();
    let engine = CooccurrenceEngine::with_config(
        CooccurrenceConfig::new().token_dictionary(mapping),
    );
    assert!(matches!(
        engine.fit(&token_data()),
        Err(CoocError::InvalidDictionary(_))
    ));
}

#[test]
fn zero_radius_rejected_at_fit() {
    let engine = CooccurrenceEngine::with_config(CooccurrenceConfig::new().window_radius(0));
    assert!(matches!(
        engine.fit(&token_data()),
        Err(CoocError::InvalidConfig(_))
    ));
}

#[test]
fn transform_before_fit_is_an_error() {
    let engine = CooccurrenceEngine::new();
    assert!(matches!(
        engine.transform(&token_data()),
        Err(CoocError::NotFitted)
    ));
}

#[test]
fn symmetric_orientation_keeps_directions_distinct() {
    let corpus = vec![ints(&[1, 2])];
    let engine = CooccurrenceEngine::with_config(
        CooccurrenceConfig::new()
            .window_radius(1)
            .window_orientation(WindowOrientation::Symmetric),
    );
    let fitted = engine.fit(&corpus).unwrap();

    let labels = fitted.column_dictionary().labels();
    assert_eq!(labels.len(), 2);
    assert_eq!(
        labels[0],
        ColumnLabel {
            token: Token::from(1),
            side: WindowSide::Before
        }
    );
    assert_eq!(
        labels[1],
        ColumnLabel {
            token: Token::from(2),
            side: WindowSide::After
        }
    );
    assert_eq!(labels[0].to_string(), "pre_1");
    assert_eq!(labels[1].to_string(), "post_2");

    let matrix = fitted.matrix();
    assert_eq!(matrix.get(0, 1), 1.0); // 1 saw 2 after it
    assert_eq!(matrix.get(1, 0), 1.0); // 2 saw 1 before it
}

#[test]
fn before_orientation_mirrors_after() {
    let corpus = token_data();
    let after = CooccurrenceEngine::with_config(after_radius_one())
        .fit_transform(&corpus)
        .unwrap();
    let before = CooccurrenceEngine::with_config(
        CooccurrenceConfig::new()
            .window_radius(1)
            .window_orientation(WindowOrientation::Before),
    )
    .fit_transform(&corpus)
    .unwrap();

    // "u after t" and "t before u" describe the same pair: the matrices are
    // transposes of each other through the shared token order.
    for row in 0..4 {
        for col in 0..4 {
            assert_eq!(after.get(row, col), before.get(col, row));
        }
    }
}

#[test]
fn harmonic_kernel_halves_distance_two_contexts() {
    let corpus = vec![ints(&[1, 2, 3])];
    let engine = CooccurrenceEngine::with_config(
        CooccurrenceConfig::new()
            .window_radius(2)
            .window_orientation(WindowOrientation::After)
            .window_function(WindowFunction::FixedHarmonic),
    );
    let matrix = engine.fit_transform(&corpus).unwrap();

    // Columns observed: (2, After), (3, After).
    assert_eq!(matrix.get(0, 0), 1.0); // 1 -> 2 at distance 1
    assert_eq!(matrix.get(0, 1), 0.5); // 1 -> 3 at distance 2
    assert_eq!(matrix.get(1, 1), 1.0); // 2 -> 3 at distance 1
    assert_eq!(matrix.nnz(), 3);
}

#[test]
fn triangle_kernel_weights_decay_from_radius() {
    let corpus = vec![ints(&[1, 2, 3])];
    let engine = CooccurrenceEngine::with_config(
        CooccurrenceConfig::new()
            .window_radius(2)
            .window_orientation(WindowOrientation::After)
            .window_function(WindowFunction::FixedTriangle),
    );
    let matrix = engine.fit_transform(&corpus).unwrap();

    assert_eq!(matrix.get(0, 0), 2.0);
    assert_eq!(matrix.get(0, 1), 1.0);
    assert_eq!(matrix.get(1, 1), 2.0);
}

#[test]
fn information_kernel_weights_by_context_surprise() {
    // Token 1 appears 4/6, token 2 appears 2/6.
    let corpus = vec![ints(&[1, 2]), ints(&[1, 2]), ints(&[1, 1])];
    let engine = CooccurrenceEngine::with_config(
        after_radius_one().window_function(WindowFunction::Information),
    );
    let fitted = engine.fit(&corpus).unwrap();
    let matrix = fitted.matrix();

    let surprise_1 = -(4.0f64 / 6.0).log2();
    let surprise_2 = -(2.0f64 / 6.0).log2();

    // Columns: (1, After), (2, After).
    assert!((matrix.get(0, 1) - 2.0 * surprise_2).abs() < 1e-12);
    assert!((matrix.get(0, 0) - surprise_1).abs() < 1e-12);
    assert_eq!(fitted.frequencies(), &[4.0 / 6.0, 2.0 / 6.0]);
}

#[test]
fn information_kernel_reuses_fit_frequencies_on_transform() {
    let fit_corpus = vec![ints(&[1, 2]), ints(&[1, 2]), ints(&[1, 1])];
    let engine = CooccurrenceEngine::with_config(
        after_radius_one().window_function(WindowFunction::Information),
    );
    engine.fit(&fit_corpus).unwrap();

    // A transform corpus with very different frequencies still weighs
    // contexts by the fit-corpus surprise table.
    let transform_corpus = vec![ints(&[1, 2])];
    let matrix = engine.transform(&transform_corpus).unwrap();
    let surprise_2 = -(2.0f64 / 6.0).log2();
    assert!((matrix.get(0, 1) - surprise_2).abs() < 1e-12);
}

#[test]
fn parallel_accumulation_matches_sequential() {
    let corpus = text_token_data();

    for function in [
        WindowFunction::FixedFlat,
        WindowFunction::FixedHarmonic,
        WindowFunction::Information,
    ] {
        let sequential = CooccurrenceEngine::with_config(
            CooccurrenceConfig::new()
                .window_function(function)
                .parallel_threshold(usize::MAX),
        );
        let parallel = CooccurrenceEngine::with_config(
            CooccurrenceConfig::new()
                .window_function(function)
                .parallel_threshold(1),
        );
        assert_eq!(
            sequential.fit_transform(&corpus).unwrap(),
            parallel.fit_transform(&corpus).unwrap(),
            "sequential and parallel accumulation diverged for {function}"
        );
    }
}

#[test]
fn single_token_sequences_produce_no_columns() {
    let corpus = vec![ints(&[5]), ints(&[7])];
    let engine = CooccurrenceEngine::with_config(after_radius_one());
    let fitted = engine.fit(&corpus).unwrap();

    assert_eq!(fitted.token_dictionary().len(), 2);
    assert!(fitted.column_dictionary().is_empty());
    assert_eq!(fitted.matrix().shape(), (2, 0));
    assert_eq!(fitted.matrix().nnz(), 0);
}

#[test]
fn orientation_and_function_names_parse_from_config_strings() {
    // The string forms accepted at the API boundary.
    assert!("before".parse::<WindowOrientation>().is_ok());
    assert!("after".parse::<WindowOrientation>().is_ok());
    assert!("symmetric".parse::<WindowOrientation>().is_ok());
    assert!(matches!(
        "bidirectional".parse::<WindowOrientation>(),
        Err(CoocError::InvalidConfig(_))
    ));

    assert!("fixed-flat".parse::<WindowFunction>().is_ok());
    assert!("information".parse::<WindowFunction>().is_ok());
    assert!(matches!(
        "flat".parse::<WindowFunction>(),
        Err(CoocError::InvalidConfig(_))
    ));
}

#[test]
fn column_lookup_round_trips() {
    let engine = CooccurrenceEngine::with_config(after_radius_one());
    let fitted = engine.fit(&token_data()).unwrap();
    let columns = fitted.column_dictionary();

    for (i, label) in columns.labels().iter().enumerate() {
        assert_eq!(columns.get(label), Some(i));
        assert_eq!(columns.label(i), label);
    }
    let absent = ColumnLabel {
        token: Token::from(99),
        side: WindowSide::After,
    };
    assert_eq!(columns.get(&absent), None);
}

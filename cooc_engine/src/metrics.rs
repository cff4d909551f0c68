// SPDX-License-Identifier: MIT OR Apache-2.0
//! OpenTelemetry metrics for the co-occurrence engine.
//!
//! This module provides metrics instrumentation for fit and transform
//! operations. Enable the `metrics` feature to use this functionality.

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter, Unit},
    KeyValue,
};

/// Metrics collector for co-occurrence operations.
pub struct CoocMetrics {
    /// Counter for fit/transform calls.
    vectorize_ops: Counter<u64>,
    /// Histogram for fit latency in seconds.
    fit_latency: Histogram<f64>,
    /// Histogram for output matrix density (stored entries).
    matrix_nnz: Histogram<u64>,
    /// Counter for tokens pruned during fit.
    pruned_tokens: Counter<u64>,
}

impl CoocMetrics {
    /// Creates a new metrics collector using the global meter provider.
    #[must_use]
    pub fn new() -> Self {
        let meter = global::meter("cooc_engine");
        Self::with_meter(&meter)
    }

    /// Creates a new metrics collector with a specific meter.
    #[must_use]
    pub fn with_meter(meter: &Meter) -> Self {
        let vectorize_ops = meter
            .u64_counter("cooc_engine.vectorize_operations")
            .with_description("Total number of fit/transform operations")
            .init();

        let fit_latency = meter
            .f64_histogram("cooc_engine.fit_latency")
            .with_description("Fit latency in seconds")
            .with_unit(Unit::new("s"))
            .init();

        let matrix_nnz = meter
            .u64_histogram("cooc_engine.matrix_nnz")
            .with_description("Stored entries in produced matrices")
            .init();

        let pruned_tokens = meter
            .u64_counter("cooc_engine.pruned_tokens")
            .with_description("Tokens removed by frequency pruning")
            .init();

        Self {
            vectorize_ops,
            fit_latency,
            matrix_nnz,
            pruned_tokens,
        }
    }

    /// Records a fit or transform call.
    pub fn record_op(&self, op: &str) {
        self.vectorize_ops
            .add(1, &[KeyValue::new("op", op.to_string())]);
    }

    /// Records fit latency.
    pub fn record_fit_latency(&self, latency_secs: f64) {
        self.fit_latency.record(latency_secs, &[]);
    }

    /// Records the density of a produced matrix.
    pub fn record_matrix_nnz(&self, nnz: u64, op: &str) {
        self.matrix_nnz
            .record(nnz, &[KeyValue::new("op", op.to_string())]);
    }

    /// Records tokens removed by pruning.
    pub fn record_pruned(&self, count: u64) {
        self.pruned_tokens.add(count, &[]);
    }
}

impl Default for CoocMetrics {
    fn default() -> Self {
        Self::new()
    }
}

//! Prometheus metrics for the prediction service

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::sync::OnceLock;

/// Histogram buckets for inference latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    requests_total: IntCounterVec,
    upstream_failures_total: IntCounter,
    synthetic_responses_total: IntCounter,
    inference_latency_seconds: Histogram,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            requests_total: register_int_counter_vec!(
                "gridcast_requests_total",
                "API requests handled, by endpoint",
                &["endpoint"]
            )
            .expect("Failed to register requests_total"),

            upstream_failures_total: register_int_counter!(
                "gridcast_upstream_failures_total",
                "Failed fetches from the timing provider"
            )
            .expect("Failed to register upstream_failures_total"),

            synthetic_responses_total: register_int_counter!(
                "gridcast_synthetic_responses_total",
                "Responses served from synthetic stand-in data"
            )
            .expect("Failed to register synthetic_responses_total"),

            inference_latency_seconds: register_histogram!(
                "gridcast_inference_latency_seconds",
                "Time spent running regressor inference per request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register inference_latency_seconds"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn inc_requests(&self, endpoint: &str) {
        self.inner()
            .requests_total
            .with_label_values(&[endpoint])
            .inc();
    }

    pub fn inc_upstream_failures(&self) {
        self.inner().upstream_failures_total.inc();
    }

    pub fn inc_synthetic_responses(&self) {
        self.inner().synthetic_responses_total.inc();
    }

    pub fn observe_inference_latency(&self, duration_secs: f64) {
        self.inner().inference_latency_seconds.observe(duration_secs);
    }
}

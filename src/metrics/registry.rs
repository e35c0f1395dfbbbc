// Prometheus metrics registry and collectors
// Author: kelexine (https://github.com/kelexine)

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_gauge_vec_with_registry,
    register_histogram_vec_with_registry, CounterVec, Encoder, GaugeVec, HistogramVec, Opts,
    Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // GENERATION METRICS
    // ============================================================================

    /// Generation jobs by kind and outcome
    pub static ref GENERATION_JOBS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("generation_jobs_total", "Total generation jobs"),
        &["kind", "outcome"], // kind: text, image; outcome: completed, cached, error
        REGISTRY
    ).unwrap();

    /// Tokens streamed back from the provider
    pub static ref STREAMED_TOKENS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("streamed_tokens_total", "Total streamed completion tokens"),
        &["model"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // PROVIDER METRICS
    // ============================================================================

    /// Total provider API calls
    pub static ref PROVIDER_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("provider_calls_total", "Total provider API calls"),
        &["endpoint", "status"], // endpoint: chat, image; status: ok, error
        REGISTRY
    ).unwrap();

    /// Provider call duration
    pub static ref PROVIDER_CALL_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        prometheus::HistogramOpts::new("provider_call_duration_seconds", "Provider call duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["endpoint"],
        REGISTRY
    ).unwrap();

    // ============================================================================
    // CACHE METRICS
    // ============================================================================

    /// Cache operations
    pub static ref CACHE_OPERATIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("cache_operations_total", "Total cache operations"),
        &["operation"], // operation: hit, miss, store
        REGISTRY
    ).unwrap();

    /// Current cache entries
    pub static ref CACHE_ENTRIES: GaugeVec = register_gauge_vec_with_registry!(
        Opts::new("cache_entries_current", "Current number of cache entries"),
        &["type"], // type: active
        REGISTRY
    ).unwrap();

    // ============================================================================
    // SESSION METRICS
    // ============================================================================

    /// WebSocket session events
    pub static ref SESSIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("sessions_total", "Total WebSocket session events"),
        &["status"], // status: opened, closed
        REGISTRY
    ).unwrap();

    /// Progress events delivered to sessions
    pub static ref EVENTS_SENT: CounterVec = register_counter_vec_with_registry!(
        Opts::new("events_sent_total", "Total progress events delivered"),
        &["event_type"], // event_type: progress, image_progress, connection_status
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}


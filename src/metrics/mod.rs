// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics, CACHE_ENTRIES, CACHE_OPERATIONS, EVENTS_SENT, GENERATION_JOBS,
    PROVIDER_CALLS, PROVIDER_CALL_DURATION, SESSIONS, STREAMED_TOKENS,
};

/// Helper to record a finished generation job
pub fn record_generation(kind: &str, outcome: &str) {
    GENERATION_JOBS.with_label_values(&[kind, outcome]).inc();
}

/// Helper to record streamed tokens for a model
pub fn record_streamed_tokens(model: &str, count: u64) {
    if count > 0 {
        STREAMED_TOKENS
            .with_label_values(&[model])
            .inc_by(count as f64);
    }
}

/// Helper to record provider API call metrics
pub fn record_provider_call(endpoint: &str, success: bool, duration_secs: f64) {
    let status = if success { "ok" } else { "error" };
    PROVIDER_CALLS.with_label_values(&[endpoint, status]).inc();

    PROVIDER_CALL_DURATION
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Helpers to record cache operations
pub fn record_cache_hit() {
    CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
}

pub fn record_cache_miss() {
    CACHE_OPERATIONS.with_label_values(&["miss"]).inc();
}

pub fn record_cache_store() {
    CACHE_OPERATIONS.with_label_values(&["store"]).inc();
}

pub fn update_cache_entries(count: usize) {
    CACHE_ENTRIES.with_label_values(&["active"]).set(count as f64);
}

/// Helpers to record session lifecycle events
pub fn record_session_opened() {
    SESSIONS.with_label_values(&["opened"]).inc();
}

pub fn record_session_closed() {
    SESSIONS.with_label_values(&["closed"]).inc();
}

/// Helper to record delivered events
pub fn record_event_sent(event_type: &str) {
    EVENTS_SENT.with_label_values(&[event_type]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Touch one label set per family so gather emits them all
        record_generation("text", "completed");
        record_streamed_tokens("gpt-4o", 3);
        record_provider_call("chat", true, 0.5);
        record_cache_hit();
        update_cache_entries(1);
        record_session_opened();
        record_event_sent("progress");

        let metrics = gather_metrics();
        assert!(metrics.contains("generation_jobs_total"));
        assert!(metrics.contains("provider_calls_total"));
        assert!(metrics.contains("cache_operations_total"));
        assert!(metrics.contains("sessions_total"));
        assert!(metrics.contains("events_sent_total"));
    }
}

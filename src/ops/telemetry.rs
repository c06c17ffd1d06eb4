// * Telemetry - JSON Logging and Prometheus Metrics
// * Structured logs go through tracing; counters live in the default prometheus registry

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram, CounterVec, Encoder, Histogram, TextEncoder,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    // * Final decisions by label
    pub static ref CLASSIFICATIONS_TOTAL: CounterVec = register_counter_vec!(
        "phishnet_classifications_total",
        "Total number of classified URLs by label",
        &["label"]
    ).unwrap();

    // * Individual page fetch attempts by outcome (success, timeout, error)
    pub static ref FETCH_ATTEMPTS_TOTAL: CounterVec = register_counter_vec!(
        "phishnet_fetch_attempts_total",
        "Total number of page fetch attempts by outcome",
        &["outcome"]
    ).unwrap();

    // * Rank lookups by outcome (success, failure)
    pub static ref RANK_LOOKUPS_TOTAL: CounterVec = register_counter_vec!(
        "phishnet_rank_lookups_total",
        "Total number of traffic rank lookups by outcome",
        &["outcome"]
    ).unwrap();

    // * Wall time of a whole fetch, retries included
    pub static ref FETCH_DURATION_SECONDS: Histogram = register_histogram!(
        "phishnet_fetch_duration_seconds",
        "Page fetch duration in seconds, retries included",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0]
    ).unwrap();
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use phishnet::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(url = "https://example.com", "Classifying URL");
/// ```
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initializes tracing with custom log level. `RUST_LOG` still wins when set.
pub fn init_tracing_with_level(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}

/// Initializes tracing with pretty formatting (for development)
pub fn init_tracing_pretty(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .init();
}

/// Returns the current metrics in the Prometheus text format
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_classification(label: &str) {
    CLASSIFICATIONS_TOTAL.with_label_values(&[label]).inc();
}

pub fn record_fetch_attempt(outcome: &str) {
    FETCH_ATTEMPTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_rank_lookup(outcome: &str) {
    RANK_LOOKUPS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn observe_fetch_duration(seconds: f64) {
    FETCH_DURATION_SECONDS.observe(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_classification() {
        let before = CLASSIFICATIONS_TOTAL.with_label_values(&["phishing"]).get();
        record_classification("phishing");
        let after = CLASSIFICATIONS_TOTAL.with_label_values(&["phishing"]).get();
        // * Other tests may run concurrently, so only monotonicity is checked
        assert!(after >= before + 1.0);
    }

    #[test]
    fn test_record_fetch_attempt() {
        record_fetch_attempt("timeout");
        assert!(FETCH_ATTEMPTS_TOTAL.with_label_values(&["timeout"]).get() >= 1.0);
    }

    #[test]
    fn test_record_rank_lookup() {
        record_rank_lookup("failure");
        assert!(RANK_LOOKUPS_TOTAL.with_label_values(&["failure"]).get() >= 1.0);
    }

    #[test]
    fn test_fetch_duration_histogram() {
        observe_fetch_duration(0.2);
        assert!(FETCH_DURATION_SECONDS.get_sample_count() >= 1);
    }

    #[test]
    fn test_get_metrics_string() {
        record_classification("benign");
        let metrics = get_metrics_string();
        assert!(metrics.contains("phishnet_classifications_total"));
    }
}

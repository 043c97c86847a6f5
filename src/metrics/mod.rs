use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus HTTP exporter on :9000.
/// After this call, any metrics recorded via the `metrics` crate
/// macros (counter!, histogram!) are automatically exported at /metrics.
pub fn init_metrics_server() {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], 9000))
        .install()
        .expect("failed to start Prometheus metrics server");
}

// ── Market polling metrics ───────────────────────────────────────

pub fn record_poll(category: &str, outcome: &str, elapsed: Duration) {
    counter!("market_polls_total", "category" => category.to_string(), "outcome" => outcome.to_string())
        .increment(1);
    histogram!("market_poll_latency_ms", "category" => category.to_string())
        .record(elapsed.as_secs_f64() * 1_000.0);
}

// ── Wallet session metrics ───────────────────────────────────────

pub fn record_wallet_connect(outcome: &str) {
    counter!("wallet_connects_total", "outcome" => outcome.to_string()).increment(1);
}

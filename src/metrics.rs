use std::sync::OnceLock;

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder once per process and describe all
/// application metrics. Later calls return the same handle, whose `render()`
/// produces the text/plain scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if let Err(e) = metrics::set_global_recorder(recorder) {
                tracing::warn!(error = %e, "Metrics recorder already installed");
            }
            describe();
            handle
        })
        .clone()
}

fn describe() {
    describe_counter!("proxy_requests_total", "Proxy requests served, by resource");
    describe_counter!("upstream_errors_total", "Failed upstream calls, by resource");
    describe_histogram!(
        "upstream_latency_seconds",
        Unit::Seconds,
        "Upstream response latency, by path"
    );
    describe_counter!("user_state_writes_total", "Persisted user-state writes, by table");
}

// ABOUTME: Prometheus metrics for spawn/apply traffic
// ABOUTME: Recording is a no-op until init_metrics installs the global recorder

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder. Call at most once per process.
pub fn init_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// Count a spawn request by outcome ("ok", "already_spawned", "unsupported", ...)
pub fn record_spawn(outcome: &'static str) {
    metrics::counter!("vmdocker_spawn_requests_total", "outcome" => outcome).increment(1);
}

/// Count an apply request by outcome ("ok", "runtime_nil", "failed", "bad_request")
pub fn record_apply(outcome: &'static str) {
    metrics::counter!("vmdocker_apply_requests_total", "outcome" => outcome).increment(1);
}

/// Time spent inside the backend for one apply
pub fn record_apply_duration(elapsed: Duration) {
    metrics::histogram!("vmdocker_apply_duration_seconds").record(elapsed.as_secs_f64());
}

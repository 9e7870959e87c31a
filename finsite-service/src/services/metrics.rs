//! Metrics collection for finsite-service.
//!
//! HTTP request metrics come from the shared middleware through the `metrics`
//! facade; upstream provider calls are counted in a `prometheus` registry.

use anyhow::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static PROVIDER_CALLS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Install the Prometheus recorder and register the provider counter.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    if METRICS_HANDLE.set(handle).is_err() {
        anyhow::bail!("metrics already initialized");
    }

    let registry = Registry::new();

    let provider_calls = IntCounterVec::new(
        Opts::new(
            "finsite_provider_calls_total",
            "Total upstream provider calls by provider and status",
        ),
        &["provider", "status"],
    )
    .context("failed to create finsite_provider_calls_total")?;

    registry
        .register(Box::new(provider_calls.clone()))
        .context("failed to register finsite_provider_calls_total")?;

    let _ = PROMETHEUS_REGISTRY.set(registry);
    let _ = PROVIDER_CALLS_TOTAL.set(provider_calls);

    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&registry.gather(), &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

/// Record an upstream provider call. A no-op until `init_metrics` has run.
pub fn record_provider_call(provider: &str, status: &str) {
    if let Some(counter) = PROVIDER_CALLS_TOTAL.get() {
        counter.with_label_values(&[provider, status]).inc();
    }
}

/// Status label for a provider result.
pub fn call_status<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "success"
    } else {
        "error"
    }
}

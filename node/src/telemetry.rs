// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const PASSES_TOTAL: &str = "credbridge_passes_total";
pub const PASS_FAILURES_TOTAL: &str = "credbridge_pass_failures_total";
pub const PASS_DURATION_SECONDS: &str = "credbridge_pass_duration_seconds";
pub const SCORES_POSTED_TOTAL: &str = "credbridge_scores_posted_total";
pub const FEEDS_CREATED_TOTAL: &str = "credbridge_feeds_created_total";
pub const IDENTITIES_DEFERRED_TOTAL: &str = "credbridge_identities_deferred_total";
pub const PROOFS_VERIFIED_TOTAL: &str = "credbridge_proofs_verified_total";

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    // 1. Initialize Tracing (Logs)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "credbridge_node=debug,credbridge_kernel=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Initialize Metrics (Prometheus)
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => tracing::error!("Failed to install Prometheus recorder: {}", e),
    }

    metrics::describe_counter!(PASSES_TOTAL, "Reconciliation passes completed");
    metrics::describe_counter!(PASS_FAILURES_TOTAL, "Reconciliation passes that failed and committed nothing");
    metrics::describe_histogram!(PASS_DURATION_SECONDS, "Wall time of one reconciliation pass");
    metrics::describe_counter!(SCORES_POSTED_TOTAL, "Scores submitted to the oracle");
    metrics::describe_counter!(FEEDS_CREATED_TOTAL, "Feeds created on the oracle");
    metrics::describe_counter!(IDENTITIES_DEFERRED_TOTAL, "Acting identities that could not be resolved");
    metrics::describe_counter!(PROOFS_VERIFIED_TOTAL, "Identity proofs verified and cached");

    metrics::gauge!("credbridge_node_up", 1.0);
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}

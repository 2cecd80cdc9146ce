use anyhow::Context;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Prometheus exposition for the counters/histogram recorded by the engine:
/// `storm_classifications_total`, `storm_classification_errors_total`,
/// `storm_classification_duration_us`.
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Only one recorder may be
    /// installed per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        ::metrics::describe_counter!(
            "storm_classifications_total",
            "Successful classifications, labelled by top category"
        );
        ::metrics::describe_counter!(
            "storm_classification_errors_total",
            "Rejected classifications, labelled by error kind"
        );
        ::metrics::describe_histogram!(
            "storm_classification_duration_us",
            "Time spent in one classification call (microseconds)"
        );

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

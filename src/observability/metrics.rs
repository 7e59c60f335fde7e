//! Metrics collection and exposition.
//!
//! # Metrics
//! - `route_requests_total` (counter): requests by route and the stage that answered
//! - `route_pipeline_duration_seconds` (histogram): time spent in the pipeline
//! - `route_short_circuits_total` (counter): early answers by stage kind

use std::net::SocketAddr;
use std::time::Duration;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Failures are logged; the server keeps running without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe();
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

fn describe() {
    describe_counter!("route_requests_total", "Requests handled per route and answering stage");
    describe_histogram!("route_pipeline_duration_seconds", "Pipeline execution time in seconds");
    describe_counter!("route_short_circuits_total", "Requests answered before the controller");
}

/// Record one finished request. `outcome` names the stage that produced the
/// response (`controller` when the chain ran to completion).
pub fn record_request(route: &str, outcome: &'static str, status: u16, duration: Duration) {
    counter!(
        "route_requests_total",
        "route" => route.to_string(),
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("route_pipeline_duration_seconds", "route" => route.to_string())
        .record(duration.as_secs_f64());

    if outcome != "controller" {
        counter!("route_short_circuits_total", "stage" => outcome).increment(1);
    }
}

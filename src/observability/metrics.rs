//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): requests seen by the dispatcher,
//!   labelled by `outcome` (`found`, `unknown_controller`, `unknown_action`)
//! - `dispatch_action_faults_total` (counter): failed actions, labelled by
//!   `controller`
//!
//! Without an installed recorder these calls are no-ops.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_dispatch(outcome: &'static str) {
    ::metrics::counter!("dispatch_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_action_fault(controller: &str) {
    ::metrics::counter!("dispatch_action_faults_total", "controller" => controller.to_string())
        .increment(1);
}

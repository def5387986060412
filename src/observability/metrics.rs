//! Metrics collection and exposition.
//!
//! # Metrics
//! - `adapter_requests_total` (counter): requests by method, status
//! - `adapter_request_duration_seconds` (histogram): latency distribution
//! - `adapter_invoker_errors_total` (counter): invoker failures by gRPC code
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, histogram};
use axum::http::Method;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use tonic::Code;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one bridged HTTP request.
pub fn record_request(method: &Method, status: u16, start: Instant) {
    counter!(
        "adapter_requests_total",
        "method" => method_label(method),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("adapter_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Label for `method`. Extension methods share one bucket so clients cannot
/// grow the label set.
fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        Method::CONNECT => "CONNECT",
        Method::PATCH => "PATCH",
        Method::TRACE => "TRACE",
        _ => "other",
    }
}

/// Record a failure reported by the invoker.
pub fn record_invoker_error(code: Code) {
    counter!("adapter_invoker_errors_total", "code" => format!("{code:?}")).increment(1);
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `clacks_incoming_messages_total` (counter): overhead values received
//! - `clacks_turned_around_total` (counter): incoming values echoed back
//! - `clacks_sent_on_total` (counter): values handed to the side-channel handler
//! - `clacks_provider_failures_total` (counter, `side`): message provider errors
//! - `clacks_send_on_failures_total` (counter): side-channel handler errors
//! - `clacks_invalid_messages_total` (counter, `side`): values that could not be
//!   written as header values
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Which adapter a metric came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Client,
    Server,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Side::Client => "client",
            Side::Server => "server",
        }
    }
}

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_incoming(count: usize) {
    counter!("clacks_incoming_messages_total").increment(count as u64);
}

pub fn record_turned_around(count: usize) {
    counter!("clacks_turned_around_total").increment(count as u64);
}

pub fn record_sent_on(count: usize) {
    counter!("clacks_sent_on_total").increment(count as u64);
}

pub fn record_provider_failure(side: Side) {
    counter!("clacks_provider_failures_total", "side" => side.as_str()).increment(1);
}

pub fn record_send_on_failure() {
    counter!("clacks_send_on_failures_total").increment(1);
}

pub fn record_invalid_message(side: Side) {
    counter!("clacks_invalid_messages_total", "side" => side.as_str()).increment(1);
}

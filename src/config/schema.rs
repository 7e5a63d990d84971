//! Configuration schema definitions.
//!
//! This module defines the configuration for the clacks middleware and the
//! demo server. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::protocol::{DEFAULT_MESSAGE, OVERHEAD_HEADER};

/// Root configuration for the clacks demo server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Clacks Overhead protocol settings.
    pub clacks: ClacksConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Clacks Overhead protocol configuration, shared by client and server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClacksConfig {
    /// Name of the overhead header.
    pub header_name: String,

    /// Messages sent with every request/response.
    pub messages: Vec<String>,

    /// When the side-channel handler is invoked.
    pub send_on: SendOnPolicy,

    /// Client only: append headers to the caller's request instead of a copy.
    pub use_original_request: bool,

    /// Relay of sent-on messages.
    pub relay: RelayConfig,
}

impl Default for ClacksConfig {
    fn default() -> Self {
        Self {
            header_name: OVERHEAD_HEADER.to_string(),
            messages: vec![DEFAULT_MESSAGE.to_string()],
            send_on: SendOnPolicy::default(),
            use_original_request: false,
            relay: RelayConfig::default(),
        }
    }
}

/// When to invoke a configured side-channel handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendOnPolicy {
    /// Once per request, even with nothing to send on.
    #[default]
    Always,
    /// Only when the request carried at least one overhead value.
    WhenIncoming,
    /// Only when at least one incoming message was coded `G`.
    NonEmpty,
}

impl SendOnPolicy {
    /// Whether the handler runs for a request with `incoming` overhead values
    /// of which `send_on` were coded `G`.
    pub fn should_dispatch(self, incoming: usize, send_on: usize) -> bool {
        match self {
            SendOnPolicy::Always => true,
            SendOnPolicy::WhenIncoming => incoming > 0,
            SendOnPolicy::NonEmpty => send_on > 0,
        }
    }
}

/// Relay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Keep sent-on messages and emit them with later responses.
    pub enabled: bool,

    /// Maximum number of relayed messages kept (oldest evicted first).
    pub capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 64,
        }
    }
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Header name and every configured message must be writable as HTTP headers
//! - Validate value ranges (timeouts > 0, relay capacity > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::schema::{ClacksConfig, ServerConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid header name {0:?}")]
    HeaderName(String),

    #[error("message {0:?} is not a valid header value")]
    Message(String),

    #[error("relay capacity must be greater than zero")]
    RelayCapacity,

    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("request timeout must be greater than zero")]
    RequestTimeout,
}

/// Validate the whole server configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = match validate_clacks(&config.clacks) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the protocol settings shared by client and server.
pub fn validate_clacks(config: &ClacksConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if HeaderName::from_bytes(config.header_name.as_bytes()).is_err() {
        errors.push(ValidationError::HeaderName(config.header_name.clone()));
    }

    for message in &config.messages {
        if HeaderValue::from_bytes(message.as_bytes()).is_err() {
            errors.push(ValidationError::Message(message.clone()));
        }
    }

    if config.relay.enabled && config.relay.capacity == 0 {
        errors.push(ValidationError::RelayCapacity);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ServerConfig::default();
        config.clacks.header_name = "X Clacks".into();
        config.clacks.messages.push("line\nbreak".into());
        config.clacks.relay.capacity = 0;
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::HeaderName("X Clacks".into()),
                ValidationError::Message("line\nbreak".into()),
                ValidationError::RelayCapacity,
                ValidationError::BindAddress("nowhere".into()),
                ValidationError::RequestTimeout,
            ]
        );
    }

    #[test]
    fn disabled_relay_may_have_zero_capacity() {
        let mut config = ClacksConfig::default();
        config.relay.enabled = false;
        config.relay.capacity = 0;
        assert!(validate_clacks(&config).is_ok());
    }
}

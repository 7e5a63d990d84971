//! Relay of sent-on messages.
//!
//! # Responsibilities
//! - Keep every distinct message received with the `G` code
//! - Offer them, after the configured defaults, as outgoing messages
//!
//! # Design Decisions
//! - Bounded: the oldest relayed message is evicted at capacity
//! - Storage grows with what is relayed, not with the configured capacity
//! - One instance is shared (via Arc) by the server middleware, which feeds
//!   it, and the providers of servers or clients that read from it

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tower::BoxError;

use crate::config::RelayConfig;
use crate::http::request::RequestInfo;
use crate::provider::MessageProvider;
use crate::side_channel::SendOnHandler;

/// A message relay: a send-on handler that is also a message provider.
#[derive(Debug)]
pub struct Relay {
    defaults: Vec<String>,
    capacity: usize,
    relayed: Mutex<VecDeque<String>>,
}

impl Relay {
    /// Create a relay that always offers `defaults` first.
    pub fn new<I, S>(defaults: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            defaults: defaults.into_iter().map(Into::into).collect(),
            capacity,
            relayed: Mutex::new(VecDeque::new()),
        }
    }

    pub fn from_config(defaults: &[String], config: &RelayConfig) -> Self {
        Self::new(defaults.iter().cloned(), config.capacity)
    }

    /// Store messages, skipping ones already held.
    pub fn relay<'a, I>(&self, messages: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut relayed = self.relayed.lock().expect("relay mutex poisoned");
        let mut added = 0;
        for message in messages {
            if self.capacity == 0 || relayed.iter().any(|m| m == message) {
                continue;
            }
            if relayed.len() == self.capacity {
                relayed.pop_front();
            }
            relayed.push_back(message.to_string());
            added += 1;
        }
        added
    }

    /// Relayed messages in arrival order.
    pub fn snapshot(&self) -> Vec<String> {
        let relayed = self.relayed.lock().expect("relay mutex poisoned");
        relayed.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.relayed.lock().expect("relay mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Defaults followed by relayed messages, each value once.
    pub fn outgoing(&self) -> Vec<String> {
        let mut out = self.defaults.clone();
        for message in self.snapshot() {
            if !out.contains(&message) {
                out.push(message);
            }
        }
        out
    }
}

#[async_trait]
impl SendOnHandler for Relay {
    async fn handle(&self, _request: &RequestInfo, messages: &[String]) -> Result<(), BoxError> {
        let added = self.relay(messages.iter().map(String::as_str));
        tracing::debug!(received = messages.len(), added, "Relayed send-on messages");
        Ok(())
    }
}

#[async_trait]
impl MessageProvider for Relay {
    async fn messages(&self, _request: &RequestInfo) -> Result<Vec<String>, BoxError> {
        Ok(self.outgoing())
    }
}

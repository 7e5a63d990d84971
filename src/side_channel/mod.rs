//! Side-channel handling of sent-on messages.
//!
//! # Data Flow
//! ```text
//! Incoming request with "G ..." overhead values
//!     → protocol::processor (collect send-on list)
//!     → SendOnHandler::handle (once per request, per SendOnPolicy)
//!     → relay.rs (optional: keep messages, emit them again later)
//! ```
//!
//! # Design Decisions
//! - Handler failures are never fatal to the request
//! - Handlers see the request descriptor, not the request body

pub mod relay;

use std::sync::Arc;

use async_trait::async_trait;
use tower::BoxError;

use crate::http::request::RequestInfo;

pub use relay::Relay;

/// Receives incoming messages coded `G` so they can escape the current
/// request and be sent on elsewhere.
#[async_trait]
pub trait SendOnHandler: Send + Sync {
    async fn handle(&self, request: &RequestInfo, messages: &[String]) -> Result<(), BoxError>;
}

#[async_trait]
impl<H: SendOnHandler + ?Sized> SendOnHandler for Arc<H> {
    async fn handle(&self, request: &RequestInfo, messages: &[String]) -> Result<(), BoxError> {
        (**self).handle(request, messages).await
    }
}

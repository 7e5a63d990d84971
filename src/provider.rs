//! Outgoing message providers.
//!
//! A provider is asked, once per request, for the overhead messages the local
//! side wants to send. Clients treat a provider error as fatal to the send;
//! servers log it and serve the request without overhead headers.

use std::sync::Arc;

use async_trait::async_trait;
use tower::BoxError;

use crate::http::request::RequestInfo;
use crate::protocol::DEFAULT_MESSAGE;

/// Source of the outgoing overhead messages for a request.
#[async_trait]
pub trait MessageProvider: Send + Sync {
    async fn messages(&self, request: &RequestInfo) -> Result<Vec<String>, BoxError>;
}

/// Always returns "GNU Terry Pratchett".
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessage;

#[async_trait]
impl MessageProvider for DefaultMessage {
    async fn messages(&self, _request: &RequestInfo) -> Result<Vec<String>, BoxError> {
        Ok(vec![DEFAULT_MESSAGE.to_string()])
    }
}

/// Returns a fixed list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticMessages(Vec<String>);

impl StaticMessages {
    pub fn new<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(messages.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[async_trait]
impl MessageProvider for StaticMessages {
    async fn messages(&self, _request: &RequestInfo) -> Result<Vec<String>, BoxError> {
        Ok(self.0.clone())
    }
}

#[async_trait]
impl<P: MessageProvider + ?Sized> MessageProvider for Arc<P> {
    async fn messages(&self, request: &RequestInfo) -> Result<Vec<String>, BoxError> {
        (**self).messages(request).await
    }
}

//! Client-side Clacks Overhead transport.
//!
//! # Responsibilities
//! - Ask the message provider for the messages to send with a request
//! - Append them as separate overhead header values
//! - Delegate to the underlying sender and return its result unchanged
//!
//! # Design Decisions
//! - A provider failure aborts the send; the sender is never called
//! - `round_trip` leaves the caller's request untouched unless
//!   `use_original_request` is set
//! - As a `tower::Service` the request is owned by the call, so headers are
//!   appended to it directly

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{HeaderName, HeaderValue, Request};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use tower::{BoxError, Layer, Service, ServiceExt};

use crate::config::validation::{validate_clacks, ValidationError};
use crate::config::ClacksConfig;
use crate::http::headers::encode_message;
use crate::http::request::{duplicate, RequestInfo};
use crate::observability::metrics::{self, Side};
use crate::provider::{DefaultMessage, MessageProvider, StaticMessages};

/// Errors returned by [`ClacksTransport`].
#[derive(Debug, Error)]
pub enum TransportError<E> {
    /// The message provider failed; nothing was sent.
    #[error("could not get clacks overhead messages for request")]
    Messages(#[source] BoxError),

    /// A provided message cannot be written as a header value; nothing was sent.
    #[error("clacks overhead message {0:?} is not a valid header value")]
    InvalidMessage(String),

    /// The underlying sender failed.
    #[error("upstream request failed")]
    Upstream(#[source] E),
}

#[derive(Clone)]
struct Settings {
    header: HeaderName,
    provider: Arc<dyn MessageProvider>,
    use_original_request: bool,
}

/// Sender that adds overhead headers to every outgoing request.
#[derive(Clone)]
pub struct ClacksTransport<S> {
    inner: S,
    settings: Arc<Settings>,
}

impl<S> ClacksTransport<S> {
    /// Wrap `inner`, sending "GNU Terry Pratchett" with every request.
    pub fn new(inner: S) -> Self {
        ClacksTransportLayer::new().layer(inner)
    }

    pub fn from_config(inner: S, config: &ClacksConfig) -> Result<Self, Vec<ValidationError>> {
        Ok(ClacksTransportLayer::from_config(config)?.layer(inner))
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Send `request`, decorated with the provider's messages.
    ///
    /// By default a duplicate of the request is decorated and sent, and the
    /// caller's request is left as it was. With `use_original_request` the
    /// headers are appended to `request` itself before sending.
    pub async fn round_trip<B>(
        &self,
        request: &mut Request<B>,
    ) -> Result<S::Response, TransportError<S::Error>>
    where
        S: Service<Request<B>> + Clone,
        B: Clone,
    {
        let info = RequestInfo::from_request(request);
        let values = provide::<S::Error>(&self.settings, &info).await?;

        let outgoing = if self.settings.use_original_request {
            append(request, &self.settings.header, values);
            duplicate(request)
        } else {
            let mut copy = duplicate(request);
            append(&mut copy, &self.settings.header, values);
            copy
        };

        self.inner
            .clone()
            .oneshot(outgoing)
            .await
            .map_err(TransportError::Upstream)
    }
}

async fn provide<E>(
    settings: &Settings,
    info: &RequestInfo,
) -> Result<Vec<HeaderValue>, TransportError<E>> {
    let messages = settings.provider.messages(info).await.map_err(|err| {
        metrics::record_provider_failure(Side::Client);
        TransportError::Messages(err)
    })?;

    messages
        .into_iter()
        .map(|message| {
            encode_message(&message).map_err(|_| {
                metrics::record_invalid_message(Side::Client);
                TransportError::InvalidMessage(message)
            })
        })
        .collect()
}

fn append<B>(request: &mut Request<B>, header: &HeaderName, values: Vec<HeaderValue>) {
    for value in values {
        request.headers_mut().append(header.clone(), value);
    }
}

impl<S, B> Service<Request<B>> for ClacksTransport<S>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = TransportError<S::Error>;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(TransportError::Upstream)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let settings = Arc::clone(&self.settings);
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let info = RequestInfo::from_request(&req);
            let values = provide::<S::Error>(&settings, &info).await?;
            append(&mut req, &settings.header, values);
            inner.call(req).await.map_err(TransportError::Upstream)
        })
    }
}

/// Layer that wraps senders in [`ClacksTransport`].
#[derive(Clone)]
pub struct ClacksTransportLayer {
    settings: Arc<Settings>,
}

impl ClacksTransportLayer {
    pub fn new() -> Self {
        Self {
            settings: Arc::new(Settings {
                header: HeaderName::from_static("x-clacks-overhead"),
                provider: Arc::new(DefaultMessage),
                use_original_request: false,
            }),
        }
    }

    pub fn from_config(config: &ClacksConfig) -> Result<Self, Vec<ValidationError>> {
        validate_clacks(config)?;
        let header = HeaderName::from_bytes(config.header_name.as_bytes())
            .map_err(|_| vec![ValidationError::HeaderName(config.header_name.clone())])?;

        Ok(Self {
            settings: Arc::new(Settings {
                header,
                provider: Arc::new(StaticMessages::new(config.messages.iter().cloned())),
                use_original_request: config.use_original_request,
            }),
        })
    }

    pub fn with_provider(self, provider: Arc<dyn MessageProvider>) -> Self {
        self.update(|s| s.provider = provider)
    }

    pub fn with_messages<I, M>(self, messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.with_provider(Arc::new(StaticMessages::new(messages)))
    }

    pub fn use_original_request(self, enabled: bool) -> Self {
        self.update(|s| s.use_original_request = enabled)
    }

    fn update(self, f: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = Settings::clone(&self.settings);
        f(&mut settings);
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl Default for ClacksTransportLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for ClacksTransportLayer {
    type Service = ClacksTransport<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClacksTransport {
            inner,
            settings: Arc::clone(&self.settings),
        }
    }
}

/// HTTP client type used by [`default_client`]. Request bodies are text.
pub type HttpClient = Client<HttpConnector, String>;

/// A plain hyper-util HTTP client.
pub fn http_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// A plain HTTP client that sends "GNU Terry Pratchett" with every request.
pub fn default_client() -> ClacksTransport<HttpClient> {
    ClacksTransport::new(http_client())
}

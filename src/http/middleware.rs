//! Server-side Clacks Overhead middleware.
//!
//! Adds "GNU Terry Pratchett" to every response by default. Incoming overhead
//! values are logged unless coded `N`, echoed back when coded `U`, and handed
//! to the side-channel handler when coded `G`.
//!
//! Nothing here may break the request: provider and handler failures are
//! logged and the inner service always runs.
//!
//! Header values are handled as raw bytes, so a turned-around value goes back
//! exactly as it arrived. Logs and the side-channel handler get text, decoded
//! lossily.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{HeaderName, Request, Response};
use tower::{Layer, Service};

use crate::config::validation::{validate_clacks, ValidationError};
use crate::config::{ClacksConfig, SendOnPolicy};
use crate::http::headers::{append_messages, read_values};
use crate::http::request::RequestInfo;
use crate::observability::metrics::{self, Side};
use crate::observability::{NoopLogger, OverheadLogger};
use crate::protocol::{process, OVERHEAD_HEADER};
use crate::provider::{MessageProvider, StaticMessages};
use crate::side_channel::SendOnHandler;

/// Everything a `ClacksService` needs per request. Immutable once built.
#[derive(Clone)]
struct Settings {
    header: HeaderName,
    provider: Arc<dyn MessageProvider>,
    send_on: Option<Arc<dyn SendOnHandler>>,
    send_on_policy: SendOnPolicy,
    logger: Arc<dyn OverheadLogger>,
}

/// Layer that wraps services in [`ClacksService`].
#[derive(Clone)]
pub struct ClacksLayer {
    settings: Arc<Settings>,
}

impl ClacksLayer {
    /// Default settings: send "GNU Terry Pratchett", no side channel, no logs.
    pub fn new() -> Self {
        Self {
            settings: Arc::new(Settings {
                header: HeaderName::from_static("x-clacks-overhead"),
                provider: Arc::new(StaticMessages::new([crate::protocol::DEFAULT_MESSAGE])),
                send_on: None,
                send_on_policy: SendOnPolicy::default(),
                logger: Arc::new(NoopLogger),
            }),
        }
    }

    /// Build from configuration. The configured messages become the provider.
    pub fn from_config(config: &ClacksConfig) -> Result<Self, Vec<ValidationError>> {
        validate_clacks(config)?;
        let header = HeaderName::from_bytes(config.header_name.as_bytes())
            .map_err(|_| vec![ValidationError::HeaderName(config.header_name.clone())])?;

        Ok(Self {
            settings: Arc::new(Settings {
                header,
                provider: Arc::new(StaticMessages::new(config.messages.iter().cloned())),
                send_on: None,
                send_on_policy: config.send_on,
                logger: Arc::new(NoopLogger),
            }),
        })
    }

    pub fn with_provider(self, provider: Arc<dyn MessageProvider>) -> Self {
        self.update(|s| s.provider = provider)
    }

    /// Static outgoing messages, replacing the current provider.
    pub fn with_messages<I, S>(self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_provider(Arc::new(StaticMessages::new(messages)))
    }

    pub fn with_send_on(self, handler: Arc<dyn SendOnHandler>) -> Self {
        self.update(|s| s.send_on = Some(handler))
    }

    pub fn with_send_on_policy(self, policy: SendOnPolicy) -> Self {
        self.update(|s| s.send_on_policy = policy)
    }

    pub fn with_logger(self, logger: Arc<dyn OverheadLogger>) -> Self {
        self.update(|s| s.logger = logger)
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.settings.header
    }

    fn update(self, f: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = Settings::clone(&self.settings);
        f(&mut settings);
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl Default for ClacksLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for ClacksLayer {
    type Service = ClacksService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ClacksService {
            inner,
            settings: Arc::clone(&self.settings),
        }
    }
}

/// Service that applies the Clacks Overhead protocol to each request.
#[derive(Clone)]
pub struct ClacksService<S> {
    inner: S,
    settings: Arc<Settings>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for ClacksService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let settings = Arc::clone(&self.settings);
        // The clone is not ready; keep the driven one for this call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let info = RequestInfo::from_request(&req);

            let outgoing = match settings.provider.messages(&info).await {
                Ok(messages) => messages,
                Err(err) => {
                    // No point in killing the request for the sake of this header.
                    metrics::record_provider_failure(Side::Server);
                    settings.logger.error(&format!(
                        "Clacks Overhead Middleware: could not get overhead messages: {}",
                        err
                    ));
                    return inner.call(req).await;
                }
            };

            let incoming = read_values(req.headers(), &settings.header);
            let result = process(&outgoing, &incoming);

            for message in &result.log {
                settings.logger.print(&format!(
                    "Received Clacks Overhead message: {:?}",
                    message.to_string_lossy()
                ));
            }

            metrics::record_incoming(incoming.len());
            metrics::record_turned_around(result.turned_around);

            if let Some(handler) = &settings.send_on {
                if settings
                    .send_on_policy
                    .should_dispatch(incoming.len(), result.send_on.len())
                {
                    let send_on: Vec<String> = result
                        .send_on
                        .iter()
                        .map(|m| m.to_string_lossy().into_owned())
                        .collect();
                    metrics::record_sent_on(send_on.len());
                    if let Err(err) = handler.handle(&info, &send_on).await {
                        metrics::record_send_on_failure();
                        settings.logger.error(&format!(
                            "Clacks Overhead Middleware: could not handle send-on messages {:?}: {}",
                            send_on, err
                        ));
                    }
                }
            }

            tracing::debug!(
                incoming = incoming.len(),
                outgoing = result.outgoing.len(),
                send_on = result.send_on.len(),
                "Processed clacks overhead"
            );

            let mut response = inner.call(req).await?;

            let rejected = append_messages(
                response.headers_mut(),
                &settings.header,
                result.outgoing.iter(),
            );
            for message in rejected {
                metrics::record_invalid_message(Side::Server);
                settings.logger.error(&format!(
                    "Clacks Overhead Middleware: {:?} is not a valid {} value",
                    message.to_string_lossy(),
                    OVERHEAD_HEADER
                ));
            }

            Ok(response)
        })
    }
}

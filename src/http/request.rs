//! Request descriptor handed to the clacks collaborators.
//!
//! # Responsibilities
//! - Snapshot the routing-relevant parts of a request (method, URI, headers)
//! - Stay independent of the body type so collaborators are object safe
//!
//! # Design Decisions
//! - Owned snapshot: it is held across awaits and shared with trait objects,
//!   which a borrow of a `!Sync` body would not allow
//! - Duplicating a request clones the body and gives the copy its own header map

use axum::http::{HeaderMap, Method, Request, Uri, Version};

/// What the message provider and side-channel handler learn about a request.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl RequestInfo {
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            version: request.version(),
            headers: request.headers().clone(),
        }
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }
}

impl<B> From<&Request<B>> for RequestInfo {
    fn from(request: &Request<B>) -> Self {
        Self::from_request(request)
    }
}

/// Produce a new request equal to `request`, with its own header map.
///
/// Clients keep their original request unmodified while the copy is
/// decorated and sent.
pub fn duplicate<B: Clone>(request: &Request<B>) -> Request<B> {
    let mut copy = Request::new(request.body().clone());
    *copy.method_mut() = request.method().clone();
    *copy.uri_mut() = request.uri().clone();
    *copy.version_mut() = request.version();
    *copy.headers_mut() = request.headers().clone();
    *copy.extensions_mut() = request.extensions().clone();
    copy
}

//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tower::BoxError;

use clacks_overhead::http::RequestInfo;
use clacks_overhead::{MessageProvider, SendOnHandler, OVERHEAD_HEADER};

/// Start a backend that answers with the overhead values it received, one per line.
#[allow(dead_code)]
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new().route(
        "/",
        any(|headers: HeaderMap| async move {
            headers
                .get_all(OVERHEAD_HEADER)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect::<Vec<_>>()
                .join("\n")
        }),
    );

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

/// Provider returning a fixed result, counting calls.
#[allow(dead_code)]
pub struct ScriptedProvider {
    pub messages: Vec<String>,
    pub error: Option<String>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn ok<I: IntoIterator<Item = &'static str>>(messages: I) -> Self {
        Self {
            messages: messages.into_iter().map(String::from).collect(),
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            messages: Vec::new(),
            error: Some(error.to_string()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MessageProvider for ScriptedProvider {
    async fn messages(&self, _request: &RequestInfo) -> Result<Vec<String>, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(error) => Err(error.clone().into()),
            None => Ok(self.messages.clone()),
        }
    }
}

/// Send-on handler that records every call and optionally fails.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingSendOn {
    pub calls: Mutex<Vec<Vec<String>>>,
    pub error: Option<String>,
}

#[allow(dead_code)]
impl RecordingSendOn {
    pub fn failing(error: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            error: Some(error.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn received(&self) -> Vec<String> {
        self.calls().into_iter().flatten().collect()
    }
}

#[async_trait]
impl SendOnHandler for RecordingSendOn {
    async fn handle(&self, _request: &RequestInfo, messages: &[String]) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        match &self.error {
            Some(error) => Err(error.clone().into()),
            None => Ok(()),
        }
    }
}

/// Sort for order-independent comparison.
#[allow(dead_code)]
pub fn sorted<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut values: Vec<String> = values.into_iter().map(Into::into).collect();
    values.sort();
    values
}

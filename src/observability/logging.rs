//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Define the logger capability used by the clacks middleware
//! - Configure log level at runtime
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via config and environment (RUST_LOG wins)

use std::sync::{Arc, Mutex};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Logging capability for the middleware: an informational sink and an
/// error sink.
pub trait OverheadLogger: Send + Sync {
    fn print(&self, message: &str);
    fn error(&self, message: &str);
}

/// Discards everything. The default logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl OverheadLogger for NoopLogger {
    fn print(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards to `tracing` at info and error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl OverheadLogger for TracingLogger {
    fn print(&self, message: &str) {
        tracing::info!(target: "clacks", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "clacks", "{}", message);
    }
}

/// Keeps every line in memory. Useful for tests and diagnostics endpoints.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    logs: Arc<Mutex<Vec<String>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs(&self) -> Vec<String> {
        self.logs.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl OverheadLogger for MemoryLogger {
    fn print(&self, message: &str) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.push(message.to_string());
        }
    }

    fn error(&self, message: &str) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(message.to_string());
        }
    }
}

/// Install the global tracing subscriber.
///
/// Returns false if a subscriber was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "clacks_overhead={level},clacks={level},tower_http={level}",
            level = config.log_level
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_logger_separates_sinks() {
        let logger = MemoryLogger::new();
        logger.print("hello");
        logger.error("oops");
        logger.print("again");

        assert_eq!(logger.logs(), vec!["hello", "again"]);
        assert_eq!(logger.errors(), vec!["oops"]);
    }

    #[test]
    fn clones_share_storage() {
        let logger = MemoryLogger::new();
        let shared: Arc<dyn OverheadLogger> = Arc::new(logger.clone());
        shared.print("through the trait object");
        assert_eq!(logger.logs().len(), 1);
    }
}

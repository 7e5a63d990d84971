//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware and transport produce:
//!     → logging.rs (OverheadLogger calls + structured tracing events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The OverheadLogger is the only sink that ever sees message text
//! - Internal tracing events carry counts, never message contents
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use logging::{MemoryLogger, NoopLogger, OverheadLogger, TracingLogger};

//! Clacks Overhead protocol core.
//!
//! # Data Flow
//! ```text
//! Inbound X-Clacks-Overhead values
//!     → codes.rs (extract the code prefix of each value)
//!     → processor.rs (merge with outgoing messages, dedupe, pick send-on set)
//!     → ProcessingResult (applied by the http adapters)
//! ```
//!
//! # Design Decisions
//! - Everything here is pure: no I/O, no shared state, no request types
//! - Wire constants are immutable; components capture a `ClacksConfig`
//!   at construction instead of reading globals

pub mod codes;
pub mod message;
pub mod processor;

pub use codes::{extract_codes, Code, Codes};
pub use message::OverheadMessage;
pub use processor::{process, ProcessingResult};

/// The key for the Clacks Overhead header. See http://www.gnuterrypratchett.com/.
pub const OVERHEAD_HEADER: &str = "X-Clacks-Overhead";

/// A man is not dead while his name is still spoken.
pub const DEFAULT_MESSAGE: &str = "GNU Terry Pratchett";

//! HTTP adapters for the Clacks Overhead protocol.
//!
//! # Data Flow
//! ```text
//! Server:
//!     inbound request
//!     → middleware.rs (provider, read header, process, log, send on)
//!     → inner service
//!     → middleware.rs (append outgoing messages to the response)
//!
//! Client:
//!     outgoing request
//!     → transport.rs (provider, append messages to a copy or the original)
//!     → underlying sender
//! ```

pub mod headers;
pub mod middleware;
pub mod request;
pub mod server;
pub mod transport;

pub use middleware::{ClacksLayer, ClacksService};
pub use request::RequestInfo;
pub use server::HttpServer;
pub use transport::{default_client, http_client, ClacksTransport, ClacksTransportLayer, TransportError};

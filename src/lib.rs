//! Clacks Overhead for HTTP.
//!
//! Every participant attaches marker values to the `X-Clacks-Overhead`
//! header; servers additionally honour codes prefixed to incoming values
//! (`G` send on, `N` do not log, `U` turn around).

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod protocol;
pub mod provider;
pub mod side_channel;

pub use config::{ClacksConfig, SendOnPolicy, ServerConfig};
pub use http::{default_client, ClacksLayer, ClacksTransport, HttpServer, RequestInfo};
pub use lifecycle::Shutdown;
pub use observability::OverheadLogger;
pub use protocol::{
    extract_codes, process, Code, OverheadMessage, ProcessingResult, DEFAULT_MESSAGE,
    OVERHEAD_HEADER,
};
pub use provider::MessageProvider;
pub use side_channel::{Relay, SendOnHandler};

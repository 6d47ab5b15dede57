//! Clients for services that sit next to onyx-ext: the Onyx API server
//! (session auth, connectors) and Loki (log queries).

mod error;
mod loki;
mod onyx;

pub use error::UpstreamError;
pub use loki::{LogEntry, LogQuery, LokiClient};
pub use onyx::{ConnectorRequest, CreatedConnector, OnyxClient};

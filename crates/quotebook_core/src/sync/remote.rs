//! Remote source contract used by the sync agent.

use crate::model::quote::Quote;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Collection endpoint polled when no other endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
/// Category label assigned to every server-origin quote.
pub const DEFAULT_SERVER_CATEGORY: &str = "Server";
pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Network-level failure while talking to the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, timeout or client setup failure.
    Request(String),
    /// Endpoint answered with a non-success status.
    Status { status: u16, body: String },
    /// Response body did not have the expected shape.
    Decode(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request(message) => write!(f, "request failed: {message}"),
            Self::Status { status, body } => write!(f, "endpoint returned {status}: {body}"),
            Self::Decode(message) => write!(f, "invalid response body: {message}"),
        }
    }
}

impl Error for TransportError {}

/// Sync tuning shared by the agent loop and the HTTP adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub endpoint: String,
    pub interval: Duration,
    pub batch_size: usize,
    pub request_timeout: Duration,
    pub server_category: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            interval: DEFAULT_SYNC_INTERVAL,
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            server_category: DEFAULT_SERVER_CATEGORY.to_string(),
        }
    }
}

/// Source of remote quote candidates.
///
/// Implementations must not touch the local store; merging is the agent's job.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Stable identifier logged as `source=` on fetch and post events.
    fn source_id(&self) -> &str;

    /// Fetches at most `limit` candidate quotes.
    async fn fetch_candidates(&self, limit: usize) -> Result<Vec<Quote>, TransportError>;

    /// Uploads one quote and returns the raw response body.
    async fn post_quote(&self, quote: &Quote) -> Result<String, TransportError>;
}

//! Collaborators the dispatcher performs I/O through.
//!
//! A [`Transport`] performs one HTTP exchange. An [`ExtrasApi`] is the host's
//! proxy: it knows the proxy base URL and forwards requests to it. Both are
//! passed to the dispatcher explicitly so tests can swap in in-memory fakes.

mod extras;
mod http;

pub use extras::ExtrasClient;
pub use http::HttpTransport;

use crate::http::{FetchRequest, FetchResponse};
use async_trait::async_trait;

/// Failure to complete an HTTP exchange.
///
/// A response with a non-success status is not a transport error; it is
/// returned as data and interpreted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Performs a single HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the response, whatever its status.
    async fn send(&self, request: FetchRequest) -> Result<FetchResponse, TransportError>;
}

/// The host's Extras proxy API.
#[async_trait]
pub trait ExtrasApi: Send + Sync {
    /// Current proxy base URL.
    fn api_url(&self) -> String;

    /// Forward `request` to the proxy, adding whatever the proxy requires.
    async fn extras_fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError>;
}

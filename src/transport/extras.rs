//! Extras proxy client.

use super::{ExtrasApi, Transport, TransportError};
use crate::http::{FetchRequest, FetchResponse};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// [`ExtrasApi`] backed by a configured base URL and a [`Transport`].
///
/// When an API key is configured, every forwarded request carries it as a
/// bearer token.
pub struct ExtrasClient {
    api_url: String,
    api_key: Option<String>,
    transport: Arc<dyn Transport>,
}

impl ExtrasClient {
    /// Create a client for the proxy at `api_url`.
    pub fn new(api_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: None,
            transport,
        }
    }

    /// Authenticate forwarded requests with `api_key`.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl ExtrasApi for ExtrasClient {
    fn api_url(&self) -> String {
        self.api_url.clone()
    }

    async fn extras_fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let request = match &self.api_key {
            Some(key) if !key.is_empty() => {
                request.header("Authorization", format!("Bearer {key}"))
            }
            _ => request,
        };
        debug!("extras {} {}", request.method, request.url);
        self.transport.send(request).await
    }
}

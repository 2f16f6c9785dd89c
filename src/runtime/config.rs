//! Host configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Extras proxy address.
pub const DEFAULT_EXTRAS_URL: &str = "http://localhost:5100";

/// Configuration for the [`Host`](super::Host).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Base URL of the Extras proxy.
    pub extras_url: String,
    /// Bearer token sent to the Extras proxy.
    pub extras_api_key: Option<String>,
    /// Transport timeout in seconds; 0 disables it.
    pub request_timeout: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            extras_url: DEFAULT_EXTRAS_URL.to_string(),
            extras_api_key: None,
            request_timeout: 30,
        }
    }
}

impl HostConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Extras proxy base URL.
    pub fn extras_url(mut self, url: impl Into<String>) -> Self {
        self.extras_url = url.into();
        self
    }

    /// Set the Extras API key. An empty key is treated as none.
    pub fn extras_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.extras_api_key = (!key.is_empty()).then_some(key);
        self
    }

    /// Set the request timeout in seconds.
    pub fn request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout = secs;
        self
    }

    /// Timeout for the transport, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.request_timeout > 0).then(|| Duration::from_secs(self.request_timeout))
    }
}

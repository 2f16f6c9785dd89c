//! Dispatch error taxonomy.

use crate::transport::TransportError;

/// Usage hint returned for an unrecognized mode.
pub const USAGE: &str =
    "Usage: /theItGirlyFetch mode=(basic|extras) [url=] [method=] [path=] [body=]";

/// Every way a dispatch can fail. Failures never escape the dispatcher as
/// panics; they are returned as values of this type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// A required parameter is missing or a parameter has an invalid value.
    #[error("{0}")]
    Validation(String),

    /// The mode selector is not one of the known modes.
    #[error("{}", USAGE)]
    Usage { mode: String },

    /// The target or proxy base URL could not be parsed.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP exchange did not complete.
    #[error("request to {url} failed: {error}")]
    Transport {
        url: String,
        #[source]
        error: TransportError,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}{}", body_excerpt(.body))]
    Status { url: String, status: u16, body: String },

    /// A request body could not be encoded or a response body is not JSON.
    #[error("{context}: {reason}")]
    Serialization { context: String, reason: String },
}

impl DispatchError {
    /// True for errors caused by the caller's input rather than the network.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DispatchError::Validation(_) | DispatchError::Usage { .. }
        )
    }

    /// Text shown to the user in place of a result.
    ///
    /// Input problems are plain text. Failures of the request itself are a
    /// pretty-printed `{"error": "..."}` object, like any other result.
    pub fn output(&self) -> String {
        match self {
            DispatchError::Usage { .. } => USAGE.to_string(),
            DispatchError::Validation(_) => format!("Error: {self}"),
            other => {
                let value = serde_json::json!({ "error": other.to_string() });
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| format!("Error: {other}"))
            }
        }
    }
}

/// Longest server body quoted in a status error.
const BODY_EXCERPT_CHARS: usize = 200;

fn body_excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return String::new();
    }
    let mut excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
    if excerpt.len() < body.len() {
        excerpt.push_str("...");
    }
    format!(": {excerpt}")
}

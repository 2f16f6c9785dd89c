//! The request dispatcher.

use super::error::DispatchError;
use super::params::{BasicRequestParams, DispatchRequest, ExtrasRequestParams, FetchArgs};
use crate::http::{FetchRequest, FetchResponse, Method};
use crate::transport::{ExtrasApi, Transport};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, warn};
use url::Url;

/// Outcome of one dispatch: the parsed JSON payload or the reason it failed.
pub type DispatchResult = Result<Value, DispatchError>;

/// Routes a validated request to the direct or proxied HTTP path and
/// normalizes the outcome.
///
/// Holds only its collaborators, so one dispatcher can serve any number of
/// concurrent invocations.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    extras: Arc<dyn ExtrasApi>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, extras: Arc<dyn ExtrasApi>) -> Self {
        Self { transport, extras }
    }

    /// Dispatch an already-typed request.
    pub async fn dispatch(&self, request: DispatchRequest) -> DispatchResult {
        let result = self.route(request).await;
        log_outcome(&result);
        result
    }

    /// Validate raw command arguments, then dispatch them.
    pub async fn dispatch_args(&self, args: FetchArgs) -> DispatchResult {
        let result = match args.into_request() {
            Ok(request) => self.route(request).await,
            Err(e) => Err(e),
        };
        log_outcome(&result);
        result
    }

    /// Dispatch a command's name/value arguments. Unknown names are rejected.
    pub async fn dispatch_named(&self, named: &BTreeMap<String, String>) -> DispatchResult {
        match FetchArgs::from_named(named) {
            Ok(args) => self.dispatch_args(args).await,
            Err(e) => {
                let result = Err(e);
                log_outcome(&result);
                result
            }
        }
    }

    async fn route(&self, request: DispatchRequest) -> DispatchResult {
        match request {
            DispatchRequest::Basic(params) => self.basic(params).await,
            DispatchRequest::Extras(params) => self.extras(params).await,
        }
    }

    async fn basic(&self, params: BasicRequestParams) -> DispatchResult {
        params.validate()?;
        Url::parse(&params.url).map_err(|e| DispatchError::InvalidUrl {
            url: params.url.clone(),
            reason: e.to_string(),
        })?;

        debug!("basic fetch: {} {}", params.method, params.url);
        let request = FetchRequest::new(params.method, params.url.as_str())
            .header("Accept", "application/json");
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|error| DispatchError::Transport {
                url: params.url.clone(),
                error,
            })?;

        json_result(&params.url, response)
    }

    async fn extras(&self, params: ExtrasRequestParams) -> DispatchResult {
        params.validate()?;
        let url = extras_url(&self.extras.api_url(), &params.path)?;

        debug!("extras PUT: {}", url);
        let request = FetchRequest::new(Method::Put, url.as_str())
            .json(&params.body)
            .map_err(|e| DispatchError::Serialization {
                context: "failed to encode request body".to_string(),
                reason: e.to_string(),
            })?;
        let response = self
            .extras
            .extras_fetch(request)
            .await
            .map_err(|error| DispatchError::Transport {
                url: url.clone(),
                error,
            })?;

        json_result(&url, response)
    }
}

/// Resolve `path` against the proxy base URL.
///
/// The base URL's path is replaced, not appended to; its scheme, host, port
/// and query are kept.
pub fn extras_url(base: &str, path: &str) -> Result<String, DispatchError> {
    let mut url = Url::parse(base).map_err(|e| DispatchError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(DispatchError::InvalidUrl {
            url: base.to_string(),
            reason: "not a hierarchical URL".to_string(),
        });
    }
    url.set_path(path);
    Ok(url.into())
}

/// A 2xx with no body (a HEAD, a 204) is `null`.
fn json_result(url: &str, response: FetchResponse) -> DispatchResult {
    if !response.status.is_success() {
        return Err(DispatchError::Status {
            url: url.to_string(),
            status: response.status.0,
            body: response.text_body(),
        });
    }
    if response.is_empty() {
        return Ok(Value::Null);
    }
    response
        .json_body()
        .map_err(|e| DispatchError::Serialization {
            context: format!("response from {url} is not valid JSON"),
            reason: e.to_string(),
        })
}

fn log_outcome(result: &DispatchResult) {
    match result {
        Ok(_) => debug!("dispatch succeeded"),
        Err(e) if e.is_user_error() => warn!("dispatch rejected: {}", e),
        Err(e) => error!("dispatch failed: {}", e),
    }
}

//! Typed dispatch parameters and the command's named-argument structure.

use super::error::DispatchError;
use crate::http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Selects the dispatch path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestMode {
    /// Direct fetch of an external URL.
    Basic,
    /// PUT through the host's Extras proxy.
    Extras,
}

impl std::fmt::Display for RequestMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestMode::Basic => write!(f, "basic"),
            RequestMode::Extras => write!(f, "extras"),
        }
    }
}

impl FromStr for RequestMode {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(RequestMode::Basic),
            "extras" => Ok(RequestMode::Extras),
            other => Err(DispatchError::Usage {
                mode: other.to_string(),
            }),
        }
    }
}

/// Parameters for a direct fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicRequestParams {
    pub url: String,
    pub method: Method,
}

impl BasicRequestParams {
    /// A GET of `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.url.trim().is_empty() {
            return Err(DispatchError::Validation(
                "No 'url' provided for basic fetch".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters for a proxied PUT.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrasRequestParams {
    /// Server-relative path, e.g. `/api/test`.
    pub path: String,
    pub body: Value,
}

impl ExtrasRequestParams {
    /// A PUT of `{}` to `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: Value::Object(Default::default()),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.path.trim().is_empty() {
            return Err(DispatchError::Validation(
                "No 'path' provided for extras PUT request".to_string(),
            ));
        }
        Ok(())
    }
}

/// A validated request, one variant per mode.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchRequest {
    Basic(BasicRequestParams),
    Extras(ExtrasRequestParams),
}

impl DispatchRequest {
    pub fn mode(&self) -> RequestMode {
        match self {
            DispatchRequest::Basic(_) => RequestMode::Basic,
            DispatchRequest::Extras(_) => RequestMode::Extras,
        }
    }
}

/// Named arguments of the fetch command, as strings straight from the caller.
///
/// Empty strings count as absent. [`FetchArgs::into_request`] is the single
/// place they are checked and converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchArgs {
    pub mode: String,
    pub url: Option<String>,
    pub method: Option<String>,
    pub path: Option<String>,
    pub body: Option<String>,
}

impl Default for FetchArgs {
    fn default() -> Self {
        Self {
            mode: RequestMode::Basic.to_string(),
            url: None,
            method: None,
            path: None,
            body: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl FetchArgs {
    /// Basic-mode arguments for `url`.
    pub fn basic(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Extras-mode arguments for `path` with a raw JSON `body`.
    pub fn extras(path: impl Into<String>, body: Option<&str>) -> Self {
        Self {
            mode: RequestMode::Extras.to_string(),
            path: Some(path.into()),
            body: body.map(str::to_string),
            ..Self::default()
        }
    }

    /// Build from a name/value map, rejecting names this command does not take.
    pub fn from_named(named: &BTreeMap<String, String>) -> Result<Self, DispatchError> {
        let value = serde_json::to_value(named).map_err(|e| DispatchError::Serialization {
            context: "invalid arguments".to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_value(value).map_err(|e| DispatchError::Validation(e.to_string()))
    }

    /// Validate and convert into a [`DispatchRequest`].
    ///
    /// The mode is checked first, so an unknown mode yields the usage hint
    /// whatever the other arguments hold. `body` is only parsed in extras mode.
    pub fn into_request(self) -> Result<DispatchRequest, DispatchError> {
        let mode = match self.mode.trim() {
            "" => RequestMode::Basic,
            m => m.parse()?,
        };

        match mode {
            RequestMode::Basic => {
                let params = BasicRequestParams::new(non_empty(self.url).unwrap_or_default());
                params.validate()?;
                let method = match non_empty(self.method) {
                    Some(m) => m
                        .parse::<Method>()
                        .map_err(|e| DispatchError::Validation(e.to_string()))?,
                    None => Method::Get,
                };
                Ok(DispatchRequest::Basic(params.with_method(method)))
            }
            RequestMode::Extras => {
                let params = ExtrasRequestParams::new(non_empty(self.path).unwrap_or_default());
                params.validate()?;
                let body = match non_empty(self.body) {
                    Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                        DispatchError::Validation(format!("invalid JSON in 'body' argument: {e}"))
                    })?,
                    None => Value::Object(Default::default()),
                };
                Ok(DispatchRequest::Extras(params.with_body(body)))
            }
        }
    }
}

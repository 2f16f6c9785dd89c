//! # itgfetch - slash-command fetch plugin
//!
//! Adds one chat command, `/theItGirlyFetch` (alias `/itgfetch`), that either
//! fetches a URL and returns its JSON, or sends a JSON `PUT` through the
//! host's Extras proxy.
//!
//! ## Architecture
//!
//! ```text
//!  "/itgfetch mode=extras path=/api/test body={...}"
//!                     │
//!                     ▼
//!  ┌──────────────────────────────────────────────┐
//!  │ Host: parse line ─► CommandRegistry           │
//!  │                       └─► FetchCommand        │
//!  └──────────────────────────┬───────────────────┘
//!                             ▼
//!  ┌──────────────────────────────────────────────┐
//!  │ Dispatcher                                    │
//!  │   basic  ─► Transport        (direct fetch)   │
//!  │   extras ─► ExtrasApi        (proxied PUT)    │
//!  └──────────────────────────────────────────────┘
//! ```
//!
//! The dispatcher takes its collaborators explicitly and never fails past its
//! boundary: every outcome is a [`DispatchResult`](dispatch::DispatchResult).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use itgfetch::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let host = Host::new(HostConfig::new().extras_url("http://localhost:5100"))?;
//!     host.install().await?;
//!
//!     let output = host
//!         .run_line("/itgfetch url=https://api.github.com/users/octocat")
//!         .await;
//!     println!("{output}");
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod dispatch;
pub mod http;
pub mod runtime;
pub mod transport;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::command::{CommandHandler, CommandRegistry, FetchCommand, NamedArgs};
    pub use crate::dispatch::{
        BasicRequestParams, DispatchError, DispatchRequest, DispatchResult, Dispatcher,
        ExtrasRequestParams, FetchArgs, RequestMode,
    };
    pub use crate::http::{FetchRequest, FetchResponse, Method, StatusCode};
    pub use crate::runtime::{Host, HostConfig};
    pub use crate::transport::{ExtrasApi, ExtrasClient, HttpTransport, Transport, TransportError};
    pub use async_trait::async_trait;
}

pub use dispatch::{DispatchError, DispatchResult, Dispatcher};
pub use runtime::{Host, HostConfig};

//! Request dispatch: the only piece of the plugin with behaviour of its own.
//!
//! A [`FetchArgs`] is validated into a [`DispatchRequest`], which the
//! [`Dispatcher`] routes either to a direct fetch through a
//! [`Transport`](crate::transport::Transport) or to a JSON PUT through the
//! host's [`ExtrasApi`](crate::transport::ExtrasApi).

mod dispatcher;
mod error;
mod params;

pub use dispatcher::{extras_url, DispatchResult, Dispatcher};
pub use error::{DispatchError, USAGE};
pub use params::{
    BasicRequestParams, DispatchRequest, ExtrasRequestParams, FetchArgs, RequestMode,
};

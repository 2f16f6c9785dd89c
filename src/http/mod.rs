//! Fetch-like HTTP value types shared by the dispatcher and its transports.

mod request;
mod response;

pub use request::{FetchRequest, Method, UnknownMethod};
pub use response::{FetchResponse, StatusCode};

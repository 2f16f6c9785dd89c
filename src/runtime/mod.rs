//! Host runtime: configuration and the command host.

mod config;
mod host;

pub use config::{HostConfig, DEFAULT_EXTRAS_URL};
pub use host::Host;

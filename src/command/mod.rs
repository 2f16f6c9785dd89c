//! Slash-command framework: manifests, handlers, the registry and the line parser.

pub mod fetch;
pub mod handler;
pub mod manifest;
pub mod parser;
pub mod registry;

pub use fetch::{fetch_manifest, FetchCommand, COMMAND_ALIAS, COMMAND_NAME};
pub use handler::{CommandContext, CommandError, CommandHandler, NamedArgs};
pub use manifest::{ArgumentSpec, ArgumentType, CommandManifest};
pub use parser::{parse_invocation, Invocation};
pub use registry::{CommandRegistry, CommandState};

//! Command handler trait, invocation context and errors.

use crate::command::manifest::CommandManifest;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Named arguments of one invocation, keyed by argument name.
pub type NamedArgs = BTreeMap<String, String>;

/// Execution context handed to a command.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Canonical command name.
    pub command_name: String,
    /// Invocation ID for tracing.
    pub invocation_id: String,
}

impl CommandContext {
    pub fn new(command_name: impl Into<String>, invocation_id: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            invocation_id: invocation_id.into(),
        }
    }
}

/// A slash command with a load-invoke-unload lifecycle.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Called once before the first invocation.
    async fn on_load(&mut self, ctx: &CommandContext) -> Result<(), CommandError> {
        let _ = ctx;
        Ok(())
    }

    /// Run the command. `args` already has manifest defaults applied.
    ///
    /// The returned string is shown to the user as-is.
    async fn invoke(
        &self,
        args: NamedArgs,
        unnamed: String,
        ctx: &CommandContext,
    ) -> Result<String, CommandError>;

    /// Called when the command is being unregistered.
    async fn on_unload(&mut self, ctx: &CommandContext) -> Result<(), CommandError> {
        let _ = ctx;
        Ok(())
    }

    /// Name, aliases and argument metadata.
    fn manifest(&self) -> CommandManifest;
}

/// Errors raised by the command framework itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Parse(String),

    #[error("Unknown command '/{0}'")]
    UnknownCommand(String),

    #[error("Command '{0}' is already registered")]
    Duplicate(String),

    #[error("/{command} does not take an argument named '{name}'")]
    UnknownArgument { command: String, name: String },

    #[error("/{command} requires the '{name}' argument")]
    MissingArgument { command: String, name: String },

    #[error("{0}")]
    Handler(String),
}

impl CommandError {
    pub fn parse(message: impl Into<String>) -> Self {
        CommandError::Parse(message.into())
    }

    pub fn handler(message: impl Into<String>) -> Self {
        CommandError::Handler(message.into())
    }
}

//! Command registry with name/alias resolution and a load-invoke-unload lifecycle.

use crate::command::handler::{CommandContext, CommandError, CommandHandler, NamedArgs};
use crate::command::manifest::CommandManifest;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};
use tracing::{debug, error, info};

/// State of a command in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    /// Registered but `on_load` has not run.
    Unloaded,
    /// `on_load` is running.
    Loading,
    /// Ready to be invoked.
    Ready,
    /// `on_unload` is running.
    Unloading,
}

struct CommandEntry {
    handler: Arc<RwLock<Box<dyn CommandHandler>>>,
    manifest: CommandManifest,
    state: CommandState,
    /// Woken when a load attempt finishes, whatever its outcome.
    load_done: Arc<Notify>,
}

#[derive(Default)]
struct Commands {
    entries: HashMap<String, CommandEntry>,
    /// Alias to canonical name.
    aliases: HashMap<String, String>,
}

impl Commands {
    fn resolve(&self, name: &str) -> Option<String> {
        if self.entries.contains_key(name) {
            return Some(name.to_string());
        }
        self.aliases.get(name).cloned()
    }

    fn is_taken(&self, name: &str) -> bool {
        self.entries.contains_key(name) || self.aliases.contains_key(name)
    }
}

/// Registry of slash commands.
///
/// The map lock is never held while a handler runs.
pub struct CommandRegistry {
    commands: RwLock<Commands>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: RwLock::new(Commands::default()),
        }
    }

    /// Register a command under its manifest name and aliases.
    pub async fn register(&self, handler: Box<dyn CommandHandler>) -> Result<(), CommandError> {
        let manifest = handler.manifest();
        let mut commands = self.commands.write().await;

        for name in std::iter::once(&manifest.name).chain(&manifest.aliases) {
            if commands.is_taken(name) {
                return Err(CommandError::Duplicate(name.clone()));
            }
        }

        let name = manifest.name.clone();
        for alias in &manifest.aliases {
            commands.aliases.insert(alias.clone(), name.clone());
        }
        commands.entries.insert(
            name.clone(),
            CommandEntry {
                handler: Arc::new(RwLock::new(handler)),
                manifest,
                state: CommandState::Unloaded,
                load_done: Arc::new(Notify::new()),
            },
        );

        info!("Slash command /{} registered", name);
        Ok(())
    }

    /// Canonical name for a command name or alias.
    pub async fn resolve(&self, name: &str) -> Option<String> {
        self.commands.read().await.resolve(name)
    }

    async fn set_state(&self, name: &str, state: CommandState) {
        let mut commands = self.commands.write().await;
        if let Some(entry) = commands.entries.get_mut(name) {
            entry.state = state;
        }
    }

    /// Run a command's `on_load` if it is not loaded yet.
    ///
    /// A caller that finds the command mid-load waits for that load to finish
    /// instead of running `on_load` a second time.
    pub async fn load(&self, name: &str) -> Result<(), CommandError> {
        loop {
            let mut commands = self.commands.write().await;
            let canonical = commands
                .resolve(name)
                .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
            let entry = commands
                .entries
                .get_mut(&canonical)
                .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

            match entry.state {
                CommandState::Ready => {
                    debug!("Command /{} is already loaded", canonical);
                    return Ok(());
                }
                CommandState::Loading => {
                    let load_done = entry.load_done.clone();
                    // Registered before the map lock is released, so the
                    // loader's wakeup cannot be missed.
                    let finished = load_done.notified();
                    drop(commands);
                    debug!("Waiting for /{} to finish loading", canonical);
                    finished.await;
                }
                CommandState::Unloaded | CommandState::Unloading => {
                    entry.state = CommandState::Loading;
                    let handler = entry.handler.clone();
                    let load_done = entry.load_done.clone();
                    drop(commands);

                    let result = self.run_load(&canonical, handler).await;
                    load_done.notify_waiters();
                    return result;
                }
            }
        }
    }

    async fn run_load(
        &self,
        canonical: &str,
        handler: Arc<RwLock<Box<dyn CommandHandler>>>,
    ) -> Result<(), CommandError> {
        let context = CommandContext::new(canonical, "");
        let result = handler.write().await.on_load(&context).await;
        match result {
            Ok(()) => {
                self.set_state(canonical, CommandState::Ready).await;
                info!("Loaded command /{}", canonical);
                Ok(())
            }
            Err(e) => {
                error!("Failed to load command /{}: {}", canonical, e);
                self.set_state(canonical, CommandState::Unloaded).await;
                Err(e)
            }
        }
    }

    /// Run a command's `on_unload`. Unload errors are logged, not returned.
    pub async fn unload(&self, name: &str) -> Result<(), CommandError> {
        let mut commands = self.commands.write().await;
        let canonical = commands
            .resolve(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        let entry = commands
            .entries
            .get_mut(&canonical)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

        if entry.state == CommandState::Unloaded {
            debug!("Command /{} is already unloaded", canonical);
            return Ok(());
        }

        entry.state = CommandState::Unloading;
        let handler = entry.handler.clone();
        let context = CommandContext::new(&canonical, "");
        drop(commands);

        if let Err(e) = handler.write().await.on_unload(&context).await {
            error!("Error during unload of command /{}: {}", canonical, e);
        }
        self.set_state(&canonical, CommandState::Unloaded).await;

        info!("Unloaded command /{}", canonical);
        Ok(())
    }

    /// Invoke a command by name or alias, loading it first if needed.
    ///
    /// Named arguments are checked against the manifest: undeclared names
    /// and missing required arguments are rejected, and defaults are filled in.
    pub async fn execute(
        &self,
        name: &str,
        named: NamedArgs,
        unnamed: String,
        invocation_id: &str,
    ) -> Result<String, CommandError> {
        let canonical = self
            .resolve(name)
            .await
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        self.load(&canonical).await?;

        let (handler, manifest) = {
            let commands = self.commands.read().await;
            let entry = commands
                .entries
                .get(&canonical)
                .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
            (entry.handler.clone(), entry.manifest.clone())
        };

        let args = apply_manifest(&manifest, named)?;
        let context = CommandContext::new(&canonical, invocation_id);
        debug!("Invoking /{} [{}]", canonical, invocation_id);

        let handler = handler.read().await;
        handler.invoke(args, unnamed, &context).await
    }

    /// Help text for a command name or alias.
    pub async fn help(&self, name: &str) -> Option<String> {
        let commands = self.commands.read().await;
        let canonical = commands.resolve(name)?;
        commands
            .entries
            .get(&canonical)
            .map(|entry| entry.manifest.help_text())
    }

    /// Get the state of a command.
    pub async fn get_state(&self, name: &str) -> Option<CommandState> {
        let commands = self.commands.read().await;
        let canonical = commands.resolve(name)?;
        commands.entries.get(&canonical).map(|e| e.state)
    }

    /// All registered commands with their aliases, sorted by name.
    pub async fn list(&self) -> Vec<(String, Vec<String>, CommandState)> {
        let commands = self.commands.read().await;
        let mut listed: Vec<_> = commands
            .entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.manifest.aliases.clone(), entry.state))
            .collect();
        listed.sort_by(|a, b| a.0.cmp(&b.0));
        listed
    }

    /// Unload and unregister a command and its aliases.
    pub async fn remove(&self, name: &str) -> Result<(), CommandError> {
        let canonical = self
            .resolve(name)
            .await
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

        if self.get_state(&canonical).await == Some(CommandState::Ready) {
            self.unload(&canonical).await?;
        }

        let mut commands = self.commands.write().await;
        commands
            .entries
            .remove(&canonical)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        commands.aliases.retain(|_, target| *target != canonical);

        info!("Removed command /{}", canonical);
        Ok(())
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_manifest(
    manifest: &CommandManifest,
    mut named: NamedArgs,
) -> Result<NamedArgs, CommandError> {
    if let Some(unknown) = named
        .keys()
        .find(|key| manifest.named_arg_spec(key).is_none())
    {
        return Err(CommandError::UnknownArgument {
            command: manifest.name.clone(),
            name: unknown.clone(),
        });
    }

    for spec in &manifest.named_args {
        if named.contains_key(&spec.name) {
            continue;
        }
        match &spec.default_value {
            Some(default) => {
                named.insert(spec.name.clone(), default.clone());
            }
            None if spec.is_required => {
                return Err(CommandError::MissingArgument {
                    command: manifest.name.clone(),
                    name: spec.name.clone(),
                });
            }
            None => {}
        }
    }

    Ok(named)
}

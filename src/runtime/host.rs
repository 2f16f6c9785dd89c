//! The command host: wires collaborators together and runs command lines.

use crate::command::{
    parse_invocation, CommandError, CommandHandler, CommandRegistry, FetchCommand, COMMAND_NAME,
};
use crate::dispatch::Dispatcher;
use crate::runtime::HostConfig;
use crate::transport::{ExtrasApi, ExtrasClient, HttpTransport, Transport, TransportError};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Runs slash commands against a registry.
///
/// Every line produces a string: command output or an `Error: ...` message.
pub struct Host {
    config: HostConfig,
    registry: Arc<CommandRegistry>,
    dispatcher: Dispatcher,
}

impl Host {
    /// Create a host that performs real network I/O.
    pub fn new(config: HostConfig) -> Result<Self, TransportError> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.timeout())?);
        let mut extras = ExtrasClient::new(config.extras_url.clone(), transport.clone());
        if let Some(key) = &config.extras_api_key {
            extras = extras.with_api_key(key.clone());
        }
        Ok(Self::with_collaborators(config, transport, Arc::new(extras)))
    }

    /// Create a host with explicit collaborators.
    pub fn with_collaborators(
        config: HostConfig,
        transport: Arc<dyn Transport>,
        extras: Arc<dyn ExtrasApi>,
    ) -> Self {
        Self {
            config,
            registry: Arc::new(CommandRegistry::new()),
            dispatcher: Dispatcher::new(transport, extras),
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<CommandRegistry> {
        self.registry.clone()
    }

    /// Register an additional command.
    pub async fn register_command(
        &self,
        handler: Box<dyn CommandHandler>,
    ) -> Result<(), CommandError> {
        self.registry.register(handler).await
    }

    /// Register and load the fetch command.
    pub async fn install(&self) -> Result<(), CommandError> {
        self.register_command(Box::new(FetchCommand::new(self.dispatcher.clone())))
            .await?;
        self.registry.load(COMMAND_NAME).await
    }

    /// Run one command line.
    pub async fn run_line(&self, line: &str) -> String {
        let invocation = match parse_invocation(line) {
            Ok(invocation) => invocation,
            Err(e) => return format!("Error: {e}"),
        };

        if invocation.name == "help" {
            return self.help(&invocation.unnamed).await;
        }

        let invocation_id = generate_invocation_id();
        match self
            .registry
            .execute(
                &invocation.name,
                invocation.named,
                invocation.unnamed,
                &invocation_id,
            )
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!("/{} failed: {} [{}]", invocation.name, e, invocation_id);
                format!("Error: {e}")
            }
        }
    }

    async fn help(&self, topic: &str) -> String {
        let topic = topic.trim().trim_start_matches('/');
        if topic.is_empty() {
            let names: Vec<String> = self
                .registry
                .list()
                .await
                .into_iter()
                .map(|(name, aliases, _)| {
                    let mut entry = format!("/{name}");
                    for alias in aliases {
                        entry.push_str(&format!(" /{alias}"));
                    }
                    entry
                })
                .collect();
            return format!("Available commands: {}, /help", names.join(", "));
        }

        match self.registry.help(topic).await {
            Some(text) => text,
            None => format!("Error: {}", CommandError::UnknownCommand(topic.to_string())),
        }
    }

    /// Read command lines until EOF or `/exit`, writing one output per line.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Reading commands; /help lists them, /exit quits");
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "/exit" || line == "/quit" {
                debug!("exit requested");
                break;
            }

            let output = self.run_line(line).await;
            writer.write_all(output.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok(())
    }
}

/// Generate a unique invocation ID.
fn generate_invocation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{:x}", timestamp)
}

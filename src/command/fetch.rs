//! The `/theItGirlyFetch` command: maps named arguments onto the dispatcher.

use crate::command::handler::{CommandContext, CommandError, CommandHandler, NamedArgs};
use crate::command::manifest::{ArgumentSpec, CommandManifest};
use crate::dispatch::{DispatchResult, Dispatcher};
use async_trait::async_trait;
use tracing::{debug, info};

pub const COMMAND_NAME: &str = "theItGirlyFetch";
pub const COMMAND_ALIAS: &str = "itgfetch";

/// Slash command that performs a basic fetch or an Extras PUT.
///
/// Dispatch failures are rendered into the output string; the handler only
/// returns `Err` for framework problems.
pub struct FetchCommand {
    dispatcher: Dispatcher,
}

impl FetchCommand {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Metadata for the fetch command.
pub fn fetch_manifest() -> CommandManifest {
    CommandManifest::new(COMMAND_NAME)
        .alias(COMMAND_ALIAS)
        .named_arg(
            ArgumentSpec::named("mode", "Set fetch mode: 'basic' or 'extras'")
                .with_default("basic")
                .with_enum(["basic", "extras"]),
        )
        .named_arg(ArgumentSpec::named("url", "URL for basic fetch (GET/PUT/POST)"))
        .named_arg(
            ArgumentSpec::named("method", "HTTP method for basic fetch")
                .with_default("GET")
                .with_enum(["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"]),
        )
        .named_arg(ArgumentSpec::named("path", "Relative path for extras fetch"))
        .named_arg(ArgumentSpec::named("body", "JSON string for extras body data"))
        .unnamed_arg(ArgumentSpec::unnamed("Unused text argument"))
        .returns("JSON string result from the fetch call")
        .help(
            "/theItGirlyFetch mode=basic url=https://api.github.com/users/octocat\n\
             /theItGirlyFetch mode=extras path=/api/test body={\"msg\":\"Hello\"}",
        )
}

/// Text shown for a dispatch outcome: pretty JSON (a payload or an
/// `{"error": ...}` object), the usage hint, or `Error: ...` for bad input.
pub fn render(result: &DispatchResult) -> String {
    match result {
        Ok(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {e}"))
        }
        Err(e) => e.output(),
    }
}

#[async_trait]
impl CommandHandler for FetchCommand {
    async fn on_load(&mut self, ctx: &CommandContext) -> Result<(), CommandError> {
        info!("Extension loaded, /{} ready", ctx.command_name);
        Ok(())
    }

    async fn invoke(
        &self,
        args: NamedArgs,
        _unnamed: String,
        ctx: &CommandContext,
    ) -> Result<String, CommandError> {
        debug!("/{} invoked with {:?} [{}]", ctx.command_name, args, ctx.invocation_id);

        let result = self.dispatcher.dispatch_named(&args).await;
        Ok(render(&result))
    }

    async fn on_unload(&mut self, ctx: &CommandContext) -> Result<(), CommandError> {
        info!("Extension unloaded, /{} removed", ctx.command_name);
        Ok(())
    }

    fn manifest(&self) -> CommandManifest {
        fetch_manifest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{DispatchError, USAGE};
    use crate::http::{FetchRequest, FetchResponse};
    use crate::transport::{ExtrasApi, Transport, TransportError};
    use serde_json::json;
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send(&self, _request: FetchRequest) -> Result<FetchResponse, TransportError> {
            Err(TransportError::Connect("unreachable".to_string()))
        }
    }

    #[async_trait]
    impl ExtrasApi for Unreachable {
        fn api_url(&self) -> String {
            "http://localhost:5100".to_string()
        }

        async fn extras_fetch(
            &self,
            _request: FetchRequest,
        ) -> Result<FetchResponse, TransportError> {
            Err(TransportError::Timeout)
        }
    }

    fn command() -> FetchCommand {
        FetchCommand::new(Dispatcher::new(Arc::new(Unreachable), Arc::new(Unreachable)))
    }

    fn args(pairs: &[(&str, &str)]) -> NamedArgs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn render_pretty_prints_json() {
        assert_eq!(render(&Ok(json!({"id": 1}))), "{\n  \"id\": 1\n}");
    }

    #[test]
    fn render_errors_as_text() {
        let err = DispatchError::Validation("No 'url' provided for basic fetch".to_string());
        assert_eq!(render(&Err(err)), "Error: No 'url' provided for basic fetch");
    }

    #[test]
    fn manifest_declares_name_alias_and_defaults() {
        let manifest = fetch_manifest();
        assert_eq!(manifest.name, COMMAND_NAME);
        assert_eq!(manifest.aliases, vec![COMMAND_ALIAS.to_string()]);
        assert_eq!(
            manifest
                .named_arg_spec("mode")
                .and_then(|a| a.default_value.as_deref()),
            Some("basic")
        );
        assert!(manifest.named_arg_spec("body").is_some());
    }

    #[test]
    fn missing_url_is_reported_not_raised() {
        let out = tokio_test::block_on(command().invoke(
            args(&[("mode", "basic")]),
            String::new(),
            &CommandContext::new(COMMAND_NAME, "t1"),
        ))
        .unwrap();
        assert_eq!(out, "Error: No 'url' provided for basic fetch");
    }

    #[tokio::test]
    async fn unknown_mode_prints_usage() {
        let out = command()
            .invoke(
                args(&[("mode", "carrier-pigeon")]),
                String::new(),
                &CommandContext::new(COMMAND_NAME, "t2"),
            )
            .await
            .unwrap();
        assert_eq!(out, USAGE);
    }

    #[tokio::test]
    async fn transport_failure_is_rendered() {
        let out = command()
            .invoke(
                args(&[("mode", "extras"), ("path", "/api/test")]),
                String::new(),
                &CommandContext::new(COMMAND_NAME, "t3"),
            )
            .await
            .unwrap();
        assert_eq!(
            out,
            "{\n  \"error\": \"request to http://localhost:5100/api/test failed: \
             request timed out\"\n}"
        );
    }

    #[test]
    fn undeclared_argument_is_reported_not_raised() {
        let out = tokio_test::block_on(command().invoke(
            args(&[("url", "https://example.test"), ("colour", "red")]),
            String::new(),
            &CommandContext::new(COMMAND_NAME, "t4"),
        ))
        .unwrap();
        assert!(out.starts_with("Error: unknown field `colour`"), "{out}");
    }
}

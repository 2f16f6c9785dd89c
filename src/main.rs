//! itgfetch - run the fetch slash command from a terminal.
//!
//! With trailing words, runs them as one command and prints the output.
//! Without, reads commands from stdin, one per line.

use clap::Parser;
use itgfetch::command::COMMAND_NAME;
use itgfetch::runtime::DEFAULT_EXTRAS_URL;
use itgfetch::{Host, HostConfig};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "itgfetch",
    version,
    about = "Basic fetches and Extras proxy PUTs as a slash command"
)]
struct Cli {
    /// Base URL of the Extras proxy.
    #[arg(long, env = "ITGFETCH_EXTRAS_URL", default_value = DEFAULT_EXTRAS_URL)]
    extras_url: String,

    /// API key sent to the Extras proxy as a bearer token.
    #[arg(long, env = "ITGFETCH_EXTRAS_API_KEY")]
    extras_api_key: Option<String>,

    /// Request timeout in seconds (0 disables it).
    #[arg(long, env = "ITGFETCH_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Command to run, e.g. `mode=basic url=https://...` or `/help`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

/// Words that don't name a command are arguments to the fetch command.
fn command_line(words: &[String]) -> String {
    let joined = words.join(" ");
    if joined.starts_with('/') {
        joined
    } else {
        format!("/{COMMAND_NAME} {joined}")
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logs go to stderr so stdout carries only command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = HostConfig::new()
        .extras_url(cli.extras_url)
        .request_timeout(cli.timeout);
    if let Some(key) = cli.extras_api_key {
        config = config.extras_api_key(key);
    }

    let host = Host::new(config)?;
    host.install().await?;

    if cli.command.is_empty() {
        host.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
    } else {
        println!("{}", host.run_line(&command_line(&cli.command)).await);
    }

    Ok(())
}

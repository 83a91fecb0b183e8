//! # filemate CLI
//!
//! Terminal chat front-end for filemate - a conversational file manager agent.
//!
//! ## Usage
//!
//! - `filemate` - Start the interactive chat
//! - `filemate "list files in the current directory"` - Run a single command
//! - `filemate tools` - Show available tools
//!
//! Every file operation is confined to one scoped root directory, `./temp`
//! unless `--root` or the config file says otherwise.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod chat;
mod commands;
mod config;
mod credential;
mod output;

use commands::{chat_command, run_command, tools_command, DisplayOptions};
use config::CliConfigLoader;

/// filemate - chat with an agent that manages files in one directory
#[derive(Parser)]
#[command(name = "filemate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A conversational file manager agent written in Rust")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Protocol to use (groq, openai_compat)
    #[arg(long)]
    protocol: Option<String>,

    /// API key override
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Model name override
    #[arg(long)]
    model: Option<String>,

    /// Directory the agent may touch (default: ./temp)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Maximum number of think steps per turn
    #[arg(long)]
    max_steps: Option<usize>,

    /// Wall-clock limit per turn, in seconds
    #[arg(long)]
    turn_timeout: Option<u64>,

    /// Do not print the agent's intermediate steps
    #[arg(long)]
    hide_thoughts: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output mode (default is normal mode)
    #[arg(short = 'd', long = "debug")]
    debug_output: bool,

    /// The command to run (if provided, runs a single turn)
    task: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show available tools
    Tools,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(protocol) = &cli.protocol {
        loader = loader.with_protocol_override(protocol.clone());
    }

    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(model) = &cli.model {
        loader = loader.with_model_override(model.clone());
    }

    if let Some(root) = &cli.root {
        loader = loader.with_root_override(root.clone());
    }

    if let Some(max_steps) = cli.max_steps {
        loader = loader.with_max_steps_override(max_steps);
    }

    if let Some(secs) = cli.turn_timeout {
        loader = loader.with_turn_timeout_override(secs);
    }

    loader
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the chat clean unless asked for more
    filemate_core::init_tracing_with_debug(cli.verbose || cli.debug_output);

    let config_loader = build_config_loader(&cli);
    let display = DisplayOptions {
        show_thoughts: !cli.hide_thoughts,
        debug_output: cli.debug_output,
    };

    match (cli.task, cli.command) {
        (Some(task), None) => run_command(task, config_loader, display).await,
        (Some(_), Some(_)) => {
            tracing::error!("Cannot specify both a command and a subcommand");
            Ok(ExitCode::FAILURE)
        }
        (None, Some(Commands::Tools)) => tools_command().await,
        (None, None) => chat_command(config_loader, display).await,
    }
}

//! Single turn execution command

use super::{build_agent, DisplayOptions};
use crate::chat::print_entry;
use crate::config::CliConfigLoader;
use crate::credential::{ensure_api_key, print_missing_key_warning, Gate};
use anyhow::Result;
use filemate_core::{handle_turn, ChatSession, TurnOutcome};
use std::process::ExitCode;
use tracing::info;

/// Run one command through a fresh session and print the answer
pub async fn run_command(
    task: String,
    config_loader: CliConfigLoader,
    display: DisplayOptions,
) -> Result<ExitCode> {
    info!("Executing command: {}", task);

    let settings = match ensure_api_key(config_loader.load().await?)? {
        Gate::Open(settings) => settings,
        Gate::Closed => {
            print_missing_key_warning();
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut agent = build_agent(&settings, display)?;
    let mut session = ChatSession::new();

    let outcome = handle_turn(&mut session, &mut agent, &task).await;
    if let Some(entry) = session.transcript().last() {
        if !matches!(outcome, TurnOutcome::Ignored) {
            print_entry(entry);
        }
    }

    match outcome {
        TurnOutcome::Failed(_) => Ok(ExitCode::FAILURE),
        TurnOutcome::Ignored => {
            info!("Empty command, nothing to do");
            Ok(ExitCode::SUCCESS)
        }
        TurnOutcome::Answered(_) => Ok(ExitCode::SUCCESS),
    }
}

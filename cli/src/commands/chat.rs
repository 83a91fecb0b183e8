//! Interactive chat command

use super::{build_agent, DisplayOptions};
use crate::chat::{print_banner, run_chat};
use crate::config::CliConfigLoader;
use crate::credential::{ensure_api_key, print_missing_key_warning, Gate};
use anyhow::Result;
use std::process::ExitCode;

/// Start the chat: banner, credential gate, then the command loop
pub async fn chat_command(
    config_loader: CliConfigLoader,
    display: DisplayOptions,
) -> Result<ExitCode> {
    let settings = config_loader.load().await?;

    print_banner();

    let settings = match ensure_api_key(settings)? {
        Gate::Open(settings) => settings,
        Gate::Closed => {
            print_missing_key_warning();
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut agent = build_agent(&settings, display)?;
    run_chat(&mut agent).await?;

    Ok(ExitCode::SUCCESS)
}

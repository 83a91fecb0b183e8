//! CLI command implementations

pub mod chat;
pub mod run;
pub mod tools;

pub use chat::chat_command;
pub use run::run_command;
pub use tools::tools_command;

use crate::config::CliSettings;
use crate::output::{CliOutputConfig, CliOutputHandler};
use anyhow::{Context, Result};
use filemate_core::{AgentBuilder, AgentCore, OutputMode};

/// Display flags shared by the chat and run commands
#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions {
    pub show_thoughts: bool,
    pub debug_output: bool,
}

/// Build the agent once the credential gate has passed
pub(crate) fn build_agent(settings: &CliSettings, display: DisplayOptions) -> Result<AgentCore> {
    let llm_config = settings.resolve_llm()?;
    tracing::info!("Using protocol: {}", llm_config.protocol.as_str());
    tracing::info!("Using model: {}", llm_config.model);

    let mut builder = AgentBuilder::new(llm_config)
        .with_root_dir(settings.root_dir.clone())
        .with_system_prompt(settings.system_prompt.clone());
    if let Some(max_steps) = settings.max_steps {
        builder = builder.with_max_steps(max_steps);
    }
    if let Some(secs) = settings.turn_timeout_secs {
        builder = builder.with_turn_timeout(Some(secs));
    }
    if display.debug_output {
        builder = builder.with_output_mode(OutputMode::Debug);
    }

    let output = CliOutputHandler::new(CliOutputConfig {
        show_thoughts: display.show_thoughts,
    });

    builder.build_with_output(Box::new(output)).with_context(|| {
        format!(
            "Failed to set up the agent in {}",
            settings.root_dir.display()
        )
    })
}

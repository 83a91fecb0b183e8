//! Tools listing command

use anyhow::Result;
use filemate_core::ToolRegistry;
use std::process::ExitCode;
use tracing::info;

/// Show available tools; needs no credential
pub async fn tools_command() -> Result<ExitCode> {
    info!("Listing available tools");

    println!("🛠️  Available Tools\n");

    let registry = ToolRegistry::default();
    for name in registry.list_tools() {
        if let Some((tool_name, description)) = registry.get_tool_info(name) {
            println!("📦 {}", tool_name);
            let first_line = description.lines().next().unwrap_or(description);
            println!("   {}\n", first_line);
        }
    }

    println!("💡 Every file tool is confined to the scoped root directory (default: ./temp).");

    Ok(ExitCode::SUCCESS)
}

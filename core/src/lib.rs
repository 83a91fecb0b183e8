//! # filemate Core
//!
//! Core library for filemate - a conversational file manager agent.
//!
//! This library provides the agent loop, the tools it can call, and the chat
//! session that records each turn. Every file tool is confined to a single
//! scoped root directory.

// Core modules
pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod session;
pub mod tools;

// Re-export commonly used types
pub use agent::{Agent, AgentBuilder, AgentConfig, AgentCore, AgentExecution, OutputMode};
pub use config::{ApiKey, ModelParams, Protocol, ResolvedLlmConfig};
pub use error::{Error, Result};
pub use session::{handle_turn, ChatSession, Role, Transcript, TranscriptEntry, TurnOutcome};
pub use tools::{ScopedRoot, ToolRegistry};

/// Current version of the filemate-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the stderr subscriber: `debug` when asked for, `warn` otherwise
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

//! Agent core logic and execution engine

pub mod base;
pub mod config;
pub mod core;
pub mod execution;
pub mod parser;
pub mod prompt;
pub mod recovery;

#[cfg(test)]
pub(crate) mod testing;

pub use base::{Agent, AgentResult};
pub use config::{AgentBuilder, AgentConfig, OutputMode};
pub use core::AgentCore;
pub use execution::{AgentExecution, STOPPED_MESSAGE};
pub use parser::{parse_decision, ActionProtocol, Decision, ParseError};
pub use prompt::{build_system_prompt, FILE_MANAGER_SYSTEM_PROMPT};
pub use recovery::{ParseRecovery, RecoveryAction, RecoveryState};

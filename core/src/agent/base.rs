//! Base agent trait

use super::config::AgentConfig;
use super::execution::AgentExecution;
use crate::error::Result;
use async_trait::async_trait;

/// Result type for agent operations
pub type AgentResult<T> = Result<T>;

/// Base trait for all agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Handle one user utterance from scratch.
    ///
    /// Hitting a stop condition is not an error: it yields an execution with
    /// `success == false`. Errors are reserved for failures the turn cannot
    /// recover from, such as exhausted parse retries or a backend failure.
    async fn execute_task(&mut self, task: &str) -> AgentResult<AgentExecution>;

    /// Get the agent's configuration
    fn config(&self) -> &AgentConfig;

    /// Get the agent's name/type
    fn agent_type(&self) -> &str;
}

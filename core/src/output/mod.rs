//! Output abstraction for agent execution events
//!
//! The agent reports what it is doing through [`AgentOutput`]; the CLI
//! renders the events as the "agent thoughts" region, tests usually pass
//! [`NullOutput`].

use crate::tools::{ToolCall, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error type returned by output handlers
pub type OutputError = Box<dyn std::error::Error + Send + Sync>;

/// Null output handler that discards all events
pub struct NullOutput;

#[async_trait]
impl AgentOutput for NullOutput {
    async fn emit_event(&self, _event: AgentEvent) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Status of tool execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolExecutionStatus {
    Executing,
    Success,
    Error,
}

/// Tool execution snapshot sent with start and completion events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecutionInfo {
    /// Id of the tool call
    pub execution_id: String,
    /// Tool name, e.g. `write_file`
    pub tool_name: String,
    /// Tool arguments
    pub parameters: HashMap<String, serde_json::Value>,
    pub status: ToolExecutionStatus,
    /// Tool result once completed
    pub result: Option<ToolResult>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ToolExecutionInfo {
    pub fn from_call(
        tool_call: &ToolCall,
        status: ToolExecutionStatus,
        result: Option<&ToolResult>,
    ) -> Self {
        let parameters = if let serde_json::Value::Object(map) = &tool_call.parameters {
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        } else {
            let mut map = HashMap::new();
            map.insert("raw_parameters".to_string(), tool_call.parameters.clone());
            map
        };

        Self {
            execution_id: tool_call.id.clone(),
            tool_name: tool_call.name.clone(),
            parameters,
            status,
            result: result.cloned(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Token usage statistics accumulated over a run
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Context describing the run in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentExecutionContext {
    /// Agent identifier
    pub agent_id: String,
    /// The user utterance being handled
    pub task: String,
    /// Scoped root the tools act on
    pub root_dir: String,
    pub max_steps: usize,
    pub current_step: usize,
    pub execution_time: std::time::Duration,
    pub token_usage: TokenUsage,
}

/// Events emitted while the agent runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentEvent {
    ExecutionStarted {
        context: AgentExecutionContext,
    },
    ExecutionCompleted {
        context: AgentExecutionContext,
        success: bool,
        summary: String,
    },
    /// A think step is about to call the model
    StepStarted {
        step_number: usize,
        max_steps: usize,
    },
    /// Reasoning text the model produced alongside an action
    AgentThinking {
        step_number: usize,
        thinking: String,
    },
    ToolExecutionStarted {
        tool_info: ToolExecutionInfo,
    },
    ToolExecutionCompleted {
        tool_info: ToolExecutionInfo,
    },
    /// Emitted after each model call
    TokenUsageUpdated {
        token_usage: TokenUsage,
    },
    /// General message or log
    Message {
        level: MessageLevel,
        content: String,
    },
}

/// Message severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageLevel {
    Debug,
    Info,
    Normal,
    Warning,
    Error,
}

/// Abstract output interface for agent execution
#[async_trait]
pub trait AgentOutput: Send + Sync {
    /// Emit an agent event
    async fn emit_event(&self, event: AgentEvent) -> Result<(), OutputError>;

    /// Emit a message with specified level
    async fn emit_message(&self, level: MessageLevel, content: &str) -> Result<(), OutputError> {
        self.emit_event(AgentEvent::Message {
            level,
            content: content.to_string(),
        })
        .await
    }

    async fn debug(&self, content: &str) -> Result<(), OutputError> {
        self.emit_message(MessageLevel::Debug, content).await
    }

    async fn info(&self, content: &str) -> Result<(), OutputError> {
        self.emit_message(MessageLevel::Info, content).await
    }

    async fn warning(&self, content: &str) -> Result<(), OutputError> {
        self.emit_message(MessageLevel::Warning, content).await
    }

    async fn error(&self, content: &str) -> Result<(), OutputError> {
        self.emit_message(MessageLevel::Error, content).await
    }

    async fn normal(&self, content: &str) -> Result<(), OutputError> {
        self.emit_message(MessageLevel::Normal, content).await
    }

    /// Emit token usage update
    async fn emit_token_update(&self, token_usage: TokenUsage) -> Result<(), OutputError> {
        self.emit_event(AgentEvent::TokenUsageUpdated { token_usage })
            .await
    }

    /// Flush any buffered output
    async fn flush(&self) -> Result<(), OutputError> {
        Ok(())
    }
}

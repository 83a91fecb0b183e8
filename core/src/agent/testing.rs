//! Test doubles for driving the agent without a backend

use crate::error::{LlmError, Result};
use crate::llm::{ChatOptions, LlmClient, LlmMessage, LlmResponse, ToolDefinition};
use crate::output::{AgentEvent, AgentOutput, MessageLevel, OutputError, ToolExecutionStatus};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays canned assistant messages and records every request
pub struct ScriptedLlmClient {
    replies: Mutex<VecDeque<LlmMessage>>,
    requests: Mutex<Vec<Vec<LlmMessage>>>,
    delay: Option<Duration>,
}

impl ScriptedLlmClient {
    pub fn new(replies: Vec<LlmMessage>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<Vec<LlmMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn chat_completion(
        &self,
        messages: Vec<LlmMessage>,
        _tools: Option<Vec<ToolDefinition>>,
        _options: Option<ChatOptions>,
    ) -> Result<LlmResponse> {
        self.requests.lock().unwrap().push(messages);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let message = self.replies.lock().unwrap().pop_front().ok_or_else(|| {
            LlmError::ApiError {
                status: 503,
                message: "script exhausted".to_string(),
            }
        })?;

        Ok(LlmResponse {
            message,
            usage: None,
            model: "scripted".to_string(),
            finish_reason: None,
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn provider_name(&self) -> &str {
        "test"
    }
}

/// Collects emitted events; clones share the same buffer
#[derive(Clone, Default)]
pub struct RecordingOutput {
    events: Arc<Mutex<Vec<AgentEvent>>>,
}

impl RecordingOutput {
    pub fn events(&self) -> Vec<AgentEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn thoughts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AgentEvent::AgentThinking { thinking, .. } => Some(thinking),
                _ => None,
            })
            .collect()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AgentEvent::ToolExecutionStarted { tool_info } => Some(tool_info.tool_name),
                _ => None,
            })
            .collect()
    }

    pub fn tool_statuses(&self) -> Vec<ToolExecutionStatus> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AgentEvent::ToolExecutionCompleted { tool_info } => Some(tool_info.status),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AgentEvent::Message {
                    level: MessageLevel::Warning,
                    content,
                } => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn debug_messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AgentEvent::Message {
                    level: MessageLevel::Debug,
                    content,
                } => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn completed(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                AgentEvent::ExecutionCompleted { success, .. } => Some(success),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl AgentOutput for RecordingOutput {
    async fn emit_event(&self, event: AgentEvent) -> std::result::Result<(), OutputError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

//! AgentCore implementation

use super::config::{AgentConfig, OutputMode};
use super::parser::{parse_decision, ActionProtocol, Decision};
use super::prompt::build_system_prompt;
use super::recovery::{ParseRecovery, RecoveryAction};
use crate::agent::{Agent, AgentExecution, AgentResult};
use crate::error::{AgentError, Result};
use crate::llm::{ChatOptions, LlmClient, LlmMessage};
use crate::output::{
    AgentEvent, AgentExecutionContext, AgentOutput, TokenUsage, ToolExecutionInfo,
    ToolExecutionStatus,
};
use crate::tools::{ScopedRoot, ToolCall, ToolExecutor};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

const AGENT_ID: &str = "file_manager_agent";

/// How the think/act loop ended
enum LoopOutcome {
    Finished(String),
    Stopped,
}

/// The file manager agent: alternates model calls and tool calls until the
/// model gives a final answer or a stop condition fires.
pub struct AgentCore {
    config: AgentConfig,
    llm_client: Arc<dyn LlmClient>,
    tool_executor: ToolExecutor,
    root: Arc<ScopedRoot>,
    chat_options: ChatOptions,
    conversation_history: Vec<LlmMessage>,
    output: Box<dyn AgentOutput>,
    execution_context: Option<AgentExecutionContext>,
}

impl AgentCore {
    pub(crate) fn new(
        config: AgentConfig,
        llm_client: Arc<dyn LlmClient>,
        tool_executor: ToolExecutor,
        root: Arc<ScopedRoot>,
        output: Box<dyn AgentOutput>,
    ) -> Self {
        Self {
            config,
            llm_client,
            tool_executor,
            root,
            chat_options: ChatOptions::default(),
            conversation_history: Vec::new(),
            output,
            execution_context: None,
        }
    }

    /// Override sampling options sent with every model call
    pub fn with_chat_options(mut self, chat_options: ChatOptions) -> Self {
        self.chat_options = chat_options;
        self
    }

    /// The directory every tool is confined to
    pub fn root(&self) -> &ScopedRoot {
        &self.root
    }

    /// Names of the tools this agent can call
    pub fn tool_names(&self) -> Vec<&str> {
        self.tool_executor.list_tools()
    }

    /// Messages exchanged during the last run
    pub fn conversation_history(&self) -> &[LlmMessage] {
        &self.conversation_history
    }

    async fn emit(&self, event: AgentEvent) {
        if let Err(e) = self.output.emit_event(event).await {
            tracing::debug!("Failed to emit agent event: {}", e);
        }
    }

    /// Raw model replies and full tool output, only in debug mode
    async fn emit_detail(&self, content: String) {
        if self.config.output_mode != OutputMode::Debug {
            return;
        }
        if let Err(e) = self.output.debug(&content).await {
            tracing::debug!("Failed to emit debug detail: {}", e);
        }
    }

    fn steps_taken(&self) -> usize {
        self.execution_context
            .as_ref()
            .map(|ctx| ctx.current_step)
            .unwrap_or(0)
    }

    async fn run_loop(&mut self) -> Result<LoopOutcome> {
        let mut recovery = ParseRecovery::new(self.config.max_parse_retries);
        let tool_definitions = self.tool_executor.get_tool_definitions();

        for step in 1..=self.config.max_steps {
            if let Some(ctx) = &mut self.execution_context {
                ctx.current_step = step;
            }
            self.emit(AgentEvent::StepStarted {
                step_number: step,
                max_steps: self.config.max_steps,
            })
            .await;

            let response = match self
                .llm_client
                .chat_completion(
                    self.conversation_history.clone(),
                    Some(tool_definitions.clone()),
                    Some(self.chat_options.clone()),
                )
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!("LLM request failed for step {}: {}", step, e);
                    return Err(e);
                }
            };

            if let Some(usage) = &response.usage {
                if let Some(ctx) = &mut self.execution_context {
                    ctx.token_usage.input_tokens += usage.prompt_tokens;
                    ctx.token_usage.output_tokens += usage.completion_tokens;
                    ctx.token_usage.total_tokens += usage.total_tokens;
                    let token_usage = ctx.token_usage.clone();
                    self.emit(AgentEvent::TokenUsageUpdated { token_usage }).await;
                }
            }

            let message = response.message;
            let raw_reply = message
                .get_text()
                .unwrap_or_else(|| serde_json::to_string(&message.content).unwrap_or_default());
            self.emit_detail(format!("Model reply (step {}):\n{}", step, raw_reply))
                .await;

            match parse_decision(&message, &self.tool_executor) {
                Ok(Decision::Finish(answer)) => {
                    recovery.record_success();
                    self.conversation_history.push(message);
                    return Ok(LoopOutcome::Finished(answer));
                }
                Ok(Decision::Act {
                    thought,
                    calls,
                    protocol,
                }) => {
                    recovery.record_success();
                    if let Some(thinking) = thought {
                        self.emit(AgentEvent::AgentThinking {
                            step_number: step,
                            thinking,
                        })
                        .await;
                    }
                    self.conversation_history.push(message);
                    for call in calls {
                        self.act(call, protocol).await;
                    }
                }
                Err(parse_error) => {
                    tracing::warn!("Malformed model output at step {}: {}", step, parse_error);
                    match recovery.record_failure(parse_error) {
                        RecoveryAction::Retry { attempt, feedback } => {
                            let notice = format!(
                                "Could not parse the model response (attempt {} of {}), asking again",
                                attempt, self.config.max_parse_retries
                            );
                            if let Err(e) = self.output.warning(&notice).await {
                                tracing::debug!("Failed to emit warning: {}", e);
                            }
                            if let Some(text) = message.get_text().filter(|t| !t.trim().is_empty())
                            {
                                self.conversation_history.push(LlmMessage::assistant(text));
                            }
                            self.conversation_history.push(LlmMessage::user(feedback));
                        }
                        RecoveryAction::GiveUp(error) => return Err(error.into()),
                    }
                }
            }
        }

        Ok(LoopOutcome::Stopped)
    }

    /// Run one tool call and feed its observation back to the model
    async fn act(&mut self, call: ToolCall, protocol: ActionProtocol) {
        self.emit(AgentEvent::ToolExecutionStarted {
            tool_info: ToolExecutionInfo::from_call(&call, ToolExecutionStatus::Executing, None),
        })
        .await;

        let result = self.tool_executor.execute(call.clone()).await;

        let status = if result.success {
            ToolExecutionStatus::Success
        } else {
            ToolExecutionStatus::Error
        };
        tracing::debug!(
            "Tool {} finished with {:?} in {:?}",
            call.name,
            status,
            result.duration_ms
        );
        self.emit(AgentEvent::ToolExecutionCompleted {
            tool_info: ToolExecutionInfo::from_call(&call, status, Some(&result)),
        })
        .await;
        self.emit_detail(format!("Full output of {}:\n{}", call.name, result.content))
            .await;

        let observation = match protocol {
            ActionProtocol::Native => {
                LlmMessage::tool_result(call.id, result.content, !result.success)
            }
            ActionProtocol::Text => LlmMessage::user(format!("Observation: {}", result.content)),
        };
        self.conversation_history.push(observation);
    }
}

#[async_trait]
impl Agent for AgentCore {
    async fn execute_task(&mut self, task: &str) -> AgentResult<AgentExecution> {
        if task.trim().is_empty() {
            return Err(AgentError::InvalidTask {
                message: "the request is empty".to_string(),
            }
            .into());
        }

        let start_time = Instant::now();
        tracing::info!("Agent run started: {}", task);

        self.conversation_history.clear();
        self.execution_context = Some(AgentExecutionContext {
            agent_id: AGENT_ID.to_string(),
            task: task.to_string(),
            root_dir: self.root.path().display().to_string(),
            max_steps: self.config.max_steps,
            current_step: 0,
            execution_time: Duration::from_secs(0),
            token_usage: TokenUsage::default(),
        });
        if let Some(context) = self.execution_context.clone() {
            self.emit(AgentEvent::ExecutionStarted { context }).await;
        }

        let system_prompt =
            build_system_prompt(self.config.system_prompt.as_deref(), &self.tool_executor)?;
        self.conversation_history.push(LlmMessage::system(system_prompt));
        self.conversation_history.push(LlmMessage::user(task));

        let outcome = match self.config.turn_timeout_secs {
            Some(secs) => {
                match tokio::time::timeout(Duration::from_secs(secs), self.run_loop()).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        tracing::warn!("Agent run timed out after {}s", secs);
                        Ok(LoopOutcome::Stopped)
                    }
                }
            }
            None => self.run_loop().await,
        };

        let elapsed = start_time.elapsed();
        let steps = self.steps_taken();
        if let Some(ctx) = &mut self.execution_context {
            ctx.execution_time = elapsed;
        }

        let execution = match outcome {
            Ok(LoopOutcome::Finished(answer)) => {
                AgentExecution::success(answer, steps, elapsed.as_millis() as u64)
            }
            Ok(LoopOutcome::Stopped) => {
                tracing::warn!("Agent stopped after {} steps", steps);
                AgentExecution::stopped(steps, elapsed.as_millis() as u64)
            }
            Err(e) => {
                if let Err(emit_err) = self.output.error(&e.to_string()).await {
                    tracing::debug!("Failed to emit error: {}", emit_err);
                }
                if let Some(context) = self.execution_context.clone() {
                    self.emit(AgentEvent::ExecutionCompleted {
                        context,
                        success: false,
                        summary: e.to_string(),
                    })
                    .await;
                }
                return Err(e);
            }
        };

        if let Some(context) = self.execution_context.clone() {
            self.emit(AgentEvent::ExecutionCompleted {
                context,
                success: execution.success,
                summary: execution.final_result.clone(),
            })
            .await;
        }
        if let Err(e) = self.output.flush().await {
            tracing::debug!("Failed to flush output: {}", e);
        }

        tracing::info!(
            "Agent run finished in {} ms after {} steps",
            execution.duration_ms,
            execution.steps_executed
        );
        Ok(execution)
    }

    fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn agent_type(&self) -> &str {
        AGENT_ID
    }
}

//! CLI output handler implementation
//!
//! Renders agent events as the indented "🤔 Agent thoughts" region that sits
//! between a user turn and the final answer.

use super::formatters::{indent, ToolFormatter};
use async_trait::async_trait;
use colored::Colorize;
use console::Term;
use filemate_core::output::{
    AgentEvent, AgentOutput, MessageLevel, OutputError, ToolExecutionInfo,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub const THOUGHTS_HEADER: &str = "🤔 Agent thoughts";

/// CLI output configuration
#[derive(Debug, Clone)]
pub struct CliOutputConfig {
    /// Print intermediate steps; the spinner is shown either way
    pub show_thoughts: bool,
}

impl Default for CliOutputConfig {
    fn default() -> Self {
        Self {
            show_thoughts: true,
        }
    }
}

/// CLI output handler that formats events for terminal display
pub struct CliOutputHandler {
    config: CliOutputConfig,
    tool_formatter: ToolFormatter,
    spinner: Mutex<Option<ProgressBar>>,
    header_shown: AtomicBool,
}

impl CliOutputHandler {
    /// Create a new CLI output handler
    pub fn new(config: CliOutputConfig) -> Self {
        Self {
            config,
            tool_formatter: ToolFormatter::new(),
            spinner: Mutex::new(None),
            header_shown: AtomicBool::new(false),
        }
    }

    fn print_header(&self) {
        if !self.header_shown.swap(true, Ordering::SeqCst) {
            println!("{}", THOUGHTS_HEADER.bold().dimmed());
        }
    }

    async fn start_spinner(&self, message: String) {
        let mut spinner = self.spinner.lock().await;
        if let Some(old) = spinner.take() {
            old.finish_and_clear();
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("    {spinner:.cyan} {msg:.dim}") {
            bar.set_style(style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));
        *spinner = Some(bar);
    }

    async fn stop_spinner(&self) {
        if let Some(bar) = self.spinner.lock().await.take() {
            bar.finish_and_clear();
        }
    }

    fn print_thought(&self, text: &str) {
        if self.config.show_thoughts {
            self.print_header();
            println!("{}", indent(text).dimmed());
        }
    }

    fn print_tool(&self, tool_info: &ToolExecutionInfo, replace_previous: bool) {
        if !self.config.show_thoughts {
            return;
        }
        self.print_header();

        let term = Term::stdout();
        if replace_previous && term.is_term() {
            let _ = term.clear_last_lines(1);
        }
        println!(
            "{}",
            indent(&self.tool_formatter.format_tool_status(tool_info))
        );
        if let Some(result) = self.tool_formatter.format_tool_result(tool_info) {
            println!("{}", indent(&result));
        }
    }
}

#[async_trait]
impl AgentOutput for CliOutputHandler {
    async fn emit_event(&self, event: AgentEvent) -> Result<(), OutputError> {
        match event {
            AgentEvent::ExecutionStarted { context } => {
                debug!("Task: {}", context.task);
                debug!("Scoped root: {}", context.root_dir);
                self.header_shown.store(false, Ordering::SeqCst);
            }

            AgentEvent::StepStarted {
                step_number,
                max_steps,
            } => {
                debug!("Step {}/{}", step_number, max_steps);
                if self.config.show_thoughts {
                    self.print_header();
                }
                self.start_spinner(format!("Thinking (step {}/{})", step_number, max_steps))
                    .await;
            }

            AgentEvent::AgentThinking { thinking, .. } => {
                self.stop_spinner().await;
                self.print_thought(&thinking);
            }

            AgentEvent::ToolExecutionStarted { tool_info } => {
                self.stop_spinner().await;
                self.print_tool(&tool_info, false);
            }

            AgentEvent::ToolExecutionCompleted { tool_info } => {
                self.print_tool(&tool_info, true);
            }

            AgentEvent::TokenUsageUpdated { token_usage } => {
                debug!(
                    "Tokens so far: {} input + {} output = {} total",
                    token_usage.input_tokens, token_usage.output_tokens, token_usage.total_tokens
                );
            }

            AgentEvent::ExecutionCompleted {
                context, success, ..
            } => {
                self.stop_spinner().await;
                debug!("Run finished, success: {}", success);

                if self.config.show_thoughts && self.header_shown.load(Ordering::SeqCst) {
                    let mut stats = format!(
                        "📈 {} steps · ⏱️  {:.2}s",
                        context.current_step,
                        context.execution_time.as_secs_f64()
                    );
                    let usage = &context.token_usage;
                    if usage.total_tokens > 0 {
                        stats.push_str(&format!(" · 🪙 {} tokens", usage.total_tokens));
                    }
                    println!("{}", indent(&stats).dimmed());
                }
            }

            AgentEvent::Message { level, content } => match level {
                // Only sent when the agent runs in debug mode
                MessageLevel::Debug => {
                    debug!("{}", content);
                    self.stop_spinner().await;
                    self.print_header();
                    println!("{}", indent(&format!("🔍 {}", content)).dimmed());
                }
                MessageLevel::Info => info!("{}", content),
                MessageLevel::Normal => {
                    self.stop_spinner().await;
                    println!("{}", content);
                }
                MessageLevel::Warning => {
                    warn!("{}", content);
                    if self.config.show_thoughts {
                        self.stop_spinner().await;
                        self.print_header();
                        println!("{}", indent(&format!("⚠️  {}", content)).yellow());
                    }
                }
                // The session shows the failure as an error turn
                MessageLevel::Error => {
                    self.stop_spinner().await;
                    error!("{}", content);
                }
            },
        }

        Ok(())
    }

    async fn flush(&self) -> Result<(), OutputError> {
        use std::io::Write;
        self.stop_spinner().await;
        std::io::stdout().flush().map_err(|e| e.into())
    }
}

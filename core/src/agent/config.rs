//! Agent configuration structures

use crate::config::ResolvedLlmConfig;
use crate::error::Result;
use crate::llm::{ChatOptions, LlmClient};
use crate::output::{AgentOutput, NullOutput};
use crate::tools::{ScopedRoot, ToolContext, ToolRegistry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Output mode for the agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum OutputMode {
    /// Debug mode with detailed logging and verbose output
    Debug,
    /// Normal mode with clean, user-friendly output
    #[default]
    Normal,
}

/// Configuration for an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of think steps per run
    pub max_steps: usize,

    /// Consecutive malformed responses tolerated before the run fails
    #[serde(default = "default_max_parse_retries")]
    pub max_parse_retries: usize,

    /// Wall-clock limit per run; `None` disables it
    #[serde(default = "default_turn_timeout_secs")]
    pub turn_timeout_secs: Option<u64>,

    /// List of tools available to this agent
    pub tools: Vec<String>,

    /// Output mode for the agent (debug or normal)
    #[serde(default)]
    pub output_mode: OutputMode,

    /// Custom role description for the system prompt.
    /// If not provided, the default file manager prompt is used.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_max_parse_retries() -> usize {
    3
}

fn default_turn_timeout_secs() -> Option<u64> {
    Some(300)
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 15,
            max_parse_retries: default_max_parse_retries(),
            turn_timeout_secs: default_turn_timeout_secs(),
            tools: ToolRegistry::default()
                .list_tools()
                .into_iter()
                .map(str::to_string)
                .collect(),
            output_mode: OutputMode::default(),
            system_prompt: None,
        }
    }
}

/// Where the LLM client comes from
enum LlmSource {
    Config(ResolvedLlmConfig),
    Client(Arc<dyn LlmClient>),
}

/// Builder for creating agents
pub struct AgentBuilder {
    llm: LlmSource,
    agent_config: AgentConfig,
    root_dir: PathBuf,
}

impl AgentBuilder {
    /// Create a new agent builder with LLM configuration
    pub fn new(llm_config: ResolvedLlmConfig) -> Self {
        Self::from_source(LlmSource::Config(llm_config))
    }

    /// Create a builder around an existing client
    pub fn with_llm_client(client: Arc<dyn LlmClient>) -> Self {
        Self::from_source(LlmSource::Client(client))
    }

    fn from_source(llm: LlmSource) -> Self {
        Self {
            llm,
            agent_config: AgentConfig::default(),
            root_dir: PathBuf::from("temp"),
        }
    }

    /// Set maximum steps
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.agent_config.max_steps = max_steps;
        self
    }

    /// Set the per-run timeout in seconds
    pub fn with_turn_timeout(mut self, turn_timeout_secs: Option<u64>) -> Self {
        self.agent_config.turn_timeout_secs = turn_timeout_secs;
        self
    }

    /// Set output mode
    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.agent_config.output_mode = output_mode;
        self
    }

    /// Set system prompt
    pub fn with_system_prompt(mut self, system_prompt: Option<String>) -> Self {
        self.agent_config.system_prompt = system_prompt;
        self
    }

    /// Set the scoped root directory; it is created if missing
    pub fn with_root_dir<P: Into<PathBuf>>(mut self, root_dir: P) -> Self {
        self.root_dir = root_dir.into();
        self
    }

    /// Build the agent with the given output handler
    pub fn build_with_output(self, output: Box<dyn AgentOutput>) -> Result<super::AgentCore> {
        let (llm_client, chat_options) = match self.llm {
            LlmSource::Config(config) => (
                crate::llm::create_client(&config)?,
                ChatOptions::from(&config.params),
            ),
            LlmSource::Client(client) => (client, ChatOptions::default()),
        };

        let root = ScopedRoot::create(&self.root_dir)?;
        tracing::info!("Scoped root directory: {}", root.path().display());

        let ctx = ToolContext::new(root);
        let tool_executor =
            ToolRegistry::default().create_executor(&self.agent_config.tools, &ctx);

        Ok(super::AgentCore::new(
            self.agent_config,
            llm_client,
            tool_executor,
            ctx.root,
            output,
        )
        .with_chat_options(chat_options))
    }

    /// Build the agent with null output
    pub fn build(self) -> Result<super::AgentCore> {
        self.build_with_output(Box::new(NullOutput))
    }
}

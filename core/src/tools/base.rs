//! Base tool traits and structures

use crate::error::{Result, ToolError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Trait for all tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the name of the tool
    fn name(&self) -> &str;

    /// Get the description of the tool
    fn description(&self) -> &str;

    /// Get the JSON schema for the tool's parameters
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given parameters
    async fn execute(&self, call: ToolCall) -> Result<ToolResult>;

    /// Get examples of how to use this tool
    fn examples(&self) -> Vec<ToolExample> {
        Vec::new()
    }
}

/// A call to a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Parameters to pass to the tool
    pub parameters: serde_json::Value,
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this is a result for
    pub tool_call_id: String,

    /// Whether the execution was successful
    pub success: bool,

    /// Result content
    pub content: String,

    /// Execution duration in milliseconds
    pub duration_ms: Option<u64>,
}

/// Example usage of a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExample {
    /// Description of what this example does
    pub description: String,

    /// Example parameters
    pub parameters: serde_json::Value,

    /// Expected result description
    pub expected_result: String,
}

/// Tool executor that manages tool execution
pub struct ToolExecutor {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new<S: Into<String>>(name: S, parameters: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            parameters,
        }
    }

    /// Create a tool call that answers a specific backend-issued id
    pub fn with_id<I: Into<String>, N: Into<String>>(
        id: I,
        name: N,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parameters,
        }
    }

    /// Get a parameter value by key
    pub fn get_parameter<T>(&self, key: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = self
            .parameters
            .get(key)
            .ok_or_else(|| ToolError::InvalidParameters {
                message: format!("Missing parameter: {}", key),
            })?;

        serde_json::from_value(value.clone()).map_err(|_| {
            ToolError::InvalidParameters {
                message: format!("Invalid parameter type for: {}", key),
            }
            .into()
        })
    }

    /// Get a parameter value by key with a default
    pub fn get_parameter_or<T>(&self, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de> + Clone,
    {
        self.get_parameter(key).unwrap_or(default)
    }
}

impl ToolResult {
    /// Create a successful result
    pub fn success<I: Into<String>, C: Into<String>>(tool_call_id: I, content: C) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            success: true,
            content: content.into(),
            duration_ms: None,
        }
    }

    /// Create an error result
    pub fn error<I: Into<String>, E: Into<String>>(tool_call_id: I, error: E) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            success: false,
            content: format!("Error: {}", error.into()),
            duration_ms: None,
        }
    }

    /// Set execution duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

impl ToolExecutor {
    /// Create a new tool executor
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// List all available tools, sorted by name
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Iterate over registered tools, sorted by name
    pub fn tools(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.values().map(|t| t.as_ref())
    }

    /// Map a bare string input onto the tool's first required parameter, or
    /// its only parameter when nothing is required.
    ///
    /// Text-protocol models often send `"action_input": "notes.txt"` instead of
    /// an object; anything that is already an object is returned unchanged.
    pub fn normalize_input(&self, name: &str, input: serde_json::Value) -> serde_json::Value {
        let serde_json::Value::String(text) = input else {
            return input;
        };

        let target = self.get_tool(name).and_then(|tool| {
            let schema = tool.parameters_schema();
            let first_required = schema
                .get("required")
                .and_then(|r| r.as_array())
                .and_then(|r| r.first())
                .and_then(|v| v.as_str())
                .map(str::to_string);

            first_required.or_else(|| {
                schema
                    .get("properties")
                    .and_then(|p| p.as_object())
                    .filter(|p| p.len() == 1)
                    .and_then(|p| p.keys().next().cloned())
            })
        });

        match target {
            Some(key) => {
                let mut map = serde_json::Map::new();
                map.insert(key, serde_json::Value::String(text));
                serde_json::Value::Object(map)
            }
            None => serde_json::Value::String(text),
        }
    }

    /// Execute a tool call
    ///
    /// Unknown tools and tool failures both come back as error results so the
    /// agent can observe them and pick another action.
    pub async fn execute(&self, call: ToolCall) -> ToolResult {
        let Some(tool) = self.get_tool(&call.name) else {
            tracing::warn!("Agent requested unknown tool: {}", call.name);
            return ToolResult::error(
                call.id.clone(),
                format!(
                    "{} is not a valid tool, try one of [{}].",
                    call.name,
                    self.list_tools().join(", ")
                ),
            );
        };

        let start_time = std::time::Instant::now();
        let call_id = call.id.clone();
        let result = tool.execute(call).await;
        let duration = start_time.elapsed().as_millis() as u64;

        match result {
            Ok(mut result) => {
                result.duration_ms = Some(duration);
                result
            }
            Err(e) => ToolResult::error(call_id, e.to_string()).with_duration(duration),
        }
    }

    /// Get tool definitions for LLM function calling
    pub fn get_tool_definitions(&self) -> Vec<crate::llm::ToolDefinition> {
        self.tools
            .values()
            .map(|tool| crate::llm::ToolDefinition {
                tool_type: "function".to_string(),
                function: crate::llm::FunctionDefinition {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    parameters: tool.parameters_schema(),
                },
            })
            .collect()
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the message back"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            json!({
                "type": "object",
                "properties": {"message": {"type": "string"}},
                "required": ["message"]
            })
        }

        async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
            let message: String = call.get_parameter("message")?;
            Ok(ToolResult::success(call.id, message))
        }
    }

    fn executor() -> ToolExecutor {
        let mut executor = ToolExecutor::new();
        executor.register_tool(Box::new(EchoTool));
        executor
    }

    #[tokio::test]
    async fn test_execute_known_tool() {
        let result = executor()
            .execute(ToolCall::new("echo", json!({"message": "hi"})))
            .await;
        assert!(result.success);
        assert_eq!(result.content, "hi");
        assert!(result.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_unknown_tool_becomes_error_result() {
        let result = executor()
            .execute(ToolCall::new("rm_rf", json!({})))
            .await;
        assert!(!result.success);
        assert_eq!(
            result.content,
            "Error: rm_rf is not a valid tool, try one of [echo]."
        );
    }

    #[tokio::test]
    async fn test_missing_parameter_becomes_error_result() {
        let result = executor().execute(ToolCall::new("echo", json!({}))).await;
        assert!(!result.success);
        assert!(result.content.contains("Missing parameter: message"));
    }

    #[test]
    fn test_normalize_string_input() {
        let executor = executor();
        assert_eq!(
            executor.normalize_input("echo", json!("hello")),
            json!({"message": "hello"})
        );
        assert_eq!(
            executor.normalize_input("echo", json!({"message": "x"})),
            json!({"message": "x"})
        );
        assert_eq!(executor.normalize_input("nope", json!("x")), json!("x"));
    }
}

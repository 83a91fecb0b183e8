//! Turns an assistant message into the agent's next decision
//!
//! Models answer either with native tool calls or with a fenced JSON action
//! blob in their text (`{"action": ..., "action_input": ...}`). Anything else
//! that is non-empty text is taken as the final answer.

use crate::llm::{ContentBlock, LlmMessage};
use crate::tools::{ToolCall, ToolExecutor};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Action name that ends the run in the text protocol
pub const FINAL_ANSWER_ACTION: &str = "Final Answer";

const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// How the model expressed its actions; observations are fed back the same way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionProtocol {
    /// Backend tool calls; results go back as tool messages
    Native,
    /// JSON blob in text; results go back as an `Observation:` user message
    Text,
}

/// What the agent does next
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Act {
        /// Reasoning text that accompanied the action, if any
        thought: Option<String>,
        calls: Vec<ToolCall>,
        protocol: ActionProtocol,
    },
    Finish(String),
}

/// Malformed model output
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("the response was empty")]
    EmptyMessage,

    #[error("could not parse the action blob as JSON: {0}")]
    InvalidActionBlob(String),

    #[error("the action blob has no \"action\" field")]
    MissingAction,

    #[error("arguments for tool {tool} are not a JSON object")]
    NonObjectArguments { tool: String },

    #[error("found \"Action:\" but no ```json action blob")]
    ActionWithoutBlob,
}

fn action_blob_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").ok())
        .as_ref()
}

/// Parse one assistant message into a [`Decision`].
///
/// `tools` is used to map a bare string `action_input` onto the tool's
/// parameter object.
pub fn parse_decision(
    message: &LlmMessage,
    tools: &ToolExecutor,
) -> Result<Decision, ParseError> {
    let text = message.get_text().unwrap_or_default();
    let thought = non_empty(&text);

    if message.has_tool_use() {
        return parse_native_calls(message, thought);
    }

    if text.trim().is_empty() {
        return Err(ParseError::EmptyMessage);
    }

    if let Some(captures) = action_blob_regex().and_then(|re| re.captures(&text)) {
        let blob = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let before = text[..captures.get(0).map(|m| m.start()).unwrap_or(0)].to_string();
        return parse_action_blob(blob, &before, tools);
    }

    if let Some(idx) = text.find(FINAL_ANSWER_MARKER) {
        let answer = text[idx + FINAL_ANSWER_MARKER.len()..].trim();
        if answer.is_empty() {
            return Err(ParseError::EmptyMessage);
        }
        return Ok(Decision::Finish(answer.to_string()));
    }

    if text.contains("Action:") {
        return Err(ParseError::ActionWithoutBlob);
    }

    Ok(Decision::Finish(text.trim().to_string()))
}

fn parse_native_calls(message: &LlmMessage, thought: Option<String>) -> Result<Decision, ParseError> {
    let mut calls = Vec::new();

    for block in message.get_tool_uses() {
        if let ContentBlock::ToolUse { id, name, input } = block {
            if !input.is_object() {
                return Err(ParseError::NonObjectArguments { tool: name.clone() });
            }
            calls.push(ToolCall::with_id(id.clone(), name.clone(), input.clone()));
        }
    }

    Ok(Decision::Act {
        thought,
        calls,
        protocol: ActionProtocol::Native,
    })
}

fn parse_action_blob(
    blob: &str,
    before: &str,
    tools: &ToolExecutor,
) -> Result<Decision, ParseError> {
    let value: Value =
        serde_json::from_str(blob).map_err(|e| ParseError::InvalidActionBlob(e.to_string()))?;

    let action = value
        .get("action")
        .and_then(|a| a.as_str())
        .ok_or(ParseError::MissingAction)?;
    let input = value.get("action_input").cloned().unwrap_or(Value::Null);

    if action == FINAL_ANSWER_ACTION {
        let answer = match input {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        return Ok(Decision::Finish(answer));
    }

    let parameters = match tools.normalize_input(action, input) {
        Value::Null => Value::Object(serde_json::Map::new()),
        obj @ Value::Object(_) => obj,
        _ => {
            return Err(ParseError::NonObjectArguments {
                tool: action.to_string(),
            })
        }
    };

    let thought = before
        .trim()
        .trim_start_matches("Thought:")
        .trim()
        .to_string();

    Ok(Decision::Act {
        thought: non_empty(&thought),
        calls: vec![ToolCall::new(action, parameters)],
        protocol: ActionProtocol::Text,
    })
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MessageContent, MessageRole};
    use crate::tools::{ScopedRoot, ToolContext, ToolRegistry};
    use serde_json::json;
    use tempfile::TempDir;

    fn executor() -> (TempDir, ToolExecutor) {
        let dir = TempDir::new().unwrap();
        let ctx = ToolContext::new(ScopedRoot::open(dir.path()).unwrap());
        let executor = ToolRegistry::default().create_executor_with_all(&ctx);
        (dir, executor)
    }

    fn native(blocks: Vec<ContentBlock>) -> LlmMessage {
        LlmMessage {
            role: MessageRole::Assistant,
            content: MessageContent::MultiModal(blocks),
        }
    }

    #[test]
    fn test_native_tool_calls() {
        let (_dir, tools) = executor();
        let message = native(vec![
            ContentBlock::Text {
                text: "Let me look.".to_string(),
            },
            ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "list_directory".to_string(),
                input: json!({}),
            },
        ]);

        match parse_decision(&message, &tools).unwrap() {
            Decision::Act {
                thought,
                calls,
                protocol,
            } => {
                assert_eq!(thought.as_deref(), Some("Let me look."));
                assert_eq!(protocol, ActionProtocol::Native);
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].id, "call_1");
                assert_eq!(calls[0].name, "list_directory");
            }
            other => panic!("expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_native_string_arguments_are_malformed() {
        let (_dir, tools) = executor();
        let message = native(vec![ContentBlock::ToolUse {
            id: "call_1".to_string(),
            name: "read_file".to_string(),
            input: json!("{not json"),
        }]);

        assert_eq!(
            parse_decision(&message, &tools),
            Err(ParseError::NonObjectArguments {
                tool: "read_file".to_string()
            })
        );
    }

    #[test]
    fn test_json_blob_action() {
        let (_dir, tools) = executor();
        let text = "Thought: I should read it\n```json\n{\"action\": \"read_file\", \"action_input\": {\"file_path\": \"a.txt\"}}\n```";

        match parse_decision(&LlmMessage::assistant(text), &tools).unwrap() {
            Decision::Act {
                thought,
                calls,
                protocol,
            } => {
                assert_eq!(thought.as_deref(), Some("I should read it"));
                assert_eq!(protocol, ActionProtocol::Text);
                assert_eq!(calls[0].name, "read_file");
                assert_eq!(calls[0].parameters, json!({"file_path": "a.txt"}));
            }
            other => panic!("expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_json_blob_string_input_is_normalized() {
        let (_dir, tools) = executor();
        let text = "```\n{\"action\": \"make_formatted_text\", \"action_input\": \"a\\\\nb\"}\n```";

        match parse_decision(&LlmMessage::assistant(text), &tools).unwrap() {
            Decision::Act { calls, .. } => {
                assert_eq!(calls[0].parameters, json!({"text": "a\\nb"}));
            }
            other => panic!("expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_json_blob_final_answer() {
        let (_dir, tools) = executor();
        let text = "```json\n{\"action\": \"Final Answer\", \"action_input\": \"Done.\"}\n```";
        assert_eq!(
            parse_decision(&LlmMessage::assistant(text), &tools),
            Ok(Decision::Finish("Done.".to_string()))
        );
    }

    #[test]
    fn test_final_answer_marker_and_plain_text() {
        let (_dir, tools) = executor();
        assert_eq!(
            parse_decision(
                &LlmMessage::assistant("Thought: easy\nFinal Answer: There are 2 files."),
                &tools
            ),
            Ok(Decision::Finish("There are 2 files.".to_string()))
        );
        assert_eq!(
            parse_decision(&LlmMessage::assistant("  Hello there!  "), &tools),
            Ok(Decision::Finish("Hello there!".to_string()))
        );
    }

    #[test]
    fn test_malformed_outputs() {
        let (_dir, tools) = executor();

        assert_eq!(
            parse_decision(&LlmMessage::assistant("   "), &tools),
            Err(ParseError::EmptyMessage)
        );
        assert!(matches!(
            parse_decision(&LlmMessage::assistant("```json\n{\"action\": }\n```"), &tools),
            Err(ParseError::InvalidActionBlob(_))
        ));
        assert_eq!(
            parse_decision(
                &LlmMessage::assistant("```json\n{\"action_input\": \"x\"}\n```"),
                &tools
            ),
            Err(ParseError::MissingAction)
        );
        assert_eq!(
            parse_decision(
                &LlmMessage::assistant("Action: read_file with a.txt"),
                &tools
            ),
            Err(ParseError::ActionWithoutBlob)
        );
    }
}

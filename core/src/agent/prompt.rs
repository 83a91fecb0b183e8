//! System prompt for the file manager agent

use crate::error::Result;
use crate::tools::{Tool, ToolExecutor};
use handlebars::Handlebars;
use serde_json::json;

/// Role description placed at the top of every system prompt
pub const FILE_MANAGER_SYSTEM_PROMPT: &str = "You are a file manager agent. You can:
- Read, write, and list files.
- Use a formatting tool to ensure text is properly formatted before writing.
- Handle multi-step tasks autonomously.
- Always format code before writing to a file.";

const PROMPT_TEMPLATE: &str = r#"{{role}}

All paths are relative to the working directory. You cannot access anything outside it.

You have access to the following tools:

{{#each tools}}
{{name}}: {{description}}, args: {{schema}}
{{#each examples}}
  e.g. {{this}}
{{/each}}
{{/each}}

Use a json blob to specify a tool by providing an action key (tool name) and an action_input key (tool input).

Valid "action" values: "Final Answer" or {{tool_names}}

Provide only ONE action per json blob, as shown:

```json
{
  "action": $TOOL_NAME,
  "action_input": $INPUT
}
```

Follow this format:

Question: input question to answer
Thought: consider previous and subsequent steps
Action:
```json
$JSON_BLOB
```
Observation: action result
... (repeat Thought/Action/Observation as needed)
Thought: I know what to respond
Action:
```json
{
  "action": "Final Answer",
  "action_input": "Final response to human"
}
```

Before calling write_file, pass the text through make_formatted_text and write its output.
Begin! Always respond with a valid json blob of a single action, or with native tool calls when they are available."#;

/// Render the full system prompt.
///
/// `role` replaces the default role description when set; the tool list and
/// action format are always appended.
pub fn build_system_prompt(role: Option<&str>, tools: &ToolExecutor) -> Result<String> {
    let tool_entries: Vec<_> = tools
        .tools()
        .map(|tool| {
            json!({
                "name": tool.name(),
                "description": tool.description(),
                "schema": tool
                    .parameters_schema()
                    .get("properties")
                    .cloned()
                    .unwrap_or_default()
                    .to_string(),
                "examples": render_examples(tool),
            })
        })
        .collect();

    let data = json!({
        "role": role.unwrap_or(FILE_MANAGER_SYSTEM_PROMPT),
        "tools": tool_entries,
        "tool_names": tools.list_tools().join(", "),
    });

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    Ok(handlebars.render_template(PROMPT_TEMPLATE, &data)?)
}

/// One line per example: what it does, the action blob, what comes back
fn render_examples(tool: &dyn Tool) -> Vec<String> {
    tool.examples()
        .into_iter()
        .map(|example| {
            let blob = json!({
                "action": tool.name(),
                "action_input": example.parameters,
            });
            format!(
                "{}: {} -> {}",
                example.description, blob, example.expected_result
            )
        })
        .collect()
}

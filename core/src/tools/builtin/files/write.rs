//! Write file tool

use super::resolve_arg;
use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::{ScopedRoot, Tool, ToolCall, ToolExample, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Writes (or appends) text to a file inside the scoped root
pub struct WriteFileTool {
    root: Arc<ScopedRoot>,
}

impl WriteFileTool {
    pub fn new(root: Arc<ScopedRoot>) -> Self {
        Self { root }
    }

    async fn write(path: &Path, text: &str, append: bool) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        if append {
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            file.write_all(text.as_bytes()).await?;
            file.flush().await
        } else {
            tokio::fs::write(path, text).await
        }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write file to disk"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "name of file"
                },
                "text": {
                    "type": "string",
                    "description": "text to write to file"
                },
                "append": {
                    "type": "boolean",
                    "description": "Whether to append to an existing file.",
                    "default": false
                }
            },
            "required": ["file_path", "text"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let file_path: String = call.get_parameter("file_path")?;
        let text: String = call.get_parameter("text")?;
        let append: bool = call.get_parameter_or("append", false);

        let path = match resolve_arg(&self.root, &call.id, "file_path", &file_path) {
            Ok(path) => path,
            Err(denied) => return Ok(denied),
        };

        match Self::write(&path, &text, append).await {
            Ok(()) => {
                tracing::debug!(
                    "Wrote {} bytes to {} (append={})",
                    text.len(),
                    path.display(),
                    append
                );
                Ok(ToolResult::success(
                    &call.id,
                    format!("File written successfully to {}.", file_path),
                ))
            }
            Err(e) => Ok(ToolResult::error(&call.id, e.to_string())),
        }
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![
            ToolExample {
                description: "Write formatted text to a new file".to_string(),
                parameters: json!({"file_path": "notes.txt", "text": "line1\nline2"}),
                expected_result: "notes.txt holds two lines".to_string(),
            },
            ToolExample {
                description: "Append a line to a log".to_string(),
                parameters: json!({"file_path": "logs/today.log", "text": "done\n", "append": true}),
                expected_result: "The line is added to the end of logs/today.log".to_string(),
            },
        ]
    }
}

impl_tool_factory!(
    scoped WriteFileToolFactory,
    WriteFileTool,
    "write_file",
    "Write or append text to a file inside the scoped root"
);

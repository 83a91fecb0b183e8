//! List directory tool

use super::{not_found, resolve_arg};
use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::{ScopedRoot, Tool, ToolCall, ToolExample, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

/// Lists the entries of a directory inside the scoped root
pub struct ListDirectoryTool {
    root: Arc<ScopedRoot>,
}

impl ListDirectoryTool {
    pub fn new(root: Arc<ScopedRoot>) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &str {
        "list_directory"
    }

    fn description(&self) -> &str {
        "List files and directories in a specified folder"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "dir_path": {
                    "type": "string",
                    "description": "Subdirectory to list.",
                    "default": "."
                }
            },
            "required": []
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let dir_path: String = call.get_parameter_or("dir_path", ".".to_string());
        let path = match resolve_arg(&self.root, &call.id, "dir_path", &dir_path) {
            Ok(path) => path,
            Err(denied) => return Ok(denied),
        };

        if !path.exists() {
            return Ok(ToolResult::error(&call.id, not_found(&dir_path)));
        }
        if !path.is_dir() {
            return Ok(ToolResult::error(
                &call.id,
                format!("not a directory: {}", dir_path),
            ));
        }

        let mut reader = match tokio::fs::read_dir(&path).await {
            Ok(reader) => reader,
            Err(e) => return Ok(ToolResult::error(&call.id, e.to_string())),
        };

        let mut entries = Vec::new();
        loop {
            match reader.next_entry().await {
                Ok(Some(entry)) => {
                    let mut name = entry.file_name().to_string_lossy().to_string();
                    if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                        name.push('/');
                    }
                    entries.push(name);
                }
                Ok(None) => break,
                Err(e) => return Ok(ToolResult::error(&call.id, e.to_string())),
            }
        }
        entries.sort();

        tracing::debug!("Listed {} entries in {}", entries.len(), path.display());

        if entries.is_empty() {
            Ok(ToolResult::success(
                &call.id,
                format!("No files found in directory {}", dir_path),
            ))
        } else {
            Ok(ToolResult::success(&call.id, entries.join("\n")))
        }
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![
            ToolExample {
                description: "List the root directory".to_string(),
                parameters: json!({}),
                expected_result: "Entry names, one per line".to_string(),
            },
            ToolExample {
                description: "List a subdirectory".to_string(),
                parameters: json!({"dir_path": "docs"}),
                expected_result: "Entries of docs, directories ending in /".to_string(),
            },
        ]
    }
}

impl_tool_factory!(
    scoped ListDirectoryToolFactory,
    ListDirectoryTool,
    "list_directory",
    "List the entries of a directory inside the scoped root"
);

//! Copy file tool

use super::{destination_for, not_found, resolve_arg};
use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::{ScopedRoot, Tool, ToolCall, ToolExample, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct CopyFileTool {
    root: Arc<ScopedRoot>,
}

impl CopyFileTool {
    pub fn new(root: Arc<ScopedRoot>) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Tool for CopyFileTool {
    fn name(&self) -> &str {
        "copy_file"
    }

    fn description(&self) -> &str {
        "Create a copy of a file in a specified location"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "source_path": {
                    "type": "string",
                    "description": "Path of the file to copy"
                },
                "destination_path": {
                    "type": "string",
                    "description": "Path to save the copied file"
                }
            },
            "required": ["source_path", "destination_path"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let source_path: String = call.get_parameter("source_path")?;
        let destination_path: String = call.get_parameter("destination_path")?;

        let source = match resolve_arg(&self.root, &call.id, "source_path", &source_path) {
            Ok(path) => path,
            Err(denied) => return Ok(denied),
        };
        let destination =
            match resolve_arg(&self.root, &call.id, "destination_path", &destination_path) {
                Ok(path) => destination_for(&source, path),
                Err(denied) => return Ok(denied),
            };

        if !source.is_file() {
            return Ok(ToolResult::error(&call.id, not_found(&source_path)));
        }

        match tokio::fs::copy(&source, &destination).await {
            Ok(bytes) => {
                tracing::debug!(
                    "Copied {} bytes from {} to {}",
                    bytes,
                    source.display(),
                    destination.display()
                );
                Ok(ToolResult::success(
                    &call.id,
                    format!(
                        "File copied successfully from {} to {}.",
                        source_path, destination_path
                    ),
                ))
            }
            Err(e) => Ok(ToolResult::error(&call.id, e.to_string())),
        }
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            description: "Back up a file".to_string(),
            parameters: json!({"source_path": "notes.txt", "destination_path": "notes.bak"}),
            expected_result: "notes.bak holds the same content as notes.txt".to_string(),
        }]
    }
}

impl_tool_factory!(
    scoped CopyFileToolFactory,
    CopyFileTool,
    "copy_file",
    "Copy a file within the scoped root"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::files::test_support::scoped_root;

    #[tokio::test]
    async fn test_copy_file() {
        let (dir, root) = scoped_root();
        std::fs::write(dir.path().join("a.txt"), "data").unwrap();

        let result = CopyFileTool::new(root)
            .execute(ToolCall::new(
                "copy_file",
                json!({"source_path": "a.txt", "destination_path": "b.txt"}),
            ))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, "File copied successfully from a.txt to b.txt.");
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "data");
        assert_eq!(std::fs::read_to_string(dir.path().join("b.txt")).unwrap(), "data");
    }

    #[tokio::test]
    async fn test_copy_into_directory() {
        let (dir, root) = scoped_root();
        std::fs::write(dir.path().join("a.txt"), "data").unwrap();
        std::fs::create_dir(dir.path().join("backup")).unwrap();

        let result = CopyFileTool::new(root)
            .execute(ToolCall::new(
                "copy_file",
                json!({"source_path": "a.txt", "destination_path": "backup"}),
            ))
            .await
            .unwrap();
        assert!(result.success);
        assert!(dir.path().join("backup/a.txt").is_file());
    }

    #[tokio::test]
    async fn test_copy_missing_source_and_escape() {
        let (_dir, root) = scoped_root();
        let tool = CopyFileTool::new(root);

        let result = tool
            .execute(ToolCall::new(
                "copy_file",
                json!({"source_path": "ghost.txt", "destination_path": "b.txt"}),
            ))
            .await
            .unwrap();
        assert_eq!(result.content, "Error: no such file or directory: ghost.txt");

        let result = tool
            .execute(ToolCall::new(
                "copy_file",
                json!({"source_path": "a.txt", "destination_path": "/tmp/stolen.txt"}),
            ))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.content.contains("Access denied to destination_path"));
    }
}

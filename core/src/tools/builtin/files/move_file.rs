//! Move file tool

use super::{destination_for, not_found, resolve_arg};
use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::{ScopedRoot, Tool, ToolCall, ToolExample, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct MoveFileTool {
    root: Arc<ScopedRoot>,
}

impl MoveFileTool {
    pub fn new(root: Arc<ScopedRoot>) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Tool for MoveFileTool {
    fn name(&self) -> &str {
        "move_file"
    }

    fn description(&self) -> &str {
        "Move or rename a file from one location to another"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "source_path": {
                    "type": "string",
                    "description": "Path of the file to move"
                },
                "destination_path": {
                    "type": "string",
                    "description": "New path for the moved file"
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

        match tokio::fs::rename(&source, &destination).await {
            Ok(()) => {
                tracing::debug!("Moved {} to {}", source.display(), destination.display());
                Ok(ToolResult::success(
                    &call.id,
                    format!(
                        "File moved successfully from {} to {}.",
                        source_path, destination_path
                    ),
                ))
            }
            Err(e) => Ok(ToolResult::error(&call.id, e.to_string())),
        }
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            description: "Rename a file".to_string(),
            parameters: json!({"source_path": "draft.txt", "destination_path": "final.txt"}),
            expected_result: "draft.txt is now final.txt".to_string(),
        }]
    }
}

impl_tool_factory!(
    scoped MoveFileToolFactory,
    MoveFileTool,
    "move_file",
    "Move or rename a file within the scoped root"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::files::test_support::scoped_root;

    #[tokio::test]
    async fn test_move_renames_file() {
        let (dir, root) = scoped_root();
        std::fs::write(dir.path().join("draft.txt"), "v1").unwrap();

        let result = MoveFileTool::new(root)
            .execute(ToolCall::new(
                "move_file",
                json!({"source_path": "draft.txt", "destination_path": "final.txt"}),
            ))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(
            result.content,
            "File moved successfully from draft.txt to final.txt."
        );
        assert!(!dir.path().join("draft.txt").exists());
        assert_eq!(std::fs::read_to_string(dir.path().join("final.txt")).unwrap(), "v1");
    }

    #[tokio::test]
    async fn test_move_into_directory() {
        let (dir, root) = scoped_root();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join("archive")).unwrap();

        let result = MoveFileTool::new(root)
            .execute(ToolCall::new(
                "move_file",
                json!({"source_path": "a.txt", "destination_path": "archive"}),
            ))
            .await
            .unwrap();
        assert!(result.success);
        assert!(dir.path().join("archive/a.txt").is_file());
    }

    #[tokio::test]
    async fn test_move_out_of_root_is_denied() {
        let (dir, root) = scoped_root();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();

        let result = MoveFileTool::new(root)
            .execute(ToolCall::new(
                "move_file",
                json!({"source_path": "a.txt", "destination_path": "../a.txt"}),
            ))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(dir.path().join("a.txt").exists());
    }
}

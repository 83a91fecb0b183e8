//! Delete file tool

use super::{not_found, resolve_arg};
use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::{ScopedRoot, Tool, ToolCall, ToolExample, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct DeleteFileTool {
    root: Arc<ScopedRoot>,
}

impl DeleteFileTool {
    pub fn new(root: Arc<ScopedRoot>) -> Self {
        Self { root }
    }
}

#[async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &str {
        "file_delete"
    }

    fn description(&self) -> &str {
        "Delete a file"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to delete"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let file_path: String = call.get_parameter("file_path")?;
        let path = match resolve_arg(&self.root, &call.id, "file_path", &file_path) {
            Ok(path) => path,
            Err(denied) => return Ok(denied),
        };

        if !path.exists() {
            return Ok(ToolResult::error(&call.id, not_found(&file_path)));
        }
        if path.is_dir() {
            return Ok(ToolResult::error(
                &call.id,
                format!("is a directory, not a file: {}", file_path),
            ));
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Deleted {}", path.display());
                Ok(ToolResult::success(
                    &call.id,
                    format!("File deleted successfully: {}.", file_path),
                ))
            }
            Err(e) => Ok(ToolResult::error(&call.id, e.to_string())),
        }
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            description: "Delete an old draft".to_string(),
            parameters: json!({"file_path": "draft.txt"}),
            expected_result: "draft.txt no longer exists".to_string(),
        }]
    }
}

impl_tool_factory!(
    scoped DeleteFileToolFactory,
    DeleteFileTool,
    "file_delete",
    "Delete a file inside the scoped root"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::files::test_support::scoped_root;

    #[tokio::test]
    async fn test_delete_file() {
        let (dir, root) = scoped_root();
        std::fs::write(dir.path().join("draft.txt"), "x").unwrap();

        let result = DeleteFileTool::new(root)
            .execute(ToolCall::new("file_delete", json!({"file_path": "draft.txt"})))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, "File deleted successfully: draft.txt.");
        assert!(!dir.path().join("draft.txt").exists());
    }

    #[tokio::test]
    async fn test_delete_refuses_directory_and_missing() {
        let (dir, root) = scoped_root();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let tool = DeleteFileTool::new(root);

        let result = tool
            .execute(ToolCall::new("file_delete", json!({"file_path": "sub"})))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(dir.path().join("sub").is_dir());

        let result = tool
            .execute(ToolCall::new("file_delete", json!({"file_path": "ghost"})))
            .await
            .unwrap();
        assert_eq!(result.content, "Error: no such file or directory: ghost");
    }
}

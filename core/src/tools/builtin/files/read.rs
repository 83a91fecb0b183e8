//! Read file tool

use super::{not_found, resolve_arg};
use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::{ScopedRoot, Tool, ToolCall, ToolExample, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Bytes of a file handed back to the model; the rest is cut off
const MAX_READ_BYTES: u64 = 64 * 1024;

/// Reads a file inside the scoped root
pub struct ReadFileTool {
    root: Arc<ScopedRoot>,
}

impl ReadFileTool {
    pub fn new(root: Arc<ScopedRoot>) -> Self {
        Self { root }
    }

    /// Read at most `MAX_READ_BYTES`; also returns the full size when cut off
    async fn read_capped(path: &Path) -> std::io::Result<(String, Option<u64>)> {
        let file = tokio::fs::File::open(path).await?;
        let total = file.metadata().await?.len();

        let mut bytes = Vec::new();
        file.take(MAX_READ_BYTES).read_to_end(&mut bytes).await?;
        let truncated = total > MAX_READ_BYTES;

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            // The cut may land inside a multi-byte character
            Err(e) if truncated && e.utf8_error().error_len().is_none() => {
                let valid = e.utf8_error().valid_up_to();
                let mut bytes = e.into_bytes();
                bytes.truncate(valid);
                String::from_utf8(bytes)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?
            }
            Err(_) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "stream did not contain valid UTF-8",
                ))
            }
        };

        Ok((text, truncated.then_some(total)))
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read file from disk"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "name of file"
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

        match Self::read_capped(&path).await {
            Ok((mut content, full_size)) => {
                tracing::debug!("Read {} bytes from {}", content.len(), path.display());
                if let Some(total) = full_size {
                    content.push_str(&format!(
                        "\n\n(truncated to first {} of {} bytes)",
                        content.len(),
                        total
                    ));
                }
                Ok(ToolResult::success(&call.id, content))
            }
            Err(e) => Ok(ToolResult::error(&call.id, e.to_string())),
        }
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![ToolExample {
            description: "Read a notes file".to_string(),
            parameters: json!({"file_path": "notes.txt"}),
            expected_result: "The content of notes.txt".to_string(),
        }]
    }
}

impl_tool_factory!(
    scoped ReadFileToolFactory,
    ReadFileTool,
    "read_file",
    "Read a file inside the scoped root"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::files::test_support::scoped_root;

    #[tokio::test]
    async fn test_read_existing_file() {
        let (dir, root) = scoped_root();
        std::fs::write(dir.path().join("notes.txt"), "hello\nworld").unwrap();

        let result = ReadFileTool::new(root)
            .execute(ToolCall::new("read_file", json!({"file_path": "notes.txt"})))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, "hello\nworld");
    }

    #[tokio::test]
    async fn test_read_large_file_is_truncated() {
        let (dir, root) = scoped_root();
        std::fs::write(dir.path().join("big.log"), "a".repeat(70_000)).unwrap();

        let result = ReadFileTool::new(root)
            .execute(ToolCall::new("read_file", json!({"file_path": "big.log"})))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.content.starts_with(&"a".repeat(65_536)));
        assert!(result
            .content
            .ends_with("\n\n(truncated to first 65536 of 70000 bytes)"));
    }

    #[tokio::test]
    async fn test_truncation_keeps_whole_characters() {
        let (dir, root) = scoped_root();
        std::fs::write(dir.path().join("euro.txt"), "€".repeat(30_000)).unwrap();

        let result = ReadFileTool::new(root)
            .execute(ToolCall::new("read_file", json!({"file_path": "euro.txt"})))
            .await
            .unwrap();
        assert!(result.success);
        let (text, note) = result.content.split_once("\n\n").unwrap();
        assert_eq!(text.chars().count(), 21_845);
        assert!(text.chars().all(|c| c == '€'));
        assert_eq!(note, "(truncated to first 65535 of 90000 bytes)");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let (_dir, root) = scoped_root();
        let result = ReadFileTool::new(root)
            .execute(ToolCall::new("read_file", json!({"file_path": "ghost.txt"})))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.content, "Error: no such file or directory: ghost.txt");
    }

    #[tokio::test]
    async fn test_read_outside_root_is_denied() {
        let (_dir, root) = scoped_root();
        let result = ReadFileTool::new(root)
            .execute(ToolCall::new("read_file", json!({"file_path": "../../etc/passwd"})))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result
            .content
            .starts_with("Error: Access denied to file_path: ../../etc/passwd."));
    }

    #[tokio::test]
    async fn test_missing_parameter_is_an_error() {
        let (_dir, root) = scoped_root();
        let err = ReadFileTool::new(root)
            .execute(ToolCall::new("read_file", json!({})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Missing parameter: file_path"));
    }
}

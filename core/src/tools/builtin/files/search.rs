//! File search tool using shell-style wildcards

use super::{not_found, resolve_arg};
use crate::error::Result;
use crate::impl_tool_factory;
use crate::tools::{ScopedRoot, Tool, ToolCall, ToolExample, ToolResult};
use async_trait::async_trait;
use glob::Pattern;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// Maximum number of files to return to prevent overwhelming output
const MAX_RESULTS: usize = 1000;

/// Recursively searches for files whose name matches a wildcard pattern
pub struct FileSearchTool {
    root: Arc<ScopedRoot>,
}

impl FileSearchTool {
    pub fn new(root: Arc<ScopedRoot>) -> Self {
        Self { root }
    }

    fn find_matching_files(base: &Path, matcher: &NameMatcher) -> Vec<String> {
        let mut matches: Vec<String> = WalkDir::new(base)
            .min_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| matcher.matches(&entry.file_name().to_string_lossy()))
            .filter_map(|entry| {
                entry
                    .path()
                    .strip_prefix(base)
                    .ok()
                    .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            })
            .collect();

        matches.sort();
        matches
    }
}

#[async_trait]
impl Tool for FileSearchTool {
    fn name(&self) -> &str {
        "file_search"
    }

    fn description(&self) -> &str {
        "Recursively search for files in a subdirectory that match the regex pattern"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Unix shell regex, where * matches everything."
                },
                "dir_path": {
                    "type": "string",
                    "description": "Subdirectory to search in.",
                    "default": "."
                }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let pattern: String = call.get_parameter("pattern")?;
        let dir_path: String = call.get_parameter_or("dir_path", ".".to_string());

        let base = match resolve_arg(&self.root, &call.id, "dir_path", &dir_path) {
            Ok(path) => path,
            Err(denied) => return Ok(denied),
        };
        if !base.is_dir() {
            return Ok(ToolResult::error(&call.id, not_found(&dir_path)));
        }

        let matcher = match NameMatcher::new(&pattern) {
            Ok(matcher) => matcher,
            Err(e) => {
                return Ok(ToolResult::error(
                    &call.id,
                    format!("Invalid pattern {}: {}", pattern, e.msg),
                ))
            }
        };
        let search_base = base.clone();
        let mut matches = tokio::task::spawn_blocking(move || {
            Self::find_matching_files(&search_base, &matcher)
        })
        .await
        .map_err(|e| format!("File search task failed: {}", e))?;

        tracing::debug!(
            "Pattern {} matched {} files under {}",
            pattern,
            matches.len(),
            base.display()
        );

        if matches.is_empty() {
            return Ok(ToolResult::success(
                &call.id,
                format!(
                    "No files found for pattern {} in directory {}",
                    pattern, dir_path
                ),
            ));
        }

        let truncated = matches.len() > MAX_RESULTS;
        matches.truncate(MAX_RESULTS);

        let mut content = matches.join("\n");
        if truncated {
            content.push_str(&format!(
                "\n\n(truncated to first {} results, use a more specific pattern)",
                MAX_RESULTS
            ));
        }

        Ok(ToolResult::success(&call.id, content))
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![
            ToolExample {
                description: "Find all text files".to_string(),
                parameters: json!({"pattern": "*.txt"}),
                expected_result: "Paths of .txt files, relative to the search directory"
                    .to_string(),
            },
            ToolExample {
                description: "Find numbered reports in a subdirectory".to_string(),
                parameters: json!({"pattern": "report_[0-9]*.md", "dir_path": "docs"}),
                expected_result: "Matching report files under docs".to_string(),
            },
        ]
    }
}

/// Shell-style wildcard matcher applied to a single file name.
///
/// Supports `*`, `?`, `[abc]`, `[!abc]` and ranges like `[a-z]`. Matching is
/// case-sensitive.
struct NameMatcher {
    pattern: Pattern,
}

impl NameMatcher {
    fn new(pattern: &str) -> std::result::Result<Self, glob::PatternError> {
        // A run of stars means the same as one inside a single file name
        let mut collapsed = String::with_capacity(pattern.len());
        for c in pattern.chars() {
            if !(c == '*' && collapsed.ends_with('*')) {
                collapsed.push(c);
            }
        }
        Ok(Self {
            pattern: Pattern::new(&collapsed)?,
        })
    }

    fn matches(&self, name: &str) -> bool {
        self.pattern.matches(name)
    }
}

impl_tool_factory!(
    scoped FileSearchToolFactory,
    FileSearchTool,
    "file_search",
    "Recursively search for files by wildcard pattern inside the scoped root"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::files::test_support::scoped_root;

    fn matches(pattern: &str, name: &str) -> bool {
        NameMatcher::new(pattern).unwrap().matches(name)
    }

    #[test]
    fn test_wildcards() {
        assert!(matches("*.txt", "notes.txt"));
        assert!(matches("*", ""));
        assert!(!matches("*.txt", "notes.md"));
        assert!(matches("file?.txt", "file1.txt"));
        assert!(!matches("file?.txt", "file.txt"));
        assert!(matches("a**b", "ab"));
        assert!(!matches("*.TXT", "notes.txt"));
    }

    #[test]
    fn test_character_classes() {
        assert!(matches("[Dd]ocument*", "document.md"));
        assert!(matches("[Dd]ocument*", "Document"));
        assert!(!matches("[!Dd]ocument", "document"));
        assert!(matches("[!Dd]ocument", "xocument"));
        assert!(matches("report_[0-9].md", "report_7.md"));
        assert!(!matches("report_[0-9].md", "report_x.md"));
        assert!(matches("[]]", "]"));
        assert!(matches("[a-]", "-"));
    }

    #[test]
    fn test_many_stars_stay_fast() {
        let name = "a".repeat(48);
        let started = std::time::Instant::now();

        assert!(!matches("*a*a*a*a*a*a*a*a*b", &name));
        assert!(matches("*a*a*a*a*a*a*a*a*", &name));
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_an_error_result() {
        let (_dir, root) = scoped_root();
        let result = FileSearchTool::new(root)
            .execute(ToolCall::new("file_search", json!({"pattern": "x["})))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.content.starts_with("Error: Invalid pattern x["));
    }

    #[tokio::test]
    async fn test_search_recursive_relative_sorted() {
        let (dir, root) = scoped_root();
        std::fs::create_dir_all(dir.path().join("docs/old")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("docs/a.txt"), "").unwrap();
        std::fs::write(dir.path().join("docs/old/c.txt"), "").unwrap();
        std::fs::write(dir.path().join("docs/readme.md"), "").unwrap();

        let tool = FileSearchTool::new(root);
        let result = tool
            .execute(ToolCall::new("file_search", json!({"pattern": "*.txt"})))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, "b.txt\ndocs/a.txt\ndocs/old/c.txt");

        let result = tool
            .execute(ToolCall::new(
                "file_search",
                json!({"pattern": "*.txt", "dir_path": "docs"}),
            ))
            .await
            .unwrap();
        assert_eq!(result.content, "a.txt\nold/c.txt");
    }

    #[tokio::test]
    async fn test_search_no_match() {
        let (_dir, root) = scoped_root();
        let result = FileSearchTool::new(root)
            .execute(ToolCall::new("file_search", json!({"pattern": "*.rs"})))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.content, "No files found for pattern *.rs in directory .");
    }

    #[tokio::test]
    async fn test_search_outside_root_is_denied() {
        let (_dir, root) = scoped_root();
        let result = FileSearchTool::new(root)
            .execute(ToolCall::new(
                "file_search",
                json!({"pattern": "*", "dir_path": "../.."}),
            ))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.content.contains("Access denied to dir_path"));
    }
}

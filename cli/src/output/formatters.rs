//! Formatting utilities for CLI output

use colored::Colorize;
use filemate_core::output::{ToolExecutionInfo, ToolExecutionStatus};

/// Longest tool result shown inline before it is cut
const MAX_RESULT_CHARS: usize = 200;

/// Tool execution formatter
#[derive(Debug, Default, Clone, Copy)]
pub struct ToolFormatter;

impl ToolFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Format tool execution status, e.g. `⏺ read_file(notes.txt)`
    pub fn format_tool_status(&self, tool_info: &ToolExecutionInfo) -> String {
        let dot = match tool_info.status {
            ToolExecutionStatus::Executing => "⏺".white(),
            ToolExecutionStatus::Success => "⏺".green(),
            ToolExecutionStatus::Error => "⏺".red(),
        };

        format!(
            "{} {}({})",
            dot,
            tool_info.tool_name,
            self.extract_tool_argument(tool_info)
        )
    }

    /// Main argument of a call, for the status line
    fn extract_tool_argument(&self, tool_info: &ToolExecutionInfo) -> String {
        let param = |key: &str| {
            tool_info
                .parameters
                .get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };

        match tool_info.tool_name.as_str() {
            "copy_file" | "move_file" => match (param("source_path"), param("destination_path")) {
                (Some(src), Some(dst)) => format!("{} → {}", src, dst),
                (Some(src), None) => src,
                _ => String::new(),
            },
            "list_directory" => param("dir_path").unwrap_or_else(|| ".".to_string()),
            "file_search" => param("pattern").unwrap_or_default(),
            "make_formatted_text" => param("text")
                .map(|text| truncate(&text, 40))
                .unwrap_or_default(),
            _ => param("file_path").unwrap_or_default(),
        }
    }

    /// Format tool result content for display under the status line
    pub fn format_tool_result(&self, tool_info: &ToolExecutionInfo) -> Option<String> {
        let result = tool_info.result.as_ref()?;
        if result.content.trim().is_empty() {
            return None;
        }

        let content = truncate(&result.content, MAX_RESULT_CHARS);
        let indented = content.replace('\n', "\n     ");
        if result.success {
            Some(format!("  ⎿  {}", indented))
        } else {
            Some(format!("  ⎿  {}", indented.red()))
        }
    }
}

/// Cut `text` to `max` characters, marking the cut with `...`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Prefix every line with the thoughts-region indent
pub fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use filemate_core::tools::{ToolCall, ToolResult};
    use serde_json::json;

    fn info(
        name: &str,
        params: serde_json::Value,
        status: ToolExecutionStatus,
        result: Option<ToolResult>,
    ) -> ToolExecutionInfo {
        let call = ToolCall::new(name, params);
        ToolExecutionInfo::from_call(&call, status, result.as_ref())
    }

    #[test]
    fn test_status_shows_main_argument() {
        colored::control::set_override(false);
        let formatter = ToolFormatter::new();

        let read = info(
            "read_file",
            json!({"file_path": "notes.txt"}),
            ToolExecutionStatus::Executing,
            None,
        );
        assert_eq!(formatter.format_tool_status(&read), "⏺ read_file(notes.txt)");

        let copy = info(
            "copy_file",
            json!({"source_path": "a.txt", "destination_path": "b.txt"}),
            ToolExecutionStatus::Success,
            None,
        );
        assert_eq!(
            formatter.format_tool_status(&copy),
            "⏺ copy_file(a.txt → b.txt)"
        );

        let list = info("list_directory", json!({}), ToolExecutionStatus::Success, None);
        assert_eq!(formatter.format_tool_status(&list), "⏺ list_directory(.)");
    }

    #[test]
    fn test_result_is_truncated_and_indented() {
        colored::control::set_override(false);
        let formatter = ToolFormatter::new();

        let long = "x".repeat(500);
        let listed = info(
            "read_file",
            json!({"file_path": "big.txt"}),
            ToolExecutionStatus::Success,
            Some(ToolResult::success("1", long)),
        );
        let shown = formatter.format_tool_result(&listed).unwrap();
        assert!(shown.starts_with("  ⎿  xxx"));
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), "  ⎿  ".chars().count() + MAX_RESULT_CHARS);

        let multi = info(
            "list_directory",
            json!({}),
            ToolExecutionStatus::Success,
            Some(ToolResult::success("1", "a.txt\nb.txt")),
        );
        assert_eq!(
            formatter.format_tool_result(&multi).unwrap(),
            "  ⎿  a.txt\n     b.txt"
        );

        let empty = info(
            "write_file",
            json!({}),
            ToolExecutionStatus::Success,
            Some(ToolResult::success("1", "  ")),
        );
        assert!(formatter.format_tool_result(&empty).is_none());
    }

    #[test]
    fn test_indent() {
        assert_eq!(indent("a\nb"), "    a\n    b");
    }
}

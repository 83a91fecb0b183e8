//! Text formatting tool that decodes escape sequences before a write

use crate::error::{Result, ToolError};
use crate::impl_tool_factory;
use crate::tools::{Tool, ToolCall, ToolExample, ToolResult};
use async_trait::async_trait;
use serde_json::json;

/// Decodes literal escape sequences (`\n`, `\t`, `\x41`, `\u00e9`, ...) into
/// the characters they stand for.
pub struct FormatTextTool;

impl FormatTextTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FormatTextTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FormatTextTool {
    fn name(&self) -> &str {
        "make_formatted_text"
    }

    fn description(&self) -> &str {
        "Formats text to ensure proper indentation and line breaks before writing to a file. Input: text"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Text that may contain escaped line breaks or tabs such as \\n and \\t"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, call: ToolCall) -> Result<ToolResult> {
        let text: String = call.get_parameter("text")?;

        match decode_escapes(&text) {
            Ok(formatted) => Ok(ToolResult::success(&call.id, formatted)),
            Err(e) => Ok(ToolResult::error(&call.id, e.to_string())),
        }
    }

    fn examples(&self) -> Vec<ToolExample> {
        vec![
            ToolExample {
                description: "Turn escaped line breaks into real ones".to_string(),
                parameters: json!({"text": "line1\\nline2"}),
                expected_result: "The text with a real newline between line1 and line2"
                    .to_string(),
            },
            ToolExample {
                description: "Format indented code before writing it".to_string(),
                parameters: json!({"text": "def main():\\n\\tprint('hi')"}),
                expected_result: "Code with real line breaks and tab indentation".to_string(),
            },
        ]
    }
}

/// Decode backslash escape sequences in `text`.
///
/// Unknown escapes such as `\q` are kept as written. Errors carry the
/// character offset of the offending backslash.
pub fn decode_escapes(text: &str) -> std::result::Result<String, ToolError> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }

        let start = i;
        let Some(&next) = chars.get(i + 1) else {
            return Err(invalid(start, "\\ at end of string"));
        };
        i += 2;

        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or(0);
                let mut taken = 1;
                while taken < 3 {
                    match chars.get(i).and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            i += 1;
                            taken += 1;
                        }
                        None => break,
                    }
                }
                out.push(code_point(start, value)?);
            }
            'x' => {
                out.push(hex_escape(&chars, &mut i, start, 2, "truncated \\xXX escape")?);
            }
            'u' => {
                out.push(hex_escape(&chars, &mut i, start, 4, "truncated \\uXXXX escape")?);
            }
            'U' => {
                out.push(hex_escape(
                    &chars,
                    &mut i,
                    start,
                    8,
                    "truncated \\UXXXXXXXX escape",
                )?);
            }
            'N' => return Err(invalid(start, "named \\N{...} escapes are not supported")),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn hex_escape(
    chars: &[char],
    i: &mut usize,
    start: usize,
    digits: usize,
    truncated: &str,
) -> std::result::Result<char, ToolError> {
    let end = *i + digits;
    if end > chars.len() {
        return Err(invalid(start, truncated));
    }

    let mut value: u32 = 0;
    for c in &chars[*i..end] {
        let Some(d) = c.to_digit(16) else {
            return Err(invalid(start, truncated));
        };
        value = value * 16 + d;
    }
    *i = end;

    code_point(start, value)
}

fn code_point(start: usize, value: u32) -> std::result::Result<char, ToolError> {
    char::from_u32(value).ok_or_else(|| {
        invalid(
            start,
            &format!("U+{:X} is not a valid unicode scalar value", value),
        )
    })
}

fn invalid(position: usize, message: &str) -> ToolError {
    ToolError::InvalidEscape {
        position,
        message: message.to_string(),
    }
}

impl_tool_factory!(
    FormatTextToolFactory,
    FormatTextTool,
    "make_formatted_text",
    "Decode escaped line breaks and tabs before writing text to a file"
);

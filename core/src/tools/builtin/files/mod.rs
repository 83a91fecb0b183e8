//! File-operation tools confined to the scoped root
//!
//! Every path argument goes through [`ScopedRoot::resolve`] before the
//! filesystem is touched. Expected failures come back as error results so
//! the agent can read them and try something else.

pub mod copy;
pub mod delete;
pub mod list;
pub mod move_file;
pub mod read;
pub mod search;
pub mod write;

pub use copy::{CopyFileTool, CopyFileToolFactory};
pub use delete::{DeleteFileTool, DeleteFileToolFactory};
pub use list::{ListDirectoryTool, ListDirectoryToolFactory};
pub use move_file::{MoveFileTool, MoveFileToolFactory};
pub use read::{ReadFileTool, ReadFileToolFactory};
pub use search::{FileSearchTool, FileSearchToolFactory};
pub use write::{WriteFileTool, WriteFileToolFactory};

use crate::error::Error;
use crate::tools::{ScopedRoot, ToolResult};
use std::path::{Path, PathBuf};

/// Resolve a path argument, or build the error result to hand back.
pub(crate) fn resolve_arg(
    root: &ScopedRoot,
    call_id: &str,
    arg: &str,
    user_path: &str,
) -> std::result::Result<PathBuf, ToolResult> {
    root.resolve(arg, user_path).map_err(|e| {
        let message = match e {
            Error::Tool(inner) => inner.to_string(),
            other => other.to_string(),
        };
        ToolResult::error(call_id, message)
    })
}

/// Message for a path that does not exist
pub(crate) fn not_found(user_path: &str) -> String {
    format!("no such file or directory: {}", user_path)
}

/// Copy and move land inside an existing destination directory, keeping the
/// source file name.
pub(crate) fn destination_for(source: &Path, destination: PathBuf) -> PathBuf {
    if destination.is_dir() {
        match source.file_name() {
            Some(name) => destination.join(name),
            None => destination,
        }
    } else {
        destination
    }
}

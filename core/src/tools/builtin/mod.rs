//! Built-in tools

pub mod files;
pub mod format;

pub use files::{
    CopyFileTool, CopyFileToolFactory, DeleteFileTool, DeleteFileToolFactory, FileSearchTool,
    FileSearchToolFactory, ListDirectoryTool, ListDirectoryToolFactory, MoveFileTool,
    MoveFileToolFactory, ReadFileTool, ReadFileToolFactory, WriteFileTool, WriteFileToolFactory,
};
pub use format::{decode_escapes, FormatTextTool, FormatTextToolFactory};

//! CLI-specific output implementations
//!
//! Concrete implementations of the core output abstraction for the terminal.

pub mod cli_handler;
pub mod formatters;

pub use cli_handler::{CliOutputConfig, CliOutputHandler};

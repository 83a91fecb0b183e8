//! Minimal configuration module for filemate core
//!
//! Only exports pure data types. All loading logic is in CLI layer.

pub mod types;

pub use types::{ApiKey, ModelParams, Protocol, ResolvedLlmConfig};

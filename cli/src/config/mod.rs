//! Configuration discovery for the CLI

pub mod loader;

pub use loader::{CliConfigLoader, CliSettings, RawConfig, DEFAULT_ROOT_DIR};

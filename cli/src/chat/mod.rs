//! Terminal chat surface

pub mod app;
pub mod render;

pub use app::run_chat;
pub use render::{print_banner, print_entry};

/// A person is at the keyboard: prompts are only shown when this holds
pub fn is_interactive() -> bool {
    use std::io::IsTerminal;
    console::user_attended() && std::io::stdin().is_terminal()
}

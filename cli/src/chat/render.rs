//! Terminal rendering for the chat transcript

use colored::Colorize;
use filemate_core::{Role, Transcript, TranscriptEntry};

pub const TITLE: &str = "🗂️ File Management Agent";
pub const INSTRUCTION: &str =
    "Enter a command to interact with the file system using natural language.";
pub const INPUT_PROMPT: &str = "Enter your command here...";

pub fn print_banner() {
    println!("{}", TITLE.bold());
    println!("{}", INSTRUCTION.dimmed());
    println!();
}

/// One transcript entry as a printable block
pub fn render_entry(entry: &TranscriptEntry) -> String {
    if entry.is_error {
        return entry.content.red().to_string();
    }

    match entry.role {
        Role::User => format!("{} {}", "🧑 You:".bold().cyan(), entry.content),
        Role::Assistant => format!("{} {}", "🤖 Agent:".bold().green(), entry.content),
    }
}

pub fn print_entry(entry: &TranscriptEntry) {
    println!("{}", render_entry(entry));
}

pub fn print_transcript(transcript: &Transcript) {
    for entry in transcript {
        print_entry(entry);
    }
}

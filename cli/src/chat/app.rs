//! Interactive chat loop

use super::render::{print_entry, print_transcript, INPUT_PROMPT};
use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use filemate_core::{handle_turn, Agent, ChatSession, TranscriptEntry, TurnOutcome};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Where user commands come from
enum CommandInput {
    /// Line editor prompt on a terminal
    Terminal,
    /// Plain lines, e.g. piped stdin
    Lines(Lines<BufReader<Stdin>>),
}

impl CommandInput {
    fn detect() -> Self {
        if super::is_interactive() {
            CommandInput::Terminal
        } else {
            CommandInput::Lines(BufReader::new(tokio::io::stdin()).lines())
        }
    }

    /// Next command, or `None` at end of input
    async fn next(&mut self) -> Result<Option<String>> {
        match self {
            CommandInput::Terminal => {
                let read = tokio::task::spawn_blocking(|| {
                    Input::<String>::with_theme(&ColorfulTheme::default())
                        .with_prompt(INPUT_PROMPT)
                        .allow_empty(true)
                        .report(false)
                        .interact_text()
                })
                .await?;
                match read {
                    Ok(line) => Ok(Some(line)),
                    // Ctrl-D / closed terminal
                    Err(e) => {
                        tracing::debug!("Input closed: {}", e);
                        Ok(None)
                    }
                }
            }
            CommandInput::Lines(lines) => Ok(lines.next_line().await?),
        }
    }
}

fn is_exit_command(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "exit" | "quit")
}

/// Run the chat until the user exits. The transcript is dropped on return.
pub async fn run_chat(agent: &mut dyn Agent) -> Result<()> {
    let mut session = ChatSession::new();
    tracing::debug!(session = %session.id, "Chat session started");
    print_transcript(session.transcript());

    let mut input = CommandInput::detect();
    loop {
        println!();
        let Some(line) = input.next().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit_command(line) {
            break;
        }

        print_entry(&TranscriptEntry::user(line));
        match handle_turn(&mut session, agent, line).await {
            TurnOutcome::Ignored => continue,
            TurnOutcome::Answered(_) | TurnOutcome::Failed(_) => {
                if let Some(entry) = session.transcript().last() {
                    print_entry(entry);
                }
            }
        }
    }

    println!("{}", "Goodbye!".dimmed());
    Ok(())
}

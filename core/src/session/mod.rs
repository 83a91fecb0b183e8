//! Chat session: one transcript and the turn handler that feeds it

pub mod transcript;

pub use transcript::{Role, Transcript, TranscriptEntry};

use crate::agent::{Agent, AgentExecution};
use uuid::Uuid;

/// First assistant turn of every session
pub const GREETING: &str = "Hi, I am a file manager agent. How can I assist you today?";

/// A single conversation with the user
#[derive(Debug, Clone)]
pub struct ChatSession {
    pub id: Uuid,
    transcript: Transcript,
}

impl ChatSession {
    /// Start a session seeded with the greeting
    pub fn new() -> Self {
        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::assistant(GREETING));
        Self {
            id: Uuid::new_v4(),
            transcript,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened to one submission
#[derive(Debug)]
pub enum TurnOutcome {
    /// Blank input; nothing was appended
    Ignored,
    /// The agent answered, or stopped at a limit
    Answered(AgentExecution),
    /// The run failed and an error turn was recorded
    Failed(String),
}

impl TurnOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, TurnOutcome::Failed(_))
    }
}

/// Run one user submission against the agent and record both sides of it.
///
/// Failures never escape: they become an assistant turn flagged `is_error`, so
/// the session can keep going.
pub async fn handle_turn(
    session: &mut ChatSession,
    agent: &mut dyn Agent,
    input: &str,
) -> TurnOutcome {
    let input = input.trim();
    if input.is_empty() {
        return TurnOutcome::Ignored;
    }

    session.transcript.push(TranscriptEntry::user(input));
    tracing::debug!(session = %session.id, "Handling turn");

    match agent.execute_task(input).await {
        Ok(execution) => {
            session
                .transcript
                .push(TranscriptEntry::assistant(execution.final_result.clone()));
            TurnOutcome::Answered(execution)
        }
        Err(e) => {
            tracing::error!(session = %session.id, "Turn failed: {}", e);
            let content = format!("❌ An error occurred: {}", e);
            session.transcript.push(TranscriptEntry::error(content.clone()));
            TurnOutcome::Failed(content)
        }
    }
}

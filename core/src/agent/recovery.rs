//! Bounded recovery from malformed model output
//!
//! ```text
//! AwaitingAction -> GotMalformedOutput -> Retrying -> AwaitingAction
//!                                      \-> Exhausted
//! ```
//!
//! A well-formed decision returns the machine to `AwaitingAction` and clears
//! the failure count; only consecutive failures count toward the cap.

use super::parser::ParseError;
use crate::error::AgentError;

#[derive(Debug, Clone, PartialEq)]
pub enum RecoveryState {
    AwaitingAction,
    GotMalformedOutput { failures: usize, error: ParseError },
    Retrying { attempt: usize },
    Exhausted { attempts: usize },
}

/// What the agent loop should do after malformed output
#[derive(Debug)]
pub enum RecoveryAction {
    /// Send `feedback` to the model as an observation and ask again
    Retry { attempt: usize, feedback: String },
    /// Stop the run
    GiveUp(AgentError),
}

#[derive(Debug)]
pub struct ParseRecovery {
    max_failures: usize,
    failures: usize,
    state: RecoveryState,
}

impl ParseRecovery {
    /// `max_failures` consecutive malformed outputs end the run
    pub fn new(max_failures: usize) -> Self {
        Self {
            max_failures,
            failures: 0,
            state: RecoveryState::AwaitingAction,
        }
    }

    pub fn state(&self) -> &RecoveryState {
        &self.state
    }

    pub fn record_success(&mut self) {
        if self.failures > 0 {
            tracing::debug!("Recovered after {} malformed responses", self.failures);
        }
        self.failures = 0;
        self.state = RecoveryState::AwaitingAction;
    }

    pub fn record_failure(&mut self, error: ParseError) -> RecoveryAction {
        self.failures += 1;
        self.state = RecoveryState::GotMalformedOutput {
            failures: self.failures,
            error: error.clone(),
        };

        if self.failures >= self.max_failures {
            self.state = RecoveryState::Exhausted {
                attempts: self.failures,
            };
            return RecoveryAction::GiveUp(AgentError::ParseRetriesExhausted {
                attempts: self.failures,
                last_error: error.to_string(),
            });
        }

        self.state = RecoveryState::Retrying {
            attempt: self.failures,
        };
        RecoveryAction::Retry {
            attempt: self.failures,
            feedback: corrective_feedback(&error),
        }
    }
}

fn corrective_feedback(error: &ParseError) -> String {
    format!(
        "Invalid or incomplete response: {}. Reply with exactly one ```json blob \
         containing \"action\" and \"action_input\", or use the action \"Final Answer\" \
         to reply to the user.",
        error
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_until_cap() {
        let mut recovery = ParseRecovery::new(3);
        assert_eq!(recovery.state(), &RecoveryState::AwaitingAction);

        for attempt in 1..=2 {
            match recovery.record_failure(ParseError::MissingAction) {
                RecoveryAction::Retry {
                    attempt: got,
                    feedback,
                } => {
                    assert_eq!(got, attempt);
                    assert!(feedback.starts_with("Invalid or incomplete response"));
                    assert!(feedback.contains("no \"action\" field"));
                }
                other => panic!("expected retry, got {:?}", other),
            }
            assert_eq!(recovery.state(), &RecoveryState::Retrying { attempt });
        }

        match recovery.record_failure(ParseError::EmptyMessage) {
            RecoveryAction::GiveUp(err) => {
                assert_eq!(
                    err.to_string(),
                    "Could not parse agent output after 3 attempts: the response was empty"
                );
            }
            other => panic!("expected give up, got {:?}", other),
        }
        assert_eq!(recovery.state(), &RecoveryState::Exhausted { attempts: 3 });
    }

    #[test]
    fn test_success_resets_count() {
        let mut recovery = ParseRecovery::new(2);

        assert!(matches!(
            recovery.record_failure(ParseError::EmptyMessage),
            RecoveryAction::Retry { attempt: 1, .. }
        ));
        recovery.record_success();
        assert_eq!(recovery.state(), &RecoveryState::AwaitingAction);

        assert!(matches!(
            recovery.record_failure(ParseError::EmptyMessage),
            RecoveryAction::Retry { attempt: 1, .. }
        ));
        assert!(matches!(
            recovery.record_failure(ParseError::EmptyMessage),
            RecoveryAction::GiveUp(_)
        ));
    }
}

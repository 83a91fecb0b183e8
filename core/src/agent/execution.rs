//! Agent execution result structures

use serde::{Deserialize, Serialize};

/// Final answer used when the run hits the step cap or the turn timeout
pub const STOPPED_MESSAGE: &str = "Agent stopped due to iteration limit or time limit.";

/// Result of agent execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentExecution {
    /// Whether the agent reached a final answer on its own
    pub success: bool,

    /// Final answer shown to the user
    pub final_result: String,

    /// Number of think steps executed
    pub steps_executed: usize,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl AgentExecution {
    /// Create a successful execution result
    pub fn success(final_result: String, steps_executed: usize, duration_ms: u64) -> Self {
        Self {
            success: true,
            final_result,
            steps_executed,
            duration_ms,
        }
    }

    /// The run was cut short by a stop condition
    pub fn stopped(steps_executed: usize, duration_ms: u64) -> Self {
        Self {
            success: false,
            final_result: STOPPED_MESSAGE.to_string(),
            steps_executed,
            duration_ms,
        }
    }
}

//! Task output representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of one executed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Description of the task.
    pub description: String,
    /// Expected output of the task.
    pub expected_output: String,
    /// Summary of the task (first words of the description).
    pub summary: String,
    /// Raw text produced by the agent.
    pub raw: String,
    /// Role of the agent that executed the task.
    pub agent: String,
}

impl TaskOutput {
    /// Create a new TaskOutput with summary generated from the description.
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let summary = Self::generate_summary(&description);
        Self {
            description,
            expected_output: expected_output.into(),
            summary,
            raw: raw.into(),
            agent: agent.into(),
        }
    }

    /// First 10 words of the description followed by "...".
    fn generate_summary(description: &str) -> String {
        let excerpt: String = description
            .split_whitespace()
            .take(10)
            .collect::<Vec<&str>>()
            .join(" ");
        format!("{}...", excerpt)
    }
}

impl fmt::Display for TaskOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

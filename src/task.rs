//! The `Task` struct.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::Agent;
use crate::tasks::task_output::TaskOutput;
use crate::utilities::errors::CrewError;

/// Represents a task to be executed.
///
/// Each task has a description, an expected output, and the role of the
/// agent responsible for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: Uuid,
    /// Descriptive text detailing the task's purpose and execution.
    pub description: String,
    /// Clear definition of expected task outcome.
    pub expected_output: String,
    /// Role of the agent responsible for execution.
    pub agent: Option<String>,
    /// Position of the responsible agent in the crew's agent list. Takes
    /// precedence over the role, which need not be unique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_index: Option<usize>,
    /// Task output, set once the task has run.
    pub output: Option<TaskOutput>,
    /// Start time of the task execution.
    pub start_time: Option<DateTime<Utc>>,
    /// End time of the task execution.
    pub end_time: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new Task with required fields.
    pub fn new(description: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: None,
            agent_index: None,
            output: None,
            start_time: None,
            end_time: None,
        }
    }

    /// Assign the task to the agent with `role`.
    pub fn with_agent(mut self, role: impl Into<String>) -> Self {
        self.agent = Some(role.into());
        self
    }

    /// Assign the task to the crew's `index`-th agent, whose role is `role`.
    pub fn with_agent_at(mut self, index: usize, role: impl Into<String>) -> Self {
        self.agent_index = Some(index);
        self.agent = Some(role.into());
        self
    }

    /// Execute the task with `agent`, recording timing and output.
    pub fn execute_sync(
        &mut self,
        agent: &Agent,
        context: Option<&str>,
    ) -> Result<TaskOutput, CrewError> {
        self.start_time = Some(Utc::now());

        let raw = agent.execute_task(&self.prompt(), context)?;

        let output = TaskOutput::new(
            self.description.clone(),
            self.expected_output.clone(),
            agent.role.clone(),
            raw,
        );
        self.output = Some(output.clone());
        self.end_time = Some(Utc::now());
        Ok(output)
    }

    /// Generate the task prompt.
    pub fn prompt(&self) -> String {
        format!(
            "{}\nExpected Output: {}",
            self.description, self.expected_output
        )
    }

    /// Get the execution duration in seconds, if both start and end times are set.
    pub fn execution_duration(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task(description={}, expected_output={})",
            self.description, self.expected_output
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llms::base_llm::{BaseLLM, LLMMessage};
    use crate::utilities::errors::LLMError;
    use std::sync::Arc;

    #[derive(Debug)]
    struct PromptEcho;

    impl BaseLLM for PromptEcho {
        fn model(&self) -> &str {
            "echo"
        }

        fn call(&self, messages: &[LLMMessage]) -> Result<String, LLMError> {
            Ok(messages[1].content.clone())
        }
    }

    #[test]
    fn test_prompt() {
        let task = Task::new("Summarize", "Three bullets");
        assert_eq!(task.prompt(), "Summarize\nExpected Output: Three bullets");
    }

    #[test]
    fn test_execute_sync_records_output() {
        let agent =
            Agent::new("Echo".into(), "g".into(), "b".into()).with_llm(Arc::new(PromptEcho));
        let mut task = Task::new("Summarize", "Three bullets").with_agent("Echo");
        let out = task.execute_sync(&agent, None).unwrap();

        assert_eq!(out.raw, "Summarize\nExpected Output: Three bullets");
        assert_eq!(out.agent, "Echo");
        assert_eq!(task.output.as_ref(), Some(&out));
        assert!(task.execution_duration().is_some());
    }
}

//! Crew output representation.
//!
//! The result of a crew run: the final text plus every task's output in
//! execution order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tasks::task_output::TaskOutput;

/// The result of a crew execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Raw output of the crew (the last non-empty task output).
    pub raw: String,
    /// Output of each task, in execution order.
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    pub fn new(raw: String, tasks_output: Vec<TaskOutput>) -> Self {
        Self { raw, tasks_output }
    }
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

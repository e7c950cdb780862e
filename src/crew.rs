//! The `Crew` aggregate and its execution engines.
//!
//! A crew is an ordered list of agents and an ordered list of tasks. Each
//! task names its agent by position in the agent list, or failing that by
//! role. Tasks run strictly in order; every task sees the outputs of all
//! earlier tasks as context.

use serde::Serialize;
use uuid::Uuid;

use crate::agent::Agent;
use crate::crews::crew_output::CrewOutput;
use crate::process::Process;
use crate::task::Task;
use crate::tasks::task_output::TaskOutput;
use crate::utilities::errors::CrewError;

/// Separator placed between earlier task outputs in the context string.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Represents a group of agents working on a list of tasks.
#[derive(Debug, Clone, Serialize)]
pub struct Crew {
    /// Unique identifier for the crew.
    pub id: Uuid,
    /// Name of the crew.
    pub name: Option<String>,
    /// Agents that are part of this crew.
    pub agents: Vec<Agent>,
    /// Tasks to be executed, in order.
    pub tasks: Vec<Task>,
    /// The process flow that the crew will follow.
    pub process: Process,
    /// Log each task start and finish at info level.
    pub verbose: bool,
}

impl Crew {
    /// Create a new sequential Crew.
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: Some("crew".to_string()),
            agents,
            tasks,
            process: Process::default(),
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Look up an agent by role.
    pub fn get_agent(&self, role: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.role == role)
    }

    /// Start the crew to work on its assigned tasks.
    pub fn kickoff(&mut self) -> Result<CrewOutput, CrewError> {
        log::info!(
            "Crew {} kickoff: process={}, agents={}, tasks={}",
            self.id,
            self.process,
            self.agents.len(),
            self.tasks.len()
        );
        match self.process {
            Process::Sequential => self.execute_tasks(),
        }
    }

    /// Execute tasks in order and return the crew output.
    fn execute_tasks(&mut self) -> Result<CrewOutput, CrewError> {
        let mut task_outputs: Vec<TaskOutput> = Vec::new();
        let agents = &self.agents;

        for (index, task) in self.tasks.iter_mut().enumerate() {
            let context = if !task_outputs.is_empty() {
                Some(
                    task_outputs
                        .iter()
                        .map(|o| o.raw.clone())
                        .collect::<Vec<String>>()
                        .join(CONTEXT_SEPARATOR),
                )
            } else {
                None
            };

            let agent = match task.agent_index {
                Some(i) => agents.get(i),
                None => task
                    .agent
                    .as_deref()
                    .and_then(|role| agents.iter().find(|a| a.role == role)),
            }
            .ok_or_else(|| CrewError::NoAgentForTask {
                task: task.description.clone(),
            })?;

            if self.verbose {
                log::info!("Task {} started by '{}'", index + 1, agent.role);
            } else {
                log::debug!("Task {} started by '{}'", index + 1, agent.role);
            }

            let task_output = task.execute_sync(agent, context.as_deref())?;

            if self.verbose {
                log::info!(
                    "Task {} finished in {:.2}s",
                    index + 1,
                    task.execution_duration().unwrap_or_default()
                );
            }

            task_outputs.push(task_output);
        }

        Self::create_crew_output(task_outputs)
    }

    /// The crew result is the last non-empty task output.
    fn create_crew_output(task_outputs: Vec<TaskOutput>) -> Result<CrewOutput, CrewError> {
        let raw = task_outputs
            .iter()
            .rev()
            .find(|t| !t.raw.is_empty())
            .map(|t| t.raw.clone())
            .ok_or(CrewError::EmptyOutput)?;

        Ok(CrewOutput::new(raw, task_outputs))
    }
}

impl std::fmt::Display for Crew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Crew(id={}, process={}, number_of_agents={}, number_of_tasks={})",
            self.id,
            self.process,
            self.agents.len(),
            self.tasks.len()
        )
    }
}

// ---------------------------------------------------------------------------
// Execution engines
// ---------------------------------------------------------------------------

/// Runs a synthesized crew to completion.
///
/// The spawner only depends on this trait, so the engine can be swapped for
/// a remote runner or a test double.
pub trait ExecutionEngine: Send + Sync {
    fn run(&self, crew: &mut Crew) -> Result<CrewOutput, CrewError>;
}

/// In-process engine: runs [`Crew::kickoff`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialEngine;

impl ExecutionEngine for SequentialEngine {
    fn run(&self, crew: &mut Crew) -> Result<CrewOutput, CrewError> {
        crew.kickoff()
    }
}

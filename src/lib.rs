//! # Meta-Crew Spawner
//!
//! Turns a free-text task description into a small crew of cooperating
//! agents, runs their subtasks in order against a language model, and
//! returns the final text.
//!
//! The pipeline is:
//!
//! 1. **Classify** the description (`meta_agents::task_parser`): task type,
//!    complexity, domain, requirements, plus model-assisted enrichment.
//! 2. **Suggest agents** (`meta_agents::agent_templates`) and pick a
//!    workflow (`meta_agents::task_templates`).
//! 3. **Synthesize** a sequential crew (`meta_agents::spawner`) and run it
//!    through an [`ExecutionEngine`](crew::ExecutionEngine).
//!
//! Providers, models and credentials live in [`llm`]; the HTTP clients in
//! [`llms`]. The `server` and `crew_spawner` binaries expose the pipeline
//! over HTTP and on the command line.

pub mod agent;
pub mod config;
pub mod crew;
pub mod crews;
pub mod llm;
pub mod llms;
pub mod meta_agents;
pub mod process;
pub mod server;
pub mod task;
pub mod tasks;
pub mod tools;
pub mod utilities;

pub use agent::Agent;
pub use crew::{Crew, ExecutionEngine, SequentialEngine};
pub use crews::crew_output::CrewOutput;
pub use llm::{Provider, ProviderConfig, ProviderRegistry};
pub use llms::base_llm::BaseLLM;
pub use meta_agents::{CrewSpawner, TaskAnalysis};
pub use process::Process;
pub use task::Task;
pub use tasks::task_output::TaskOutput;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

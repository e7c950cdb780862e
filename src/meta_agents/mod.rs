//! Task-to-crew planning.
//!
//! - **Types** (`types`): `TaskAnalysis`, `AgentSuggestion` and the
//!   classification enums.
//! - **Task parser** (`task_parser`): keyword classification plus
//!   model-assisted enrichment.
//! - **Agent templates** (`agent_templates`): agent archetypes and the
//!   suggestion algorithm.
//! - **Task templates** (`task_templates`): per-task-type workflow steps.
//! - **Spawner** (`spawner`): builds and runs a crew for a description.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use meta_crew_spawner::llm::ProviderRegistry;
//! use meta_crew_spawner::meta_agents::spawner::CrewSpawner;
//!
//! let mut spawner = CrewSpawner::new(Arc::new(ProviderRegistry::from_env()));
//! let result = spawner.process_task("Research the market for e-bikes").unwrap();
//! println!("{}", result);
//! for agent in spawner.last_agents_info() {
//!     println!("- {}", agent.role);
//! }
//! ```

pub mod agent_templates;
pub mod spawner;
pub mod task_parser;
pub mod task_templates;
pub mod types;

pub use agent_templates::{AgentTemplate, AgentTemplateCatalog, CombinationValidation};
pub use spawner::{AgentInfo, CrewSpawner};
pub use task_parser::TaskParser;
pub use task_templates::{SubtaskTemplate, TaskTemplate, TaskTemplateCatalog};
pub use types::{AgentSuggestion, AgentType, Complexity, Domain, Priority, TaskAnalysis, TaskType};

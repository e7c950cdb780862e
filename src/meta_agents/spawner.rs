//! Crew spawner.
//!
//! The `CrewSpawner` turns a free-text task description into a running
//! crew: it classifies the task, picks agent archetypes, pairs each agent
//! with a workflow step by position, hands the crew to an execution engine
//! and records what it built.
//!
//! A spawner is a session object. It owns its active provider
//! configuration and bound model; nothing is shared process-wide, so
//! concurrent callers each build their own spawner.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::agent_templates::AgentTemplateCatalog;
use super::task_parser::TaskParser;
use super::task_templates::{SubtaskTemplate, TaskTemplateCatalog};
use super::types::TaskAnalysis;
use crate::agent::Agent;
use crate::crew::{Crew, ExecutionEngine, SequentialEngine};
use crate::llm::{
    LLMFactory, NativeLLMFactory, Provider, ProviderConfig, ProviderInfo, ProviderRegistry,
};
use crate::llms::base_llm::BaseLLM;
use crate::task::Task;
use crate::tools::{NoTools, ToolResolver};
use crate::utilities::errors::{ConfigurationError, SpawnerError};

/// Backstories longer than this are truncated in [`AgentInfo`].
pub const BACKSTORY_PREVIEW_CHARS: usize = 100;

/// Summary of one agent of the last synthesized crew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub role: String,
    pub goal: String,
    /// First 100 characters of the backstory, with "..." when cut.
    pub backstory: String,
}

impl AgentInfo {
    fn from_agent(agent: &Agent) -> Self {
        Self {
            role: agent.role.clone(),
            goal: agent.goal.clone(),
            backstory: truncate_backstory(&agent.backstory),
        }
    }
}

fn truncate_backstory(backstory: &str) -> String {
    if backstory.chars().count() > BACKSTORY_PREVIEW_CHARS {
        let head: String = backstory.chars().take(BACKSTORY_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        backstory.to_string()
    }
}

/// Workflow step for agents beyond the template's subtask count.
fn fallback_subtask(description: &str) -> SubtaskTemplate {
    SubtaskTemplate {
        description: format!("Support the team in completing: {}", description),
        expected_output: "A comprehensive contribution to the overall objective".to_string(),
    }
}

/// Builds and runs crews for task descriptions.
pub struct CrewSpawner {
    registry: Arc<ProviderRegistry>,
    llm_factory: Arc<dyn LLMFactory>,
    engine: Arc<dyn ExecutionEngine>,
    tools: Arc<dyn ToolResolver>,
    task_parser: TaskParser,
    agent_templates: AgentTemplateCatalog,
    task_templates: TaskTemplateCatalog,
    active: Option<ProviderConfig>,
    llm: Option<Arc<dyn BaseLLM>>,
    last_agents: Vec<AgentInfo>,
    last_execution_time: f64,
}

impl fmt::Debug for CrewSpawner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrewSpawner")
            .field("active", &self.active)
            .field("last_agents", &self.last_agents)
            .field("last_execution_time", &self.last_execution_time)
            .finish_non_exhaustive()
    }
}

impl CrewSpawner {
    /// Spawner configured with the registry's default provider.
    ///
    /// When no provider has a credential the spawner is left unconfigured
    /// and a warning is logged; any later analysis fails until
    /// [`configure`](Self::configure) succeeds.
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        let mut spawner = Self::unconfigured(registry);
        if let Err(e) = spawner.configure_default() {
            log::warn!("{}", e);
        }
        spawner
    }

    /// Spawner with no active model.
    pub fn unconfigured(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            llm_factory: Arc::new(NativeLLMFactory),
            engine: Arc::new(SequentialEngine),
            tools: Arc::new(NoTools),
            task_parser: TaskParser::new(),
            agent_templates: AgentTemplateCatalog::new(),
            task_templates: TaskTemplateCatalog::new(),
            active: None,
            llm: None,
            last_agents: Vec::new(),
            last_execution_time: 0.0,
        }
    }

    pub fn with_llm_factory(mut self, factory: Arc<dyn LLMFactory>) -> Self {
        self.llm_factory = factory;
        self
    }

    pub fn with_engine(mut self, engine: Arc<dyn ExecutionEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_tool_resolver(mut self, tools: Arc<dyn ToolResolver>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_agent_templates(mut self, catalog: AgentTemplateCatalog) -> Self {
        self.agent_templates = catalog;
        self
    }

    pub fn with_task_templates(mut self, catalog: TaskTemplateCatalog) -> Self {
        self.task_templates = catalog;
        self
    }

    // -----------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------

    /// Select a provider and model for this session.
    ///
    /// On failure the previous configuration is kept.
    pub fn configure(
        &mut self,
        provider: &str,
        model: Option<&str>,
    ) -> Result<(), ConfigurationError> {
        let config = self.registry.resolve_config(provider, model)?;
        let llm = self.llm_factory.create(&config);
        self.configure_with(config, llm);
        Ok(())
    }

    /// Configure the first provider that has a credential.
    pub fn configure_default(&mut self) -> Result<Provider, ConfigurationError> {
        let provider = self.registry.default_provider()?;
        self.configure(provider.as_str(), None)?;
        Ok(provider)
    }

    /// Install an already-built configuration and model client.
    pub fn configure_with(&mut self, config: ProviderConfig, llm: Arc<dyn BaseLLM>) {
        log::info!(
            "Configured LLM provider={} model={}",
            config.provider,
            config.model
        );
        self.active = Some(config);
        self.llm = Some(llm);
    }

    pub fn active_config(&self) -> Option<&ProviderConfig> {
        self.active.as_ref()
    }

    fn require_llm(&self) -> Result<Arc<dyn BaseLLM>, ConfigurationError> {
        self.llm.clone().ok_or(ConfigurationError::NoLLMConfigured)
    }

    // -----------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------

    /// Classify `description` and attach agent suggestions.
    pub fn analyze_task(&self, description: &str) -> Result<TaskAnalysis, SpawnerError> {
        let llm = self.require_llm()?;
        let mut analysis = self.task_parser.parse_task(description, llm.as_ref());
        analysis.suggested_agents = self.agent_templates.suggest_agents(&analysis);
        log::debug!(
            "Task analysis: type={}, complexity={}, domain={}, agents={:?}",
            analysis.task_type,
            analysis.complexity,
            analysis.domain,
            analysis.agent_types()
        );
        Ok(analysis)
    }

    /// Build a sequential crew for `description`.
    ///
    /// Analyzes the task first when no analysis is supplied. The i-th agent
    /// gets the i-th subtask of the task type's template; agents past the
    /// end of the template get a generic support step.
    pub fn generate_crew(
        &mut self,
        description: &str,
        analysis: Option<TaskAnalysis>,
    ) -> Result<Crew, SpawnerError> {
        let llm = self.require_llm()?;
        let analysis = match analysis {
            Some(a) => a,
            None => self.analyze_task(description)?,
        };

        let mut agents = Vec::with_capacity(analysis.suggested_agents.len());
        for suggestion in &analysis.suggested_agents {
            let template = self.agent_templates.get_template(suggestion.agent_type)?;
            let agent = Agent::from_template(suggestion.agent_type, template)
                .with_llm(llm.clone())
                .with_verbose(true)
                .with_tools(self.tools.tools_for(suggestion.agent_type));
            agents.push(agent);
        }

        let template = self.task_templates.get_template(analysis.task_type);
        let tasks: Vec<Task> = agents
            .iter()
            .enumerate()
            .map(|(i, agent)| match template.subtasks.get(i) {
                Some(subtask) => Task::new(
                    format!("{}\n\nOriginal request: {}", subtask.description, description),
                    subtask.expected_output.clone(),
                ),
                None => {
                    let fallback = fallback_subtask(description);
                    Task::new(fallback.description, fallback.expected_output)
                }
            }
            .with_agent_at(i, agent.role.clone()))
            .collect();

        self.last_agents = agents.iter().map(AgentInfo::from_agent).collect();

        log::info!(
            "Generated crew: {} agents, {} tasks ({})",
            agents.len(),
            tasks.len(),
            template.name
        );

        Ok(Crew::new(agents, tasks).with_verbose(true))
    }

    /// Analyze, synthesize and execute; return the crew's final text.
    ///
    /// Any failure is wrapped in [`SpawnerError::TaskProcessing`]. The
    /// elapsed time is recorded whether or not the run succeeds.
    pub fn process_task(&mut self, description: &str) -> Result<String, SpawnerError> {
        let start = Instant::now();
        let result = self.run_pipeline(description);
        self.last_execution_time = start.elapsed().as_secs_f64();

        match result {
            Ok(output) => {
                log::info!("Task processed in {:.2}s", self.last_execution_time);
                Ok(output)
            }
            Err(e) => {
                log::error!(
                    "Task processing failed after {:.2}s: {}",
                    self.last_execution_time,
                    e
                );
                Err(SpawnerError::TaskProcessing(e.to_string()))
            }
        }
    }

    fn run_pipeline(&mut self, description: &str) -> Result<String, SpawnerError> {
        let analysis = self.analyze_task(description)?;
        let mut crew = self.generate_crew(description, Some(analysis))?;
        let output = self.engine.run(&mut crew)?;
        Ok(output.raw)
    }

    // -----------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------

    /// Agents of the most recently generated crew.
    pub fn last_agents_info(&self) -> &[AgentInfo] {
        &self.last_agents
    }

    /// Wall time of the most recent `process_task` call, in seconds.
    pub fn last_execution_time(&self) -> f64 {
        self.last_execution_time
    }

    pub fn list_providers(&self) -> Vec<ProviderInfo> {
        self.registry.list_providers()
    }
}

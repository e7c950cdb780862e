//! The `Agent` struct.
//!
//! An agent turns a task prompt into text by calling its bound model with a
//! persona system prompt built from its role, backstory and goal.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::llms::base_llm::{BaseLLM, LLMMessage};
use crate::meta_agents::agent_templates::AgentTemplate;
use crate::meta_agents::types::AgentType;
use crate::utilities::errors::CrewError;

/// Represents an agent in a crew.
///
/// Each agent has a role, a goal, a backstory, and an optional language
/// model. An agent without a model cannot execute tasks.
#[derive(Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier for the agent.
    pub id: Uuid,
    /// Role of the agent. Tasks reference their agent by role.
    pub role: String,
    /// Objective of the agent.
    pub goal: String,
    /// Backstory of the agent.
    pub backstory: String,
    /// Enable agent to delegate and ask questions among each other.
    pub allow_delegation: bool,
    /// Verbose mode for the agent execution.
    pub verbose: bool,
    /// Tools at the agent's disposal (stored as tool names).
    pub tools: Vec<String>,
    /// Archetype the agent was built from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<AgentType>,
    /// Language model that will run the agent.
    #[serde(skip)]
    pub llm: Option<Arc<dyn BaseLLM>>,
}

impl Agent {
    /// Create a new Agent with required fields.
    pub fn new(role: String, goal: String, backstory: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            goal,
            backstory,
            allow_delegation: false,
            verbose: false,
            tools: Vec::new(),
            agent_type: None,
            llm: None,
        }
    }

    /// Build an agent from a catalog template.
    pub fn from_template(agent_type: AgentType, template: AgentTemplate) -> Self {
        let mut agent = Self::new(template.role, template.goal, template.backstory);
        agent.allow_delegation = template.allow_delegation;
        agent.agent_type = Some(agent_type);
        agent
    }

    pub fn with_llm(mut self, llm: Arc<dyn BaseLLM>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Persona instructions sent as the system message.
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!(
            "You are {}.\n{}\n\nYour goal: {}",
            self.role, self.backstory, self.goal
        );
        if !self.tools.is_empty() {
            prompt.push_str(&format!("\n\nAvailable tools: {}", self.tools.join(", ")));
        }
        prompt
    }

    /// Execute a task prompt and return the model's answer.
    ///
    /// `context` carries the outputs of earlier tasks in the crew.
    pub fn execute_task(
        &self,
        task_prompt: &str,
        context: Option<&str>,
    ) -> Result<String, CrewError> {
        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| CrewError::AgentWithoutLLM(self.role.clone()))?;

        if self.verbose {
            log::info!("Agent '{}' starting task", self.role);
        }
        log::debug!("Agent '{}' executing task: {}", self.role, task_prompt);

        let user_prompt = match context {
            Some(ctx) if !ctx.is_empty() => format!("{}\n\nContext:\n{}", task_prompt, ctx),
            _ => task_prompt.to_string(),
        };

        let messages = [
            LLMMessage::system(self.system_prompt()),
            LLMMessage::user(user_prompt),
        ];
        let output = llm.call(&messages)?;

        if self.verbose {
            log::info!("Agent '{}' finished task ({} chars)", self.role, output.len());
        }
        Ok(output)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("agent_type", &self.agent_type)
            .field("allow_delegation", &self.allow_delegation)
            .field("tools", &self.tools)
            .field("llm", &self.llm.as_ref().map(|l| l.model().to_string()))
            .finish()
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Agent(role={}, goal={}, backstory={})",
            self.role, self.goal, self.backstory
        )
    }
}

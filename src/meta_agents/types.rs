//! Core types for task analysis and crew synthesis.
//!
//! ```text
//! description ──► TaskAnalysis { task_type, complexity, domain, ... }
//!                      └── suggested_agents: [AgentSuggestion { type, priority, reason }]
//! ```
//!
//! Every enum serializes as its `snake_case` name, which is also the key used
//! in the template catalogs and in the HTTP API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utilities::errors::TemplateError;

// ---------------------------------------------------------------------------
// Classification enums
// ---------------------------------------------------------------------------

/// Kind of work a task description asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Research,
    ContentCreation,
    Analysis,
    Planning,
    ProblemSolving,
    Creative,
    General,
}

impl TaskType {
    /// Keyword-matched types in classification order. `General` is the
    /// fallback and is not listed.
    pub const CLASSIFIED: [TaskType; 6] = [
        TaskType::Research,
        TaskType::ContentCreation,
        TaskType::Analysis,
        TaskType::Planning,
        TaskType::ProblemSolving,
        TaskType::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::ContentCreation => "content_creation",
            Self::Analysis => "analysis",
            Self::Planning => "planning",
            Self::ProblemSolving => "problem_solving",
            Self::Creative => "creative",
            Self::General => "general",
        }
    }

    /// Look a task type up by its `snake_case` name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::CLASSIFIED
            .iter()
            .chain(std::iter::once(&TaskType::General))
            .copied()
            .find(|t| t.as_str() == name)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated difficulty of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    /// Classification order.
    pub const ALL: [Complexity; 3] = [Complexity::Simple, Complexity::Medium, Complexity::Complex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject area of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Technology,
    Business,
    Science,
    Creative,
    Education,
    Health,
    General,
}

impl Domain {
    /// Keyword-matched domains in classification order.
    pub const CLASSIFIED: [Domain; 6] = [
        Domain::Technology,
        Domain::Business,
        Domain::Science,
        Domain::Creative,
        Domain::Education,
        Domain::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Business => "business",
            Self::Science => "science",
            Self::Creative => "creative",
            Self::Education => "education",
            Self::Health => "health",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of a suggested agent or a task template.
///
/// Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

// ---------------------------------------------------------------------------
// Agent archetypes
// ---------------------------------------------------------------------------

/// Key into the agent template catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Researcher,
    Writer,
    Analyst,
    Strategist,
    Creative,
    ProblemSolver,
    Coordinator,
    QualityAssurance,
}

impl AgentType {
    pub const ALL: [AgentType; 8] = [
        AgentType::Researcher,
        AgentType::Writer,
        AgentType::Analyst,
        AgentType::Strategist,
        AgentType::Creative,
        AgentType::ProblemSolver,
        AgentType::Coordinator,
        AgentType::QualityAssurance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Researcher => "researcher",
            Self::Writer => "writer",
            Self::Analyst => "analyst",
            Self::Strategist => "strategist",
            Self::Creative => "creative",
            Self::ProblemSolver => "problem_solver",
            Self::Coordinator => "coordinator",
            Self::QualityAssurance => "quality_assurance",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TemplateError::UnknownAgentType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// One agent the catalog recommends for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSuggestion {
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    pub priority: Priority,
    pub reason: String,
}

impl AgentSuggestion {
    pub fn new(agent_type: AgentType, priority: Priority, reason: impl Into<String>) -> Self {
        Self {
            agent_type,
            priority,
            reason: reason.into(),
        }
    }
}

/// Structured classification of a task description.
///
/// Free-form fields returned by the model-assisted enrichment stage live in
/// `enrichment` and serialize flattened next to the typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAnalysis {
    pub task_type: TaskType,
    pub complexity: Complexity,
    pub domain: Domain,
    pub estimated_time: String,
    pub word_count: usize,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub suggested_agents: Vec<AgentSuggestion>,
    #[serde(flatten)]
    pub enrichment: Map<String, Value>,
}

impl TaskAnalysis {
    /// Analysis with the given classification and no requirements,
    /// suggestions or enrichment.
    pub fn new(task_type: TaskType, complexity: Complexity, domain: Domain) -> Self {
        Self {
            task_type,
            complexity,
            domain,
            estimated_time: String::new(),
            word_count: 0,
            requirements: Vec::new(),
            suggested_agents: Vec::new(),
            enrichment: Map::new(),
        }
    }

    /// Agent types of the suggestions, in order.
    pub fn agent_types(&self) -> Vec<AgentType> {
        self.suggested_agents.iter().map(|s| s.agent_type).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_agent_type_from_str() {
        assert_eq!(
            "quality_assurance".parse::<AgentType>().unwrap(),
            AgentType::QualityAssurance
        );
        assert_eq!(
            "wizard".parse::<AgentType>().unwrap_err(),
            TemplateError::UnknownAgentType("wizard".into())
        );
    }

    #[test]
    fn test_task_type_names() {
        assert_eq!(TaskType::from_name("problem_solving"), Some(TaskType::ProblemSolving));
        assert_eq!(TaskType::from_name("general"), Some(TaskType::General));
        assert_eq!(TaskType::from_name("cooking"), None);
        assert_eq!(
            serde_json::to_value(TaskType::ContentCreation).unwrap(),
            "content_creation"
        );
    }

    #[test]
    fn test_analysis_serializes_flat() {
        let mut analysis =
            TaskAnalysis::new(TaskType::Research, Complexity::Simple, Domain::Science);
        analysis.suggested_agents.push(AgentSuggestion::new(
            AgentType::Researcher,
            Priority::High,
            "Essential for research tasks",
        ));
        analysis
            .enrichment
            .insert("deliverables".into(), serde_json::json!(["report"]));

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["task_type"], "research");
        assert_eq!(json["suggested_agents"][0]["type"], "researcher");
        assert_eq!(json["suggested_agents"][0]["priority"], "high");
        assert_eq!(json["deliverables"][0], "report");
    }
}

//! Agent template catalog.
//!
//! Eight built-in agent archetypes, each a role/goal/backstory persona with
//! a declared skill set, plus the algorithm that picks which archetypes a
//! task needs. Templates are handed out as owned copies so a caller can
//! tweak one for a single run without touching the catalog.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::meta_agents::types::{
    AgentSuggestion, AgentType, Complexity, Domain, Priority, TaskAnalysis, TaskType,
};
use crate::utilities::errors::TemplateError;

/// Largest crew `validate_combination` accepts.
pub const MAX_COMBINATION_SIZE: usize = 5;

/// Persona definition for one agent archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTemplate {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub allow_delegation: bool,
    pub skills: Vec<String>,
    /// Kinds of work this archetype is suited to.
    pub best_for: Vec<String>,
}

impl AgentTemplate {
    fn builtin(
        role: &str,
        goal: &str,
        backstory: &str,
        allow_delegation: bool,
        skills: &[&str],
        best_for: &[&str],
    ) -> Self {
        Self {
            role: role.to_string(),
            goal: goal.to_string(),
            backstory: backstory.to_string(),
            allow_delegation,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            best_for: best_for.iter().map(|s| s.to_string()).collect(),
        }
    }
}

static BUILTIN_TEMPLATES: Lazy<HashMap<AgentType, AgentTemplate>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        AgentType::Researcher,
        AgentTemplate::builtin(
            "Senior Research Analyst",
            "Conduct thorough research and gather comprehensive information on the given topic",
            "You are an experienced researcher with expertise in information gathering, data analysis, and source verification. You excel at finding relevant, accurate, and up-to-date information from multiple sources.",
            false,
            &["research", "analysis", "fact-checking"],
            &["research", "investigation", "data gathering"],
        ),
    );
    m.insert(
        AgentType::Writer,
        AgentTemplate::builtin(
            "Expert Content Writer",
            "Create clear, engaging, and well-structured written content based on provided information",
            "You are a skilled writer with expertise in various content formats. You excel at transforming complex information into clear, engaging content that resonates with the target audience.",
            false,
            &["writing", "editing", "content creation"],
            &["content_creation", "writing", "documentation"],
        ),
    );
    m.insert(
        AgentType::Analyst,
        AgentTemplate::builtin(
            "Strategic Data Analyst",
            "Analyze information, identify patterns, and provide actionable insights",
            "You are an analytical expert who excels at processing complex information, identifying trends, and providing strategic recommendations based on data-driven insights.",
            false,
            &["analysis", "pattern recognition", "strategic thinking"],
            &["analysis", "evaluation", "decision making"],
        ),
    );
    m.insert(
        AgentType::Strategist,
        AgentTemplate::builtin(
            "Strategic Planning Expert",
            "Develop comprehensive strategies and actionable plans",
            "You are a strategic planning professional with extensive experience in developing and implementing successful strategies across various domains.",
            true,
            &["strategic planning", "project management", "leadership"],
            &["planning", "strategy", "project management"],
        ),
    );
    m.insert(
        AgentType::Creative,
        AgentTemplate::builtin(
            "Creative Innovation Specialist",
            "Generate creative solutions and innovative ideas",
            "You are a creative professional who excels at thinking outside the box, generating innovative ideas, and finding unique solutions to complex challenges.",
            false,
            &["creativity", "innovation", "brainstorming"],
            &["creative", "innovation", "brainstorming"],
        ),
    );
    m.insert(
        AgentType::ProblemSolver,
        AgentTemplate::builtin(
            "Solution Architect",
            "Identify problems and develop practical, implementable solutions",
            "You are a problem-solving expert who excels at breaking down complex challenges, identifying root causes, and developing practical solutions.",
            false,
            &["problem solving", "critical thinking", "solution design"],
            &["problem_solving", "troubleshooting", "optimization"],
        ),
    );
    m.insert(
        AgentType::Coordinator,
        AgentTemplate::builtin(
            "Project Coordinator",
            "Coordinate team efforts and ensure project objectives are met",
            "You are an experienced project coordinator who excels at managing workflows, facilitating communication, and ensuring all team members work effectively toward common goals.",
            true,
            &["coordination", "communication", "project management"],
            &["coordination", "management", "oversight"],
        ),
    );
    m.insert(
        AgentType::QualityAssurance,
        AgentTemplate::builtin(
            "Quality Assurance Specialist",
            "Review and validate work quality, ensuring high standards are met",
            "You are a quality assurance expert who meticulously reviews work products, identifies areas for improvement, and ensures deliverables meet the highest standards.",
            false,
            &["quality control", "review", "validation"],
            &["review", "validation", "quality control"],
        ),
    );
    m
});

/// Base agent lineup for a task type, in execution order.
pub fn base_agents(task_type: TaskType) -> &'static [AgentType] {
    match task_type {
        TaskType::Research => &[AgentType::Researcher, AgentType::Analyst],
        TaskType::ContentCreation => &[AgentType::Writer, AgentType::Creative],
        TaskType::Analysis => &[AgentType::Analyst, AgentType::Researcher],
        TaskType::Planning => &[AgentType::Strategist, AgentType::Coordinator],
        TaskType::ProblemSolving => &[AgentType::ProblemSolver, AgentType::Analyst],
        TaskType::Creative => &[AgentType::Creative, AgentType::Writer],
        TaskType::General => &[AgentType::Researcher, AgentType::Analyst],
    }
}

/// Outcome of [`AgentTemplateCatalog::validate_combination`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Catalog of agent templates keyed by [`AgentType`].
#[derive(Debug, Clone)]
pub struct AgentTemplateCatalog {
    templates: HashMap<AgentType, AgentTemplate>,
}

impl Default for AgentTemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentTemplateCatalog {
    /// Catalog with the eight built-in templates.
    pub fn new() -> Self {
        Self {
            templates: BUILTIN_TEMPLATES.clone(),
        }
    }

    /// Catalog over a custom template set.
    pub fn with_templates(templates: HashMap<AgentType, AgentTemplate>) -> Self {
        Self { templates }
    }

    /// Owned copy of the template for `agent_type`.
    pub fn get_template(&self, agent_type: AgentType) -> Result<AgentTemplate, TemplateError> {
        self.templates
            .get(&agent_type)
            .cloned()
            .ok_or_else(|| TemplateError::UnknownAgentType(agent_type.to_string()))
    }

    pub fn get_template_by_name(&self, name: &str) -> Result<AgentTemplate, TemplateError> {
        self.get_template(name.parse()?)
    }

    /// Agent types present in the catalog, in declaration order.
    pub fn available_types(&self) -> Vec<AgentType> {
        AgentType::ALL
            .iter()
            .copied()
            .filter(|t| self.templates.contains_key(t))
            .collect()
    }

    /// Recommend agents for an analysis.
    ///
    /// The task type's base lineup comes first at high priority, then a
    /// creative specialist for the creative domain, then a coordinator and
    /// a QA reviewer for complex tasks. The list is stably sorted by
    /// priority and cut to 4 agents for complex tasks, 3 otherwise.
    pub fn suggest_agents(&self, analysis: &TaskAnalysis) -> Vec<AgentSuggestion> {
        let task_type = analysis.task_type;
        let mut suggested: Vec<AgentSuggestion> = base_agents(task_type)
            .iter()
            .map(|t| {
                AgentSuggestion::new(
                    *t,
                    Priority::High,
                    format!("Essential for {} tasks", task_type),
                )
            })
            .collect();

        let has = |list: &[AgentSuggestion], t: AgentType| list.iter().any(|s| s.agent_type == t);

        if analysis.domain == Domain::Creative && !has(&suggested, AgentType::Creative) {
            suggested.push(AgentSuggestion::new(
                AgentType::Creative,
                Priority::Medium,
                "Specialized for creative domain",
            ));
        }

        if analysis.complexity == Complexity::Complex {
            if !has(&suggested, AgentType::Coordinator) {
                suggested.push(AgentSuggestion::new(
                    AgentType::Coordinator,
                    Priority::Medium,
                    "Needed for complex task coordination",
                ));
            }
            if !has(&suggested, AgentType::QualityAssurance) {
                suggested.push(AgentSuggestion::new(
                    AgentType::QualityAssurance,
                    Priority::Low,
                    "Quality validation for complex deliverables",
                ));
            }
        }

        let max_agents = if analysis.complexity == Complexity::Complex {
            4
        } else {
            3
        };

        // sort_by_key is stable: equal priorities keep insertion order
        suggested.sort_by_key(|s| Reverse(s.priority));
        suggested.truncate(max_agents);
        suggested
    }

    /// Sanity-check a proposed lineup given by type name.
    ///
    /// Names not in the catalog count toward the size limits but add no
    /// skills.
    pub fn validate_combination<S: AsRef<str>>(&self, agent_types: &[S]) -> CombinationValidation {
        if agent_types.is_empty() {
            return CombinationValidation {
                valid: false,
                reason: Some("No agents specified".to_string()),
                warning: None,
            };
        }

        if agent_types.len() > MAX_COMBINATION_SIZE {
            return CombinationValidation {
                valid: false,
                reason: Some(format!("Too many agents (max {})", MAX_COMBINATION_SIZE)),
                warning: None,
            };
        }

        if agent_types.len() > 1 {
            let skills: BTreeSet<&str> = agent_types
                .iter()
                .filter_map(|name| name.as_ref().parse::<AgentType>().ok())
                .filter_map(|t| self.templates.get(&t))
                .flat_map(|tpl| tpl.skills.iter().map(String::as_str))
                .collect();

            if skills.len() < 2 {
                return CombinationValidation {
                    valid: true,
                    reason: None,
                    warning: Some(
                        "Agents have overlapping skills - consider diversifying".to_string(),
                    ),
                };
            }
        }

        CombinationValidation {
            valid: true,
            reason: Some("Valid agent combination".to_string()),
            warning: None,
        }
    }
}

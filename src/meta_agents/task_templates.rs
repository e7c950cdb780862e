//! Task template catalog.
//!
//! One workflow template per [`TaskType`]: an ordered list of subtasks, each
//! with a description and an expected output. Subtasks are paired with the
//! suggested agents by position when a crew is synthesized.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::meta_agents::types::{Priority, TaskType};

/// Clause appended to every expected output for "detailed" requirements.
pub const DETAILED_CLAUSE: &str = ". Provide detailed explanations and comprehensive coverage.";

/// One step of a workflow template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskTemplate {
    pub description: String,
    pub expected_output: String,
}

/// Workflow template for one task type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub name: String,
    pub description: String,
    pub subtasks: Vec<SubtaskTemplate>,
    /// Set by [`TaskTemplateCatalog::customize_template`] for urgent work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl TaskTemplate {
    fn builtin(name: &str, description: &str, subtasks: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            subtasks: subtasks
                .iter()
                .map(|(d, e)| SubtaskTemplate {
                    description: d.to_string(),
                    expected_output: e.to_string(),
                })
                .collect(),
            priority: None,
        }
    }

    /// All required fields are non-empty and there is at least one subtask.
    pub fn is_well_formed(&self) -> bool {
        !self.name.is_empty()
            && !self.description.is_empty()
            && !self.subtasks.is_empty()
            && self
                .subtasks
                .iter()
                .all(|s| !s.description.is_empty() && !s.expected_output.is_empty())
    }
}

static BUILTIN_TEMPLATES: Lazy<HashMap<TaskType, TaskTemplate>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        TaskType::Research,
        TaskTemplate::builtin(
            "Research Task",
            "Comprehensive research and analysis workflow",
            &[
                (
                    "Conduct comprehensive research on the given topic. Gather information from multiple reliable sources, verify facts, and compile findings.",
                    "A detailed research report with sources, key findings, and relevant data points",
                ),
                (
                    "Analyze the research findings, identify patterns, trends, and key insights. Provide strategic recommendations based on the data.",
                    "An analytical summary with key insights, trends, and actionable recommendations",
                ),
            ],
        ),
    );
    m.insert(
        TaskType::ContentCreation,
        TaskTemplate::builtin(
            "Content Creation Task",
            "Content development and creation workflow",
            &[
                (
                    "Research the topic and gather relevant information, examples, and supporting data for content creation.",
                    "Research brief with key information, target audience insights, and content requirements",
                ),
                (
                    "Create engaging, well-structured content based on the research. Ensure the content meets the specified requirements and resonates with the target audience.",
                    "High-quality content that meets all requirements and is ready for publication or use",
                ),
            ],
        ),
    );
    m.insert(
        TaskType::Analysis,
        TaskTemplate::builtin(
            "Analysis Task",
            "Comprehensive analysis and evaluation workflow",
            &[
                (
                    "Gather and organize all relevant data, information, and materials needed for the analysis.",
                    "Organized dataset and information summary ready for analysis",
                ),
                (
                    "Conduct thorough analysis, identify patterns, evaluate options, and provide evidence-based conclusions and recommendations.",
                    "Comprehensive analysis report with findings, conclusions, and actionable recommendations",
                ),
            ],
        ),
    );
    m.insert(
        TaskType::Planning,
        TaskTemplate::builtin(
            "Strategic Planning Task",
            "Strategic planning and project organization workflow",
            &[
                (
                    "Analyze requirements, constraints, and objectives. Identify key stakeholders, resources, and success criteria.",
                    "Requirements analysis with clear objectives, constraints, and success criteria",
                ),
                (
                    "Develop a comprehensive strategic plan with timeline, milestones, resource allocation, and risk mitigation strategies.",
                    "Detailed strategic plan with timeline, milestones, resource requirements, and implementation roadmap",
                ),
                (
                    "Coordinate plan implementation, monitor progress, and ensure all elements work together effectively.",
                    "Implementation framework with monitoring protocols and coordination guidelines",
                ),
            ],
        ),
    );
    m.insert(
        TaskType::ProblemSolving,
        TaskTemplate::builtin(
            "Problem Solving Task",
            "Problem identification and solution development workflow",
            &[
                (
                    "Analyze the problem, identify root causes, understand constraints, and define success criteria for solutions.",
                    "Problem analysis with root cause identification and solution requirements",
                ),
                (
                    "Develop and evaluate multiple solution options. Select the best approach and create an implementation plan.",
                    "Solution recommendation with implementation plan, timeline, and expected outcomes",
                ),
            ],
        ),
    );
    m.insert(
        TaskType::Creative,
        TaskTemplate::builtin(
            "Creative Task",
            "Creative ideation and development workflow",
            &[
                (
                    "Research inspiration, analyze requirements, and explore creative possibilities. Generate multiple creative concepts and ideas.",
                    "Creative brief with multiple concepts, inspiration sources, and initial ideas",
                ),
                (
                    "Develop and refine the best creative concepts. Create detailed proposals with visual or written descriptions of the creative solution.",
                    "Refined creative solution with detailed descriptions, rationale, and implementation guidance",
                ),
            ],
        ),
    );
    m.insert(
        TaskType::General,
        TaskTemplate::builtin(
            "General Task",
            "Flexible workflow for various task types",
            &[
                (
                    "Analyze the task requirements, gather necessary information, and plan the approach for completion.",
                    "Task analysis with clear understanding of requirements and planned approach",
                ),
                (
                    "Execute the planned approach, complete the task objectives, and deliver the required outcomes.",
                    "Completed task deliverables that meet all specified requirements",
                ),
            ],
        ),
    );
    m
});

/// Catalog of workflow templates keyed by [`TaskType`].
#[derive(Debug, Clone)]
pub struct TaskTemplateCatalog {
    templates: HashMap<TaskType, TaskTemplate>,
}

impl Default for TaskTemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTemplateCatalog {
    pub fn new() -> Self {
        Self {
            templates: BUILTIN_TEMPLATES.clone(),
        }
    }

    pub fn with_templates(templates: HashMap<TaskType, TaskTemplate>) -> Self {
        Self { templates }
    }

    /// Owned copy of the template for `task_type`.
    ///
    /// Falls back to this catalog's general template, then to the built-in
    /// general template; never fails.
    pub fn get_template(&self, task_type: TaskType) -> TaskTemplate {
        self.templates
            .get(&task_type)
            .or_else(|| self.templates.get(&TaskType::General))
            .or_else(|| BUILTIN_TEMPLATES.get(&TaskType::General))
            .cloned()
            .unwrap_or_else(|| TaskTemplate::builtin("General Task", "", &[]))
    }

    /// Lookup by `snake_case` name; unknown names get the general template.
    pub fn get_template_by_name(&self, name: &str) -> TaskTemplate {
        self.get_template(TaskType::from_name(name).unwrap_or(TaskType::General))
    }

    pub fn available_types(&self) -> Vec<TaskType> {
        TaskType::CLASSIFIED
            .iter()
            .chain(std::iter::once(&TaskType::General))
            .copied()
            .filter(|t| self.templates.contains_key(t))
            .collect()
    }

    /// Template for `task_type` adjusted to the given requirements.
    ///
    /// A requirement mentioning "urgent" raises the priority to high;
    /// otherwise one mentioning "detailed" appends [`DETAILED_CLAUSE`] to
    /// every expected output. Matches are case-insensitive and cumulative.
    pub fn customize_template<S: AsRef<str>>(
        &self,
        task_type: TaskType,
        requirements: &[S],
    ) -> TaskTemplate {
        let mut template = self.get_template(task_type);

        for requirement in requirements {
            let lower = requirement.as_ref().to_lowercase();
            if lower.contains("urgent") {
                template.priority = Some(Priority::High);
            } else if lower.contains("detailed") {
                for subtask in &mut template.subtasks {
                    subtask.expected_output.push_str(DETAILED_CLAUSE);
                }
            }
        }

        template
    }

    /// Whether the template named `task_type` exists and is well formed.
    pub fn validate_template(&self, task_type: &str) -> bool {
        TaskType::from_name(task_type)
            .and_then(|t| self.templates.get(&t))
            .map(TaskTemplate::is_well_formed)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtask_counts() {
        let catalog = TaskTemplateCatalog::new();
        assert_eq!(catalog.get_template(TaskType::Planning).subtasks.len(), 3);
        for t in [
            TaskType::Research,
            TaskType::ContentCreation,
            TaskType::Analysis,
            TaskType::ProblemSolving,
            TaskType::Creative,
            TaskType::General,
        ] {
            assert_eq!(catalog.get_template(t).subtasks.len(), 2, "{}", t);
        }
        assert_eq!(catalog.available_types().len(), 7);
    }

    #[test]
    fn test_unknown_name_falls_back_to_general() {
        let catalog = TaskTemplateCatalog::new();
        assert_eq!(catalog.get_template_by_name("cooking").name, "General Task");
        assert_eq!(catalog.get_template_by_name("research").name, "Research Task");

        let sparse = TaskTemplateCatalog::with_templates(HashMap::new());
        assert_eq!(sparse.get_template(TaskType::Creative).name, "General Task");
    }

    #[test]
    fn test_templates_are_copies() {
        let catalog = TaskTemplateCatalog::new();
        let mut a = catalog.get_template(TaskType::Research);
        a.subtasks.clear();
        a.name.push('!');
        let b = catalog.get_template(TaskType::Research);
        assert_eq!(b.name, "Research Task");
        assert_eq!(b.subtasks.len(), 2);
    }

    #[test]
    fn test_customize_detailed_is_cumulative() {
        let catalog = TaskTemplateCatalog::new();
        let t = catalog.customize_template(
            TaskType::Research,
            &["Very DETAILED please", "also detailed"],
        );
        let expected = format!(
            "A detailed research report with sources, key findings, and relevant data points{}{}",
            DETAILED_CLAUSE, DETAILED_CLAUSE
        );
        assert_eq!(t.subtasks[0].expected_output, expected);
        assert!(t.subtasks[1].expected_output.ends_with(DETAILED_CLAUSE));
        assert!(t.priority.is_none());

        let untouched = catalog.get_template(TaskType::Research);
        assert!(!untouched.subtasks[0].expected_output.ends_with(DETAILED_CLAUSE));
    }

    #[test]
    fn test_customize_urgent_wins_over_detailed() {
        let catalog = TaskTemplateCatalog::new();
        let t = catalog.customize_template(TaskType::General, &["Urgent and detailed".to_string()]);
        assert_eq!(t.priority, Some(Priority::High));
        assert!(!t.subtasks[0].expected_output.ends_with(DETAILED_CLAUSE));
    }

    #[test]
    fn test_validate_template() {
        let catalog = TaskTemplateCatalog::new();
        assert!(catalog.validate_template("planning"));
        assert!(!catalog.validate_template("cooking"));

        let mut custom = HashMap::new();
        custom.insert(
            TaskType::Research,
            TaskTemplate::builtin("Broken", "no expected output", &[("do it", "")]),
        );
        custom.insert(TaskType::Analysis, TaskTemplate::builtin("Empty", "none", &[]));
        custom.insert(
            TaskType::Planning,
            TaskTemplate::builtin("", "unnamed", &[("do it", "done")]),
        );
        custom.insert(
            TaskType::Creative,
            TaskTemplate::builtin("Undescribed", "", &[("do it", "done")]),
        );
        custom.insert(
            TaskType::ProblemSolving,
            TaskTemplate::builtin("Blank step", "step without text", &[("", "done")]),
        );
        custom.insert(
            TaskType::ContentCreation,
            TaskTemplate::builtin("Fine", "complete", &[("do it", "done")]),
        );
        let catalog = TaskTemplateCatalog::with_templates(custom);
        assert!(!catalog.validate_template("research"));
        assert!(!catalog.validate_template("analysis"));
        assert!(!catalog.validate_template("planning"));
        assert!(!catalog.validate_template("creative"));
        assert!(!catalog.validate_template("problem_solving"));
        assert!(catalog.validate_template("content_creation"));
        assert!(!catalog.validate_template("general"));
    }
}

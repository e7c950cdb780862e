//! Task classifier.
//!
//! Turns a free-text task description into a [`TaskAnalysis`] in two
//! stages:
//!
//! 1. A deterministic keyword pass ([`TaskParser::basic_analysis`]) that
//!    picks the task type, complexity and domain. Each is decided by the
//!    first category, in a fixed order, whose keyword list has any keyword
//!    occurring as a substring of the lower-cased description. There is no
//!    scoring; reordering the tables changes results.
//! 2. An optional model-assisted enrichment ([`TaskParser::llm_analysis`])
//!    that asks the model for a JSON object of extra fields. Enrichment can
//!    degrade to raw text or an error message but never fails the
//!    classification.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::llms::base_llm::{BaseLLM, LLMMessage};
use crate::meta_agents::types::{Complexity, Domain, TaskAnalysis, TaskType};
use crate::utilities::converter::parse_json_object;

/// Enrichment key holding the raw model response when it had no usable JSON.
pub const LLM_ANALYSIS_KEY: &str = "llm_analysis";

/// Enrichment key holding the error message when the model call failed.
pub const LLM_ANALYSIS_ERROR_KEY: &str = "llm_analysis_error";

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are an expert task analyzer for AI crew generation.
Analyze the given task and provide a JSON response with the following structure:
{
    \"specific_requirements\": [\"list\", \"of\", \"specific\", \"requirements\"],
    \"key_skills_needed\": [\"skill1\", \"skill2\", \"skill3\"],
    \"deliverables\": [\"what\", \"should\", \"be\", \"delivered\"],
    \"challenges\": [\"potential\", \"challenges\"],
    \"success_criteria\": [\"how\", \"to\", \"measure\", \"success\"]
}

Focus on practical aspects that would help determine what types of AI agents would be most effective.";

const TASK_TYPE_KEYWORDS: [(TaskType, &[&str]); 6] = [
    (
        TaskType::Research,
        &["research", "investigate", "study", "analyze", "explore", "examine"],
    ),
    (
        TaskType::ContentCreation,
        &["write", "create", "generate", "produce", "draft", "compose"],
    ),
    (
        TaskType::Analysis,
        &["analyze", "evaluate", "assess", "review", "compare", "examine"],
    ),
    (
        TaskType::Planning,
        &["plan", "strategy", "organize", "design", "outline", "schedule"],
    ),
    (
        TaskType::ProblemSolving,
        &["solve", "fix", "resolve", "troubleshoot", "debug", "optimize"],
    ),
    (
        TaskType::Creative,
        &["design", "creative", "brainstorm", "innovate", "imagine", "conceptualize"],
    ),
];

const COMPLEXITY_KEYWORDS: [(Complexity, &[&str]); 3] = [
    (Complexity::Simple, &["simple", "basic", "quick", "brief", "short"]),
    (
        Complexity::Medium,
        &["detailed", "comprehensive", "thorough", "complete"],
    ),
    (
        Complexity::Complex,
        &["complex", "advanced", "in-depth", "extensive", "sophisticated"],
    ),
];

const DOMAIN_KEYWORDS: [(Domain, &[&str]); 6] = [
    (
        Domain::Technology,
        &["tech", "software", "programming", "machine learning", "data"],
    ),
    (
        Domain::Business,
        &["business", "marketing", "sales", "finance", "strategy", "management"],
    ),
    (
        Domain::Science,
        &["science", "research", "study", "experiment", "hypothesis"],
    ),
    (
        Domain::Creative,
        &["creative", "design", "art", "content", "writing", "storytelling"],
    ),
    (
        Domain::Education,
        &["education", "learning", "teaching", "curriculum", "training"],
    ),
    (
        Domain::Health,
        &["health", "medical", "wellness", "fitness", "healthcare"],
    ),
];

static REQUIREMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"must\s+(\w+(?:\s+\w+)*)",
        r"should\s+(\w+(?:\s+\w+)*)",
        r"need(?:s)?\s+to\s+(\w+(?:\s+\w+)*)",
        r"require(?:s)?\s+(\w+(?:\s+\w+)*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("requirement pattern is a valid regex"))
    .collect()
});

/// First category whose keyword list hits `text`.
fn first_match<T: Copy>(text: &str, table: &[(T, &[&str])]) -> Option<T> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
}

/// Time estimate from complexity and description length.
///
/// `simple` or fewer than 20 words wins first; then `complex` or more than
/// 50 words.
pub fn estimate_time(complexity: Complexity, word_count: usize) -> &'static str {
    if complexity == Complexity::Simple || word_count < 20 {
        "5-15 minutes"
    } else if complexity == Complexity::Complex || word_count > 50 {
        "30-60 minutes"
    } else {
        "15-30 minutes"
    }
}

/// Keyword-driven task classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskParser;

impl TaskParser {
    pub fn new() -> Self {
        Self
    }

    /// Classify `description` and enrich the result with `llm`.
    ///
    /// `suggested_agents` is left empty; the agent catalog fills it in.
    pub fn parse_task(&self, description: &str, llm: &dyn BaseLLM) -> TaskAnalysis {
        let mut analysis = self.basic_analysis(description);
        let enrichment = self.llm_analysis(description, llm);
        merge_enrichment(&mut analysis, enrichment);
        analysis
    }

    /// Rule-based classification only.
    pub fn basic_analysis(&self, description: &str) -> TaskAnalysis {
        let lower = description.to_lowercase();

        let task_type = first_match(&lower, &TASK_TYPE_KEYWORDS).unwrap_or(TaskType::General);
        let complexity = first_match(&lower, &COMPLEXITY_KEYWORDS).unwrap_or_default();
        let domain = first_match(&lower, &DOMAIN_KEYWORDS).unwrap_or(Domain::General);

        let word_count = description.split_whitespace().count();

        let mut analysis = TaskAnalysis::new(task_type, complexity, domain);
        analysis.word_count = word_count;
        analysis.estimated_time = estimate_time(complexity, word_count).to_string();
        analysis.requirements = self.extract_requirements(description);
        analysis
    }

    /// Ask the model for extra analysis fields.
    ///
    /// Returns the parsed JSON object, or a single `llm_analysis` entry with
    /// the raw response when no object could be parsed, or a single
    /// `llm_analysis_error` entry when the call itself failed.
    pub fn llm_analysis(&self, description: &str, llm: &dyn BaseLLM) -> Map<String, Value> {
        let messages = [
            LLMMessage::system(ANALYSIS_SYSTEM_PROMPT),
            LLMMessage::user(format!("Analyze this task: {}", description)),
        ];

        let mut fallback = Map::new();
        match llm.call(&messages) {
            Ok(content) => match parse_json_object(&content) {
                Ok(map) => map,
                Err(e) => {
                    log::debug!("Enrichment response had no usable JSON: {}", e);
                    fallback.insert(LLM_ANALYSIS_KEY.to_string(), Value::String(content));
                    fallback
                }
            },
            Err(e) => {
                log::warn!("LLM analysis failed: {}", e);
                fallback.insert(LLM_ANALYSIS_ERROR_KEY.to_string(), Value::String(e.to_string()));
                fallback
            }
        }
    }

    /// Phrases following "must", "should", "need(s) to" and "require(s)".
    ///
    /// Patterns are applied in that order to the lower-cased description;
    /// each match runs greedily to the last word it can reach.
    pub fn extract_requirements(&self, description: &str) -> Vec<String> {
        let lower = description.to_lowercase();
        REQUIREMENT_PATTERNS
            .iter()
            .flat_map(|re| {
                re.captures_iter(&lower)
                    .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Recommended crew size for a task type and complexity.
    pub fn suggested_agent_count(&self, task_type: TaskType, complexity: Complexity) -> usize {
        let base: usize = match task_type {
            TaskType::Planning => 3,
            _ => 2,
        };
        match complexity {
            Complexity::Simple => base.saturating_sub(1).max(1),
            Complexity::Medium => base,
            Complexity::Complex => (base + 1).min(5),
        }
    }
}

/// Merge enrichment fields into `analysis`, enrichment last.
///
/// Classification keys always win: a `task_type`, `complexity` or `domain`
/// the enums do not know becomes `general`, `medium` or `general`. Other
/// typed fields are overwritten when the value has the field's type and
/// are otherwise dropped. `suggested_agents` is always dropped
/// since suggestions are recomputed from the merged analysis. Every other
/// key lands in `analysis.enrichment`.
pub fn merge_enrichment(analysis: &mut TaskAnalysis, enrichment: Map<String, Value>) {
    for (key, value) in enrichment {
        match key.as_str() {
            "task_type" => {
                overwrite_or(&mut analysis.task_type, &key, value, TaskType::General)
            }
            "complexity" => {
                overwrite_or(&mut analysis.complexity, &key, value, Complexity::Medium)
            }
            "domain" => overwrite_or(&mut analysis.domain, &key, value, Domain::General),
            "estimated_time" => overwrite(&mut analysis.estimated_time, &key, value),
            "word_count" => overwrite(&mut analysis.word_count, &key, value),
            "requirements" => overwrite(&mut analysis.requirements, &key, value),
            "suggested_agents" => {}
            _ => {
                analysis.enrichment.insert(key, value);
            }
        }
    }
}

/// Like [`overwrite`], but an unrecognized value becomes `fallback`.
fn overwrite_or<T: DeserializeOwned>(slot: &mut T, key: &str, value: Value, fallback: T) {
    *slot = serde_json::from_value(value).unwrap_or_else(|e| {
        log::debug!("Unrecognized enrichment value for '{}': {}", key, e);
        fallback
    });
}

fn overwrite<T: DeserializeOwned>(slot: &mut T, key: &str, value: Value) {
    match serde_json::from_value(value) {
        Ok(v) => *slot = v,
        Err(e) => log::debug!("Ignoring enrichment field '{}': {}", key, e),
    }
}

//! Tool lookup for synthesized agents.
//!
//! Agents carry tools by name. A [`ToolResolver`] decides which tool names
//! an agent built from a given archetype receives. Synthesized crews use
//! [`NoTools`] unless the caller plugs in something else.

use std::collections::HashMap;

use crate::meta_agents::types::AgentType;

/// Per-archetype tool lookup.
pub trait ToolResolver: Send + Sync {
    /// Tool names for an agent of `agent_type`.
    fn tools_for(&self, agent_type: AgentType) -> Vec<String>;
}

/// Resolver that gives every agent an empty tool list.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTools;

impl ToolResolver for NoTools {
    fn tools_for(&self, _agent_type: AgentType) -> Vec<String> {
        Vec::new()
    }
}

/// Resolver backed by a fixed archetype → tool names map.
#[derive(Debug, Clone, Default)]
pub struct StaticToolResolver {
    tools: HashMap<AgentType, Vec<String>>,
}

impl StaticToolResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add tools for `agent_type`, keeping any already registered.
    pub fn with_tools<I, S>(mut self, agent_type: AgentType, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools
            .entry(agent_type)
            .or_default()
            .extend(tools.into_iter().map(Into::into));
        self
    }
}

impl ToolResolver for StaticToolResolver {
    fn tools_for(&self, agent_type: AgentType) -> Vec<String> {
        self.tools.get(&agent_type).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tools() {
        assert!(NoTools.tools_for(AgentType::Researcher).is_empty());
    }

    #[test]
    fn test_static_resolver() {
        let r = StaticToolResolver::new()
            .with_tools(AgentType::Researcher, ["web_search"])
            .with_tools(AgentType::Researcher, vec!["scrape".to_string()]);
        assert_eq!(r.tools_for(AgentType::Researcher), vec!["web_search", "scrape"]);
        assert!(r.tools_for(AgentType::Writer).is_empty());
    }
}

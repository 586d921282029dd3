//! Core agent trait and configuration.
//!
//! Defined in `quill-common` so the agent and orchestrator crates can both
//! refer to agents without depending on each other.

use serde::{Deserialize, Serialize};

/// Identity shared by every pipeline agent.
///
/// Each agent exposes its own typed entry point (research takes a topic,
/// writing takes research, critique takes a draft); this trait covers what
/// the orchestrator needs to know about all of them uniformly.
pub trait Agent: Send + Sync {
    /// Get the agent's unique identifier.
    fn id(&self) -> &str;

    /// Get the agent's human-readable name.
    fn name(&self) -> &str;

    /// Get the agent's system prompt.
    fn system_prompt(&self) -> &str;

    /// The tracing span this agent logs under.
    fn span(&self) -> &tracing::Span;
}

/// Configuration for agent creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent ID
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Custom system prompt (optional, uses default if not set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Temperature for LLM responses
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens for responses
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

impl AgentConfig {
    /// Build the span an agent with this configuration logs under.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("agent", id = %self.id)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            id: "agent".into(),
            name: "Agent".into(),
            system_prompt: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_defaults_from_partial_json() {
        let config: AgentConfig =
            serde_json::from_str(r#"{"id": "writer", "name": "Writer"}"#).unwrap();
        assert_eq!(config.id, "writer");
        assert!(config.system_prompt.is_none());
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 1024);
    }
}

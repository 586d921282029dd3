//! Critique agent - editorial review of a draft against its research.

use crate::research::ResearchResult;
use quill_common::{Agent, AgentConfig, StageOutput};
use quill_llm::{LlmClient, LlmRequest};
use std::sync::Arc;
use tracing::{Instrument, Span, error, info, warn};

const CRITIQUE_SYSTEM_PROMPT: &str =
    "You are a helpful critic that provides actionable feedback.";

/// Placeholder feedback when the review fails.
pub const FEEDBACK_ERROR: &str = "Error generating feedback.";

/// Critique agent for reviewing drafts.
pub struct CritiqueAgent {
    config: AgentConfig,
    llm: Arc<dyn LlmClient>,
    span: Span,
}

impl CritiqueAgent {
    pub fn new(config: AgentConfig, llm: Arc<dyn LlmClient>) -> Self {
        let span = config.span();
        Self { config, llm, span }
    }

    pub fn with_default_config(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(
            AgentConfig {
                id: "critique".into(),
                name: "Critique Agent".into(),
                system_prompt: None,
                temperature: 0.3,
                max_tokens: 600,
            },
            llm,
        )
    }

    /// Log under `span` instead of the one derived from the agent config.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn build_prompt(draft: &str, research: &ResearchResult) -> String {
        format!(
            "Review the following draft:\n\n\
             {draft}\n\n\
             Research summary:\n{}\n\n\
             Provide:\n\
             1. A brief summary (1–2 lines)\n\
             2. 3 strengths\n\
             3. 3 improvements\n\
             4. A short revised example paragraph.",
            research.condensed_text()
        )
    }

    /// Review `draft` against `research`. Never fails.
    pub async fn critique(&self, draft: &str, research: &ResearchResult) -> StageOutput {
        async {
            info!(
                agent = %self.id(),
                topic = %research.topic,
                draft_len = draft.len(),
                "Reviewing draft"
            );

            let request = LlmRequest::single_turn(
                self.system_prompt(),
                Self::build_prompt(draft, research),
                self.config.temperature,
                self.config.max_tokens,
            );

            match self.llm.complete(request).await {
                Ok(response) if !response.content.trim().is_empty() => {
                    StageOutput::completed(response.content.trim())
                }
                Ok(_) => {
                    warn!(agent = %self.id(), "LLM returned empty feedback");
                    StageOutput::fallback("empty completion", FEEDBACK_ERROR)
                }
                Err(e) => {
                    error!(agent = %self.id(), error = %e, "Critique failed");
                    StageOutput::fallback(e.to_string(), FEEDBACK_ERROR)
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }
}

impl Agent for CritiqueAgent {
    fn id(&self) -> &str {
        &self.config.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn system_prompt(&self) -> &str {
        self.config
            .system_prompt
            .as_deref()
            .unwrap_or(CRITIQUE_SYSTEM_PROMPT)
    }

    fn span(&self) -> &Span {
        &self.span
    }
}

//! Writing agent - article drafting from research.

use crate::research::ResearchResult;
use quill_common::{Agent, AgentConfig, StageOutput};
use quill_llm::{LlmClient, LlmRequest};
use std::sync::Arc;
use tracing::{Instrument, Span, error, info, warn};

const WRITING_SYSTEM_PROMPT: &str = "You are a helpful and creative writer.";

pub const DEFAULT_TONE: &str = "informative";

/// Placeholder draft when generation fails.
pub const DRAFT_ERROR: &str = "Error generating draft.";

/// Writing agent: turns research into a 400–600 word article.
pub struct WritingAgent {
    config: AgentConfig,
    tone: String,
    llm: Arc<dyn LlmClient>,
    span: Span,
}

impl WritingAgent {
    pub fn new(config: AgentConfig, tone: impl Into<String>, llm: Arc<dyn LlmClient>) -> Self {
        let span = config.span();
        Self {
            config,
            tone: tone.into(),
            llm,
            span,
        }
    }

    pub fn with_default_config(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(
            AgentConfig {
                id: "writing".into(),
                name: "Writing Agent".into(),
                system_prompt: None,
                temperature: 0.6,
                max_tokens: 900,
            },
            DEFAULT_TONE,
            llm,
        )
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    /// Log under `span` instead of the one derived from the agent config.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn tone(&self) -> &str {
        &self.tone
    }

    /// Build the single user prompt for `research`.
    pub fn build_prompt(&self, research: &ResearchResult) -> String {
        let lookup = &research.wikipedia;
        let sources = match &lookup.title {
            Some(title) => format!(
                "Wikipedia: {} ({})",
                title,
                lookup.url.as_deref().unwrap_or_default()
            ),
            None => String::new(),
        };

        format!(
            "Write a clear, 400–600 word article on '{}'.\n\
             Tone: {}.\n\
             Use the research below:\n\n\
             {}\n\n\
             Additional sources:\n{}",
            research.topic,
            self.tone,
            research.condensed_text(),
            sources
        )
    }

    /// Draft an article from `research`. Never fails.
    pub async fn run(&self, research: &ResearchResult) -> StageOutput {
        async {
            info!(
                agent = %self.id(),
                topic = %research.topic,
                tone = %self.tone,
                "Generating draft"
            );

            let request = LlmRequest::single_turn(
                self.system_prompt(),
                self.build_prompt(research),
                self.config.temperature,
                self.config.max_tokens,
            );

            match self.llm.complete(request).await {
                Ok(response) if !response.content.trim().is_empty() => {
                    StageOutput::completed(response.content.trim())
                }
                Ok(_) => {
                    warn!(agent = %self.id(), "LLM returned an empty draft");
                    StageOutput::fallback("empty completion", DRAFT_ERROR)
                }
                Err(e) => {
                    error!(agent = %self.id(), error = %e, "Draft generation failed");
                    StageOutput::fallback(e.to_string(), DRAFT_ERROR)
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }
}

impl Agent for WritingAgent {
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
            .unwrap_or(WRITING_SYSTEM_PROMPT)
    }

    fn span(&self) -> &Span {
        &self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLlm;
    use crate::research::LookupResult;

    fn research(title: Option<&str>) -> ResearchResult {
        ResearchResult {
            topic: "Turing Machine".into(),
            wikipedia: LookupResult {
                title: title.map(String::from),
                url: title.map(|_| "https://en.wikipedia.org/wiki/Turing_machine".to_string()),
                summary: "A model of computation.".into(),
                search_results: None,
            },
            condensed: StageOutput::completed("Key facts about Turing machines."),
        }
    }

    #[test]
    fn test_prompt_includes_attribution_for_canonical_hit() {
        let agent = WritingAgent::with_default_config(Arc::new(MockLlm::failing()));
        let prompt = agent.build_prompt(&research(Some("Turing machine")));

        assert!(prompt.starts_with("Write a clear, 400–600 word article on 'Turing Machine'."));
        assert!(prompt.contains("Tone: informative."));
        assert!(prompt.contains("Key facts about Turing machines."));
        assert!(prompt.contains(
            "Additional sources:\n\
             Wikipedia: Turing machine (https://en.wikipedia.org/wiki/Turing_machine)"
        ));
    }

    #[test]
    fn test_prompt_omits_attribution_without_title() {
        let agent = WritingAgent::with_default_config(Arc::new(MockLlm::failing()));
        let prompt = agent.build_prompt(&research(None));
        assert!(!prompt.contains("Wikipedia:"));
        assert!(prompt.ends_with("Additional sources:\n"));
    }

    #[test]
    fn test_tone_override() {
        let agent =
            WritingAgent::with_default_config(Arc::new(MockLlm::failing())).with_tone("playful");
        assert_eq!(agent.tone(), "playful");
        assert!(agent.build_prompt(&research(None)).contains("Tone: playful."));
    }

    #[tokio::test]
    async fn test_draft_is_trimmed() {
        let llm = Arc::new(MockLlm::replying(["\n\nTuring machines are abstract.\n"]));
        let agent = WritingAgent::with_default_config(llm.clone());

        let draft = agent.run(&research(Some("Turing machine"))).await;

        assert_eq!(draft, StageOutput::completed("Turing machines are abstract."));
        let requests = llm.requests();
        assert_eq!(requests[0].max_tokens, Some(900));
        assert_eq!(requests[0].temperature, Some(0.6));
        assert_eq!(requests[0].system_prompt.as_deref(), Some(WRITING_SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn test_failure_yields_placeholder() {
        let agent = WritingAgent::with_default_config(Arc::new(MockLlm::failing()));
        let draft = agent.run(&research(None)).await;

        assert_eq!(draft.text(), "Error generating draft.");
        assert!(draft.failure_reason().unwrap().contains("503"));
    }
}

//! Research agent - encyclopedia lookup and condensation.

use quill_common::{Agent, AgentConfig, StageOutput};
use quill_encyclopedia::Encyclopedia;
use quill_llm::{LlmClient, LlmRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Instrument, Span, error, info, warn};

const RESEARCH_SYSTEM_PROMPT: &str = "You are a concise research summarizer.";

/// Reason recorded when condensation is skipped for lack of material.
pub const NO_SUMMARY_REASON: &str = "no summary available";

/// What the encyclopedia returned for a topic.
///
/// On a canonical hit `title`, `url` and `summary` are set. When the lookup
/// fails, `summary` is empty and `search_results` carries the alternative
/// titles found by keyword search (absent if the search failed too).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<Vec<String>>,
}

/// Output of the research stage, consumed by writing and critique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub topic: String,
    pub wikipedia: LookupResult,
    pub condensed: StageOutput,
}

impl ResearchResult {
    /// The condensed research text, whether or not condensation succeeded.
    pub fn condensed_text(&self) -> &str {
        self.condensed.text()
    }
}

/// Placeholder used when there is nothing to condense.
pub fn no_summary_message(topic: &str) -> String {
    format!("No summary found for {topic}.")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchOptions {
    /// Sentences requested from the encyclopedia summary.
    #[serde(default = "default_sentences")]
    pub sentences: u32,
    /// Candidate titles requested when the canonical lookup fails.
    #[serde(default = "default_search_results")]
    pub search_results: usize,
}

fn default_sentences() -> u32 {
    5
}

fn default_search_results() -> usize {
    3
}

impl Default for ResearchOptions {
    fn default() -> Self {
        Self {
            sentences: default_sentences(),
            search_results: default_search_results(),
        }
    }
}

/// Research agent: looks a topic up, then condenses the summary into key facts.
pub struct ResearchAgent {
    config: AgentConfig,
    options: ResearchOptions,
    llm: Arc<dyn LlmClient>,
    encyclopedia: Arc<dyn Encyclopedia>,
    span: Span,
}

impl ResearchAgent {
    pub fn new(
        config: AgentConfig,
        llm: Arc<dyn LlmClient>,
        encyclopedia: Arc<dyn Encyclopedia>,
    ) -> Self {
        let span = config.span();
        Self {
            config,
            options: ResearchOptions::default(),
            llm,
            encyclopedia,
            span,
        }
    }

    pub fn with_default_config(
        llm: Arc<dyn LlmClient>,
        encyclopedia: Arc<dyn Encyclopedia>,
    ) -> Self {
        Self::new(
            AgentConfig {
                id: "research".into(),
                name: "Research Agent".into(),
                system_prompt: None,
                temperature: 0.2,
                max_tokens: 400,
            },
            llm,
            encyclopedia,
        )
    }

    pub fn with_options(mut self, options: ResearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Log under `span` instead of the one derived from the agent config.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Look `topic` up in the encyclopedia, falling back to keyword search.
    pub async fn lookup(&self, topic: &str) -> LookupResult {
        match self.encyclopedia.page(topic, self.options.sentences).await {
            Ok(page) => LookupResult {
                title: Some(page.title),
                url: Some(page.url),
                summary: page.summary,
                search_results: None,
            },
            Err(e) => {
                warn!(agent = %self.id(), topic = %topic, error = %e, "Encyclopedia lookup failed");
                match self
                    .encyclopedia
                    .search(topic, self.options.search_results)
                    .await
                {
                    Ok(results) => LookupResult {
                        search_results: Some(results),
                        ..Default::default()
                    },
                    Err(e) => {
                        error!(
                            agent = %self.id(),
                            topic = %topic,
                            error = %e,
                            "Encyclopedia search fallback failed"
                        );
                        LookupResult::default()
                    }
                }
            }
        }
    }

    /// Condense a raw summary into a short synthesis with key facts.
    ///
    /// An empty summary skips the completion call entirely. A failed call
    /// falls back to the raw summary unchanged.
    pub async fn condense(&self, raw_summary: &str, topic: &str) -> StageOutput {
        if raw_summary.trim().is_empty() {
            return StageOutput::fallback(NO_SUMMARY_REASON, no_summary_message(topic));
        }

        let request = LlmRequest::single_turn(
            self.system_prompt(),
            format!("Summarize and list 3-5 key facts about '{topic}':\n{raw_summary}"),
            self.config.temperature,
            self.config.max_tokens,
        );

        match self.llm.complete(request).await {
            Ok(response) if !response.content.trim().is_empty() => {
                StageOutput::completed(response.content.trim())
            }
            Ok(_) => {
                warn!(agent = %self.id(), "LLM returned empty condensation, keeping raw summary");
                StageOutput::fallback("empty completion", raw_summary)
            }
            Err(e) => {
                error!(agent = %self.id(), error = %e, "Condense failed, keeping raw summary");
                StageOutput::fallback(e.to_string(), raw_summary)
            }
        }
    }

    /// Run the research stage for `topic`. Never fails.
    pub async fn run(&self, topic: &str) -> ResearchResult {
        async {
            info!(agent = %self.id(), topic = %topic, "Researching topic");
            let wikipedia = self.lookup(topic).await;
            let condensed = self.condense(&wikipedia.summary, topic).await;
            ResearchResult {
                topic: topic.to_string(),
                wikipedia,
                condensed,
            }
        }
        .instrument(self.span.clone())
        .await
    }
}

impl Agent for ResearchAgent {
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
            .unwrap_or(RESEARCH_SYSTEM_PROMPT)
    }

    fn span(&self) -> &Span {
        &self.span
    }
}

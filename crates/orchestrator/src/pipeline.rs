//! The research → write → critique pipeline.

use crate::artifacts::{self, ArtifactRecord};
use crate::config::QuillConfig;
use crate::slug::topic_slug;
use quill_agents::{CritiqueAgent, ResearchAgent, ResearchResult, WritingAgent};
use quill_common::{Result, StageOutput};
use quill_encyclopedia::{Encyclopedia, WikipediaClient};
use quill_llm::{LlmClient, build_llm_client};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

/// Everything a single run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub topic: String,
    pub out_dir: PathBuf,
    pub research: ResearchResult,
    pub draft: StageOutput,
    pub feedback: StageOutput,
    pub artifacts: Vec<ArtifactRecord>,
}

impl PipelineResult {
    /// Names of the stages that fell back instead of completing.
    pub fn degraded_stages(&self) -> Vec<&'static str> {
        [
            ("research", &self.research.condensed),
            ("writing", &self.draft),
            ("critique", &self.feedback),
        ]
        .into_iter()
        .filter(|(_, output)| !output.is_completed())
        .map(|(stage, _)| stage)
        .collect()
    }

    pub fn failed_artifacts(&self) -> impl Iterator<Item = &ArtifactRecord> {
        self.artifacts.iter().filter(|a| !a.is_written())
    }
}

/// Runs the three agents in order and persists their outputs.
///
/// Holds no per-run state, so one instance can be shared behind an `Arc`
/// and serve concurrent runs.
pub struct Orchestrator {
    researcher: ResearchAgent,
    writer: WritingAgent,
    critic: CritiqueAgent,
    output_root: PathBuf,
}

impl Orchestrator {
    pub fn new(
        researcher: ResearchAgent,
        writer: WritingAgent,
        critic: CritiqueAgent,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            researcher,
            writer,
            critic,
            output_root: output_root.into(),
        }
    }

    /// Wire the default agents to the given collaborators.
    pub fn with_clients(
        llm: Arc<dyn LlmClient>,
        encyclopedia: Arc<dyn Encyclopedia>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            ResearchAgent::with_default_config(llm.clone(), encyclopedia),
            WritingAgent::with_default_config(llm.clone()),
            CritiqueAgent::with_default_config(llm),
            output_root,
        )
    }

    /// Build the production pipeline: OpenAI-compatible completions and
    /// Wikipedia lookups.
    ///
    /// Fails with [`quill_common::QuillError::Config`] when no API key is
    /// configured.
    pub fn from_config(config: &QuillConfig) -> Result<Self> {
        let llm = build_llm_client(&config.llm)?;
        let encyclopedia: Arc<dyn Encyclopedia> =
            Arc::new(WikipediaClient::new(&config.encyclopedia)?);

        info!(
            model = %llm.model_name(),
            tone = %config.writer.tone,
            output_dir = %config.output_dir.display(),
            "Pipeline configured"
        );

        Ok(Self::new(
            ResearchAgent::with_default_config(llm.clone(), encyclopedia)
                .with_options(config.research.clone()),
            WritingAgent::with_default_config(llm.clone()).with_tone(config.writer.tone.clone()),
            CritiqueAgent::with_default_config(llm),
            config.output_dir.clone(),
        ))
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Directory a topic's artifacts are written to.
    pub fn out_dir_for(&self, topic: &str) -> PathBuf {
        self.output_root.join(topic_slug(topic))
    }

    /// Run the full pipeline for `topic`.
    ///
    /// Never fails: stage failures surface as [`StageOutput::Fallback`] and
    /// write failures as [`ArtifactRecord::error`].
    pub async fn run(&self, topic: &str) -> PipelineResult {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", %run_id, topic = %topic);

        async {
            info!("Starting pipeline");

            let research = self.researcher.run(topic).await;
            let draft = self.writer.run(&research).await;
            let feedback = self.critic.critique(draft.text(), &research).await;

            let out_dir = self.out_dir_for(topic);
            let artifacts = match artifacts::ensure_dir(&out_dir).await {
                Ok(()) => artifacts::persist(&out_dir, &research, &draft, &feedback).await,
                Err(e) => {
                    error!(
                        out_dir = %out_dir.display(),
                        error = %e,
                        "Failed to create output directory"
                    );
                    artifacts::skip_all(&out_dir, &e.to_string())
                }
            };

            let result = PipelineResult {
                run_id,
                topic: topic.to_string(),
                out_dir,
                research,
                draft,
                feedback,
                artifacts,
            };

            let degraded = result.degraded_stages();
            if degraded.is_empty() {
                info!(out_dir = %result.out_dir.display(), "Pipeline finished");
            } else {
                warn!(
                    out_dir = %result.out_dir.display(),
                    degraded = ?degraded,
                    "Pipeline finished with fallbacks"
                );
            }
            result
        }
        .instrument(span)
        .await
    }
}

//! Persisting pipeline outputs to disk.
//!
//! Layout under a run's output directory:
//!
//! ```text
//! <out_dir>/research.json   pretty-printed ResearchResult
//! <out_dir>/draft.txt       draft text
//! <out_dir>/feedback.txt    feedback text
//! ```

use quill_agents::ResearchResult;
use quill_common::{Result, StageOutput};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const RESEARCH_FILE: &str = "research.json";
pub const DRAFT_FILE: &str = "draft.txt";
pub const FEEDBACK_FILE: &str = "feedback.txt";

/// Outcome of writing one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub name: String,
    pub path: PathBuf,
    /// Set when the write failed or was skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ArtifactRecord {
    pub fn is_written(&self) -> bool {
        self.error.is_none()
    }
}

/// Create `out_dir` (and parents) if it does not exist yet.
pub async fn ensure_dir(out_dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(out_dir).await?;
    Ok(())
}

/// Write the three artifacts into `out_dir`.
///
/// Each file is written independently: a failure is logged and recorded,
/// and the remaining files are still attempted.
pub async fn persist(
    out_dir: &Path,
    research: &ResearchResult,
    draft: &StageOutput,
    feedback: &StageOutput,
) -> Vec<ArtifactRecord> {
    let research_json = serde_json::to_string_pretty(research);

    let mut records = Vec::with_capacity(3);
    records.push(match research_json {
        Ok(json) => write_artifact(out_dir, RESEARCH_FILE, json.as_bytes()).await,
        Err(e) => {
            error!(error = %e, "Failed to encode research");
            skipped(out_dir, RESEARCH_FILE, &e.to_string())
        }
    });
    records.push(write_artifact(out_dir, DRAFT_FILE, draft.text().as_bytes()).await);
    records.push(write_artifact(out_dir, FEEDBACK_FILE, feedback.text().as_bytes()).await);
    records
}

/// Records for every artifact when none could be attempted.
pub fn skip_all(out_dir: &Path, reason: &str) -> Vec<ArtifactRecord> {
    [RESEARCH_FILE, DRAFT_FILE, FEEDBACK_FILE]
        .into_iter()
        .map(|name| skipped(out_dir, name, reason))
        .collect()
}

fn skipped(out_dir: &Path, name: &str, reason: &str) -> ArtifactRecord {
    ArtifactRecord {
        name: name.to_string(),
        path: out_dir.join(name),
        error: Some(reason.to_string()),
    }
}

async fn write_artifact(out_dir: &Path, name: &str, contents: &[u8]) -> ArtifactRecord {
    let path = out_dir.join(name);
    let error = match tokio::fs::write(&path, contents).await {
        Ok(()) => {
            info!(path = %path.display(), "Wrote artifact");
            None
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to write artifact");
            Some(e.to_string())
        }
    };
    ArtifactRecord {
        name: name.to_string(),
        path,
        error,
    }
}

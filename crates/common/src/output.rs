//! Tagged stage outcomes.
//!
//! Every pipeline stage produces text. When the remote call behind a stage
//! fails, the stage still produces text (a fixed placeholder, or whatever raw
//! material it already had), but the outcome is tagged so callers can tell a
//! real answer from a substitute without string matching.

use serde::{Deserialize, Serialize};

/// Outcome of a single pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutput {
    /// The remote call succeeded and produced this content.
    Completed { content: String },

    /// The remote call failed or was skipped; `content` is the substitute.
    Fallback { reason: String, content: String },
}

impl StageOutput {
    pub fn completed(content: impl Into<String>) -> Self {
        Self::Completed {
            content: content.into(),
        }
    }

    pub fn fallback(reason: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Fallback {
            reason: reason.into(),
            content: content.into(),
        }
    }

    /// The text to show or persist, regardless of outcome.
    pub fn text(&self) -> &str {
        match self {
            Self::Completed { content } | Self::Fallback { content, .. } => content,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Why the stage fell back, if it did.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Completed { .. } => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }
}

impl std::fmt::Display for StageOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

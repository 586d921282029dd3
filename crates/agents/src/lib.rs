//! Pipeline agents for Quill.
//!
//! Each agent pairs prompt construction with a single chat-completion call
//! and never lets a remote failure escape:
//!
//! - **Research Agent**: encyclopedia lookup, then condensation into key facts
//! - **Writing Agent**: a 400–600 word article from the research
//! - **Critique Agent**: structured feedback on the draft
//!
//! ```text
//! topic ──► ResearchAgent ──► WritingAgent ──► CritiqueAgent
//!               │                  │                 │
//!               ▼                  ▼                 ▼
//!         ResearchResult         draft           feedback
//! ```

pub mod critique;
pub mod mock;
pub mod research;
pub mod writing;

pub use critique::{CritiqueAgent, FEEDBACK_ERROR};
pub use research::{LookupResult, ResearchAgent, ResearchOptions, ResearchResult};
pub use writing::{DEFAULT_TONE, DRAFT_ERROR, WritingAgent};

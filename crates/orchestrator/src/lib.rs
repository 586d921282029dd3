//! Pipeline controller for Quill.
//!
//! The orchestrator takes a topic through three stages and writes what they
//! produced to a per-topic directory:
//!
//! ```text
//!   topic
//!     │
//!     ▼
//! ┌──────────┐   ┌─────────┐   ┌──────────┐
//! │ Research │──►│ Writing │──►│ Critique │
//! └──────────┘   └─────────┘   └──────────┘
//!     │               │              │
//!     ▼               ▼              ▼
//! research.json    draft.txt    feedback.txt
//!          <output_root>/<slug>/
//! ```
//!
//! Stage failures never abort a run; see [`Orchestrator::run`].

pub mod artifacts;
pub mod config;
pub mod pipeline;
pub mod slug;

pub use artifacts::ArtifactRecord;
pub use config::{QuillConfig, WriterConfig};
pub use pipeline::{Orchestrator, PipelineResult};
pub use slug::topic_slug;

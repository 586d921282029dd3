//! Common types and traits shared across Quill crates.
//!
//! This crate provides the error taxonomy, the tagged stage outcome, and the
//! agent identity trait used by the pipeline stages and the orchestrator.

pub mod error;
pub mod output;
pub mod traits;

pub use error::{QuillError, Result};
pub use output::StageOutput;
pub use traits::{Agent, AgentConfig};

//! Chat-completion client for Quill's agents.
//!
//! Agents depend only on [`LlmClient`]; [`OpenAiClient`] is the production
//! implementation, built from an [`LlmConfig`] by [`build_llm_client`].

pub mod client;
pub mod config;
pub mod openai;

pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, Role, TokenUsage};
pub use config::{LlmConfig, build_llm_client};
pub use openai::OpenAiClient;

use std::sync::Arc;
use std::time::Duration;

use quill_common::{QuillError, Result};
use serde::{Deserialize, Serialize};

use crate::client::LlmClient;
use crate::openai::OpenAiClient;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Usually left unset in files and supplied through `OPENAI_API_KEY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_ms() -> u64 {
    60_000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
            api_url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Build the chat-completion client described by `config`.
///
/// A missing or blank API key is a startup error: no pipeline can run
/// without one.
pub fn build_llm_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            QuillError::Config(
                "Missing OPENAI_API_KEY. Set it in .env or the environment.".to_string(),
            )
        })?;

    let client = OpenAiClient::new(
        config.api_url.clone(),
        config.model.clone(),
        api_key.to_string(),
        Duration::from_millis(config.timeout_ms),
    )?;

    Ok(Arc::new(client))
}

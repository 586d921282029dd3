use async_trait::async_trait;
use quill_common::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// A canonical encyclopedia page resolved for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub url: String,
    /// Plain-text summary, limited to the requested number of sentences.
    pub summary: String,
}

#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Resolve `topic` to a single page and summarize it in `sentences`
    /// sentences. Missing and ambiguous topics are errors.
    async fn page(&self, topic: &str, sentences: u32) -> Result<Page>;

    /// Keyword search returning up to `limit` candidate titles, best first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncyclopediaConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

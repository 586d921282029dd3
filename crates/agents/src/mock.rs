//! Scripted collaborators for tests.
//!
//! Used by this crate's unit tests and by downstream crates (the
//! orchestrator and the web front end) to run the pipeline without network
//! access.

use async_trait::async_trait;
use quill_common::{QuillError, Result};
use quill_encyclopedia::{Encyclopedia, Page};
use quill_llm::{LlmClient, LlmRequest, LlmResponse};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// LLM client that replays scripted replies in order and records requests.
///
/// Once the script runs out every call fails.
pub struct MockLlm {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<LlmRequest>>,
    delay: Option<Duration>,
}

impl MockLlm {
    pub fn scripted(replies: Vec<std::result::Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Wait `delay` before answering each call, like a slow provider.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Succeeds with each of `replies` in turn.
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Fails every call.
    pub fn failing() -> Self {
        Self::scripted(Vec::new())
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(LlmResponse {
                content,
                model: "mock".to_string(),
                usage: None,
                finish_reason: Some("stop".to_string()),
            }),
            Some(Err(message)) => Err(QuillError::Llm(message)),
            None => Err(QuillError::Llm("OpenAI API error 503: mock unavailable".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

/// Encyclopedia with at most one known page and a fixed search result.
pub struct MockEncyclopedia {
    page: Option<Page>,
    search: Option<Vec<String>>,
    page_calls: Mutex<Vec<(String, u32)>>,
}

impl MockEncyclopedia {
    /// Every topic resolves to a page titled `title` with `summary`.
    pub fn with_page(title: &str, summary: &str) -> Self {
        Self {
            page: Some(Page {
                title: title.to_string(),
                url: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
                summary: summary.to_string(),
            }),
            search: Some(vec![title.to_string()]),
            page_calls: Mutex::new(Vec::new()),
        }
    }

    /// Page lookups fail; keyword search returns `titles`.
    pub fn search_only<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            page: None,
            search: Some(titles.into_iter().map(Into::into).collect()),
            page_calls: Mutex::new(Vec::new()),
        }
    }

    /// Both lookup and search fail.
    pub fn failing() -> Self {
        Self {
            page: None,
            search: None,
            page_calls: Mutex::new(Vec::new()),
        }
    }

    /// `(topic, sentences)` for each page lookup so far.
    pub fn page_calls(&self) -> Vec<(String, u32)> {
        self.page_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Encyclopedia for MockEncyclopedia {
    async fn page(&self, topic: &str, sentences: u32) -> Result<Page> {
        self.page_calls
            .lock()
            .unwrap()
            .push((topic.to_string(), sentences));
        self.page
            .clone()
            .ok_or_else(|| QuillError::Lookup(format!("Page '{topic}' does not exist")))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        match &self.search {
            Some(titles) => Ok(titles.iter().take(limit).cloned().collect()),
            None => Err(QuillError::Lookup(format!(
                "Wikipedia request failed: search for '{query}' timed out"
            ))),
        }
    }
}

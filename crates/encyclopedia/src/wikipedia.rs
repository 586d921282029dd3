//! Wikipedia client over the MediaWiki Action API.

use std::time::Duration;

use async_trait::async_trait;
use quill_common::{QuillError, Result};
use serde::Deserialize;
use tracing::debug;

use crate::client::{Encyclopedia, EncyclopediaConfig, Page};

const USER_AGENT: &str = concat!(
    "quill/",
    env!("CARGO_PKG_VERSION"),
    " (research pipeline; https://www.mediawiki.org/wiki/API:Etiquette)"
);

#[derive(Deserialize)]
struct ApiResponse<Q> {
    query: Option<Q>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct ApiError {
    code: String,
    info: String,
}

#[derive(Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<ApiPage>,
}

#[derive(Deserialize)]
struct ApiPage {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
    fullurl: Option<String>,
    pageprops: Option<PageProps>,
}

#[derive(Deserialize)]
struct PageProps {
    disambiguation: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

pub struct WikipediaClient {
    api_url: String,
    http_client: reqwest::Client,
}

impl WikipediaClient {
    pub fn new(config: &EncyclopediaConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| QuillError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_url: config.api_url.clone(),
            http_client,
        })
    }

    async fn query<Q: for<'de> Deserialize<'de>>(&self, params: &[(&str, String)]) -> Result<Q> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(params)
            .send()
            .await
            .map_err(|e| QuillError::Lookup(format!("Wikipedia request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuillError::Lookup(format!("Wikipedia API error {status}")));
        }

        let body: ApiResponse<Q> = response
            .json()
            .await
            .map_err(|e| QuillError::Lookup(format!("Failed to parse Wikipedia response: {e}")))?;

        unwrap_query(body)
    }

    async fn fetch_page(&self, title: &str, sentences: u32) -> Result<Option<Page>> {
        let params = [
            ("action", "query".to_string()),
            ("prop", "extracts|info|pageprops".to_string()),
            ("exintro", "1".to_string()),
            ("explaintext", "1".to_string()),
            ("exsentences", sentences.to_string()),
            ("inprop", "url".to_string()),
            ("ppprop", "disambiguation".to_string()),
            ("redirects", "1".to_string()),
            ("titles", title.to_string()),
            ("format", "json".to_string()),
            ("formatversion", "2".to_string()),
        ];

        let query: PagesQuery = self.query(&params).await?;
        page_from_query(query)
    }
}

fn unwrap_query<Q>(body: ApiResponse<Q>) -> Result<Q> {
    if let Some(err) = body.error {
        return Err(QuillError::Lookup(format!(
            "Wikipedia API error {}: {}",
            err.code, err.info
        )));
    }
    body.query
        .ok_or_else(|| QuillError::Lookup("Wikipedia response has no query section".to_string()))
}

/// Interpret an extracts query. `Ok(None)` means no such title exists.
fn page_from_query(query: PagesQuery) -> Result<Option<Page>> {
    let Some(page) = query.pages.into_iter().next() else {
        return Ok(None);
    };

    if page.missing || page.invalid {
        return Ok(None);
    }
    if page
        .pageprops
        .as_ref()
        .is_some_and(|props| props.disambiguation.is_some())
    {
        return Err(QuillError::Lookup(format!(
            "'{}' is a disambiguation page",
            page.title
        )));
    }

    let summary = page.extract.unwrap_or_default().trim().to_string();
    if summary.is_empty() {
        return Err(QuillError::Lookup(format!(
            "Page '{}' has no summary",
            page.title
        )));
    }

    let url = page.fullurl.unwrap_or_else(|| {
        format!(
            "https://en.wikipedia.org/wiki/{}",
            page.title.replace(' ', "_")
        )
    });

    Ok(Some(Page {
        title: page.title,
        url,
        summary,
    }))
}

fn not_found(topic: &str) -> QuillError {
    QuillError::Lookup(format!("Page '{topic}' does not exist"))
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    /// Free-form topics that are not an exact title are resolved to the top
    /// search hit before giving up.
    async fn page(&self, topic: &str, sentences: u32) -> Result<Page> {
        debug!(topic = %topic, sentences, "Fetching Wikipedia page");

        if let Some(page) = self.fetch_page(topic, sentences).await? {
            return Ok(page);
        }

        let Some(resolved) = self.search(topic, 1).await?.into_iter().next() else {
            return Err(not_found(topic));
        };
        debug!(topic = %topic, resolved = %resolved, "Resolved topic through search");

        self.fetch_page(&resolved, sentences)
            .await?
            .ok_or_else(|| not_found(&resolved))
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        debug!(query = %query, limit, "Searching Wikipedia");

        let params = [
            ("action", "query".to_string()),
            ("list", "search".to_string()),
            ("srsearch", query.to_string()),
            ("srlimit", limit.to_string()),
            ("format", "json".to_string()),
            ("formatversion", "2".to_string()),
        ];

        let result: SearchQuery = self.query(&params).await?;
        Ok(result
            .search
            .into_iter()
            .take(limit)
            .map(|hit| hit.title)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::Query, routing::get};
    use std::collections::HashMap;

    fn parse_pages(json: serde_json::Value) -> Result<PagesQuery> {
        unwrap_query(serde_json::from_value(json).unwrap())
    }

    /// Serve a fake Action API on a random local port and return a client for it.
    async fn client_for(router: Router) -> WikipediaClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        WikipediaClient::new(&EncyclopediaConfig {
            api_url: format!("http://{addr}/w/api.php"),
            timeout_ms: 5_000,
        })
        .unwrap()
    }

    /// An encyclopedia where only `known` has an article and every search
    /// returns `hits`.
    fn encyclopedia_router(known: &'static str, hits: &'static [&'static str]) -> Router {
        Router::new().route(
            "/w/api.php",
            get(move |Query(params): Query<HashMap<String, String>>| async move {
                if params.get("list").map(String::as_str) == Some("search") {
                    let limit: usize = params["srlimit"].parse().unwrap();
                    let search: Vec<_> = hits
                        .iter()
                        .take(limit)
                        .map(|title| serde_json::json!({"title": title}))
                        .collect();
                    return Json(serde_json::json!({"query": {"search": search}}));
                }

                let title = params["titles"].clone();
                if title == known {
                    Json(serde_json::json!({
                        "query": {"pages": [{
                            "title": title,
                            "extract": format!("{known} is the article summary."),
                            "fullurl": format!("https://en.wikipedia.org/wiki/{known}")
                        }]}
                    }))
                } else {
                    Json(serde_json::json!({
                        "query": {"pages": [{"title": title, "missing": true}]}
                    }))
                }
            }),
        )
    }

    #[test]
    fn test_page_from_successful_query() {
        let query = parse_pages(serde_json::json!({
            "batchcomplete": true,
            "query": {"pages": [{
                "pageid": 30403,
                "title": "Turing machine",
                "extract": "A Turing machine is a mathematical model of computation.\n",
                "fullurl": "https://en.wikipedia.org/wiki/Turing_machine"
            }]}
        }))
        .unwrap();

        let page = page_from_query(query).unwrap().unwrap();
        assert_eq!(page.title, "Turing machine");
        assert_eq!(page.url, "https://en.wikipedia.org/wiki/Turing_machine");
        assert_eq!(
            page.summary,
            "A Turing machine is a mathematical model of computation."
        );
    }

    #[test]
    fn test_missing_page_is_not_found() {
        let query = parse_pages(serde_json::json!({
            "query": {"pages": [{"ns": 0, "title": "Qwxzv", "missing": true}]}
        }))
        .unwrap();
        assert!(page_from_query(query).unwrap().is_none());

        let empty = parse_pages(serde_json::json!({"query": {"pages": []}})).unwrap();
        assert!(page_from_query(empty).unwrap().is_none());
    }

    #[test]
    fn test_disambiguation_page_is_an_error() {
        let query = parse_pages(serde_json::json!({
            "query": {"pages": [{
                "title": "Mercury",
                "extract": "Mercury may refer to:",
                "pageprops": {"disambiguation": ""}
            }]}
        }))
        .unwrap();
        let err = page_from_query(query).unwrap_err();
        assert!(err.to_string().contains("disambiguation"));
    }

    #[test]
    fn test_empty_extract_is_an_error() {
        let query = parse_pages(serde_json::json!({
            "query": {"pages": [{"title": "Stub", "extract": "  "}]}
        }))
        .unwrap();
        assert!(page_from_query(query).is_err());
    }

    #[test]
    fn test_missing_fullurl_is_derived_from_title() {
        let query = parse_pages(serde_json::json!({
            "query": {"pages": [{"title": "Alan Turing", "extract": "British mathematician."}]}
        }))
        .unwrap();
        let page = page_from_query(query).unwrap().unwrap();
        assert_eq!(page.url, "https://en.wikipedia.org/wiki/Alan_Turing");
    }

    #[test]
    fn test_api_error_is_surfaced() {
        let err = parse_pages(serde_json::json!({
            "error": {"code": "maxlag", "info": "Waiting for a database server"}
        }))
        .err()
        .unwrap();
        assert!(matches!(err, QuillError::Lookup(_)));
        assert!(err.to_string().contains("maxlag"));
    }

    #[tokio::test]
    async fn test_client_talks_to_action_api() {
        let router = Router::new().route(
            "/w/api.php",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("list").map(String::as_str) == Some("search") {
                    assert_eq!(params["srlimit"], "3");
                    return Json(serde_json::json!({
                        "query": {"search": [
                            {"title": "Mercury (planet)"},
                            {"title": "Mercury (element)"},
                            {"title": "Freddie Mercury"}
                        ]}
                    }));
                }
                assert_eq!(params["exsentences"], "5");
                Json(serde_json::json!({
                    "query": {"pages": [{
                        "title": params["titles"].clone(),
                        "extract": "Summary text.",
                        "fullurl": "https://example.org/wiki/page"
                    }]}
                }))
            }),
        );
        let client = client_for(router).await;

        let page = client.page("Rust", 5).await.unwrap();
        assert_eq!(page.title, "Rust");
        assert_eq!(page.summary, "Summary text.");

        let titles = client.search("Mercury", 3).await.unwrap();
        assert_eq!(
            titles,
            vec!["Mercury (planet)", "Mercury (element)", "Freddie Mercury"]
        );
    }

    #[tokio::test]
    async fn test_free_form_topic_resolves_through_search() {
        let router = encyclopedia_router("Exercise", &["Exercise", "Physical fitness"]);
        let client = client_for(router).await;

        let page = client.page("benefits of exercise", 5).await.unwrap();

        assert_eq!(page.title, "Exercise");
        assert_eq!(page.summary, "Exercise is the article summary.");
        assert_eq!(page.url, "https://en.wikipedia.org/wiki/Exercise");
    }

    #[tokio::test]
    async fn test_unresolvable_topic_is_not_found() {
        let client = client_for(encyclopedia_router("Exercise", &[])).await;

        let err = client.page("qwxzv flarn", 5).await.unwrap_err();

        assert!(matches!(err, QuillError::Lookup(_)));
        assert!(err.to_string().contains("'qwxzv flarn' does not exist"));
    }

    #[tokio::test]
    async fn test_missing_search_hit_is_not_found() {
        // Search suggests a title that has no article either.
        let client = client_for(encyclopedia_router("Exercise", &["Excercise"])).await;

        let err = client.page("excercise", 5).await.unwrap_err();

        assert!(err.to_string().contains("'Excercise' does not exist"));
    }
}

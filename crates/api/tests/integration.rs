//! Integration tests for the web layer.
//!
//! These tests spin up a real HTTP server on a random port backed by an
//! orchestrator with scripted collaborators.

use quill_agents::mock::{MockEncyclopedia, MockLlm};
use quill_api::{AppState, create_router};
use quill_orchestrator::Orchestrator;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Spin up a test server on a random port and return the base URL.
async fn start_test_server(output_root: &Path, llm: MockLlm) -> String {
    let orchestrator = Orchestrator::with_clients(
        Arc::new(llm),
        Arc::new(MockEncyclopedia::with_page(
            "Turing machine",
            "A Turing machine is a mathematical model of computation.",
        )),
        output_root,
    );
    let state = Arc::new(AppState::new(orchestrator));
    let router = create_router(state, Some(vec!["*".to_string()]));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Helper to GET a URL and return (status, body_string).
async fn get(base: &str, path: &str) -> (u16, String) {
    let resp = reqwest::Client::new()
        .get(format!("{}{}", base, path))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap();
    (status, body)
}

/// Helper to POST JSON and return (status, body_string).
async fn post_json(base: &str, path: &str, json: &str) -> (u16, String) {
    let resp = reqwest::Client::new()
        .post(format!("{}{}", base, path))
        .header("content-type", "application/json")
        .body(json.to_string())
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap();
    (status, body)
}

// ============================================================================
// Page and health
// ============================================================================

#[tokio::test]
async fn test_index_serves_form() {
    let root = tempfile::tempdir().unwrap();
    let base = start_test_server(root.path(), MockLlm::failing()).await;
    let (status, body) = get(&base, "/").await;
    assert_eq!(status, 200);
    assert!(body.contains("<form id=\"run-form\">"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let root = tempfile::tempdir().unwrap();
    let base = start_test_server(root.path(), MockLlm::failing()).await;
    let (status, body) = get(&base, "/health").await;
    assert_eq!(status, 200);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert!(json["uptime_seconds"].is_u64());
}

// ============================================================================
// Run endpoint
// ============================================================================

#[tokio::test]
async fn test_run_returns_all_panes() {
    let root = tempfile::tempdir().unwrap();
    let llm = MockLlm::replying(["Condensed facts.", "The draft.", "The feedback."]);
    let base = start_test_server(root.path(), llm).await;

    let (status, body) = post_json(&base, "/api/v1/run", r#"{"topic": "Turing Machine"}"#).await;
    assert_eq!(status, 200, "body: {body}");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["draft"], "The draft.");
    assert_eq!(json["feedback"], "The feedback.");

    let research: serde_json::Value =
        serde_json::from_str(json["research_json"].as_str().unwrap()).unwrap();
    assert_eq!(research["topic"], "Turing Machine");
    assert_eq!(research["condensed"]["content"], "Condensed facts.");

    let out_dir = root.path().join("Turing_Machine");
    assert_eq!(json["out_dir"], out_dir.display().to_string());
    assert!(json["status"].as_str().unwrap().starts_with("Done."));
    assert_eq!(json["result"]["topic"], "Turing Machine");
    assert!(out_dir.join("draft.txt").is_file());
}

#[tokio::test]
async fn test_run_reports_fallbacks_in_status() {
    let root = tempfile::tempdir().unwrap();
    let base = start_test_server(root.path(), MockLlm::failing()).await;

    let (status, body) = post_json(&base, "/api/v1/run", r#"{"topic": "Turing Machine"}"#).await;
    assert_eq!(status, 200);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["draft"], "Error generating draft.");
    assert_eq!(json["feedback"], "Error generating feedback.");
    assert!(
        json["status"]
            .as_str()
            .unwrap()
            .contains("Fallbacks used for: research, writing, critique.")
    );
}

#[tokio::test]
async fn test_run_rejects_blank_topic() {
    let root = tempfile::tempdir().unwrap();
    let base = start_test_server(root.path(), MockLlm::failing()).await;

    let (status, body) = post_json(&base, "/api/v1/run", r#"{"topic": "   "}"#).await;
    assert_eq!(status, 400);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["code"], "EMPTY_TOPIC");
    // Nothing was written.
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_run_rejects_malformed_body() {
    let root = tempfile::tempdir().unwrap();
    let base = start_test_server(root.path(), MockLlm::failing()).await;

    let (status, _) = post_json(&base, "/api/v1/run", r#"{"subject": "Rust"}"#).await;
    assert!((400..500).contains(&status));
}

#[tokio::test]
async fn test_run_survives_client_disconnect() {
    let root = tempfile::tempdir().unwrap();
    let llm = MockLlm::replying(["Condensed facts.", "The draft.", "The feedback."])
        .with_delay(Duration::from_millis(300));
    let base = start_test_server(root.path(), llm).await;

    // Give up long before the three slow completions finish.
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let sent = client
        .post(format!("{base}/api/v1/run"))
        .json(&serde_json::json!({"topic": "Rust"}))
        .send()
        .await;
    assert!(sent.is_err());

    let out_dir = root.path().join("Rust");
    let feedback = out_dir.join("feedback.txt");
    for _ in 0..50 {
        if std::fs::read_to_string(&feedback).is_ok_and(|text| !text.is_empty()) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert!(out_dir.join("research.json").is_file());
    assert_eq!(std::fs::read_to_string(out_dir.join("draft.txt")).unwrap(), "The draft.");
    assert_eq!(std::fs::read_to_string(feedback).unwrap(), "The feedback.");
}

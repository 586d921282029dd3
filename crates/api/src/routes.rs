//! HTTP route handlers.

use crate::AppState;
use crate::page::INDEX_HTML;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use quill_orchestrator::PipelineResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The single-page form.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Run request body.
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub topic: String,
}

/// Run response body: the three panes of the page plus the full result.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub research_json: String,
    pub draft: String,
    pub feedback: String,
    pub status: String,
    pub out_dir: String,
    pub result: PipelineResult,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: &'static str,
}

impl ErrorResponse {
    fn bad_request(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            code,
        }
    }

    fn internal(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
            code,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Run the pipeline for a topic.
pub async fn run_pipeline(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RunRequest>,
) -> Result<Json<RunResponse>, ErrorResponse> {
    let topic = request.topic.trim();
    if topic.is_empty() {
        warn!("Rejected run request with empty topic");
        return Err(ErrorResponse::bad_request(
            "Please enter a topic.",
            "EMPTY_TOPIC",
        ));
    }

    info!(topic = %topic, "Received run request");

    // Runs to completion even if the client disconnects.
    let orchestrator = Arc::clone(&state.orchestrator);
    let owned_topic = topic.to_string();
    let result = tokio::spawn(async move { orchestrator.run(&owned_topic).await })
        .await
        .map_err(|e| {
            error!(error = %e, "Pipeline task failed");
            ErrorResponse::internal(format!("Pipeline task failed: {e}"), "PIPELINE_ERROR")
        })?;

    let research_json = serde_json::to_string_pretty(&result.research).map_err(|e| {
        error!(error = %e, "Failed to encode research");
        ErrorResponse::internal(format!("Failed to encode research: {e}"), "SERIALIZATION_ERROR")
    })?;

    Ok(Json(RunResponse {
        research_json,
        draft: result.draft.text().to_string(),
        feedback: result.feedback.text().to_string(),
        status: status_line(&result),
        out_dir: result.out_dir.display().to_string(),
        result,
    }))
}

/// One-line summary shown under the form.
pub fn status_line(result: &PipelineResult) -> String {
    let mut status = format!("Done. Outputs saved to {}.", result.out_dir.display());

    let degraded = result.degraded_stages();
    if !degraded.is_empty() {
        status.push_str(&format!(" Fallbacks used for: {}.", degraded.join(", ")));
    }

    let failed: Vec<&str> = result.failed_artifacts().map(|a| a.name.as_str()).collect();
    if !failed.is_empty() {
        status.push_str(&format!(" Not saved: {}.", failed.join(", ")));
    }
    status
}

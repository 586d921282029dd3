//! Web front end for Quill.
//!
//! # Endpoints
//!
//! - `GET /` - Single-page form for running the pipeline
//! - `GET /health` - Health check
//! - `POST /api/v1/run` - Run the pipeline for a topic
//!
//! # Architecture
//!
//! ```text
//! Browser
//!    │
//!    ▼
//! ┌─────────────────┐
//! │   Web Server    │ ◄── This crate
//! │     (Axum)      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Orchestrator   │ ── research → write → critique
//! └─────────────────┘
//! ```

pub mod page;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use state::AppState;

/// Create the router with all routes configured.
///
/// `cors_origins` lists the origins allowed to call the API from a browser;
/// `"*"` allows any origin. With `None` only same-origin requests work.
pub fn create_router(state: Arc<AppState>, cors_origins: Option<Vec<String>>) -> Router {
    let router = Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/api/v1/run", post(routes::run_pipeline))
        .layer(TraceLayer::new_for_http());

    let router = match cors_origins {
        Some(origins) => router.layer(cors_layer(&origins)),
        None => router,
    };

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Start the web server on the given address.
pub async fn serve(
    state: Arc<AppState>,
    addr: SocketAddr,
    cors_origins: Option<Vec<String>>,
) -> anyhow::Result<()> {
    let router = create_router(state, cors_origins);

    info!(%addr, "Starting Quill web server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

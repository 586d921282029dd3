//! Quill web server binary.
//!
//! Usage:
//!   quill-web
//!   quill-web --port 8080 --bind 0.0.0.0
//!   quill-web --config quill.toml
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY` - API key for the chat-completion provider (required)
//! - `OPENAI_MODEL` / `OPENAI_BASE_URL` - Provider overrides
//! - `WRITER_TONE` - Tone for generated drafts
//! - `QUILL_OUTPUT_DIR` - Base directory for outputs
//! - `QUILL_BIND_ADDR` - Server bind address (default: 127.0.0.1)
//! - `QUILL_CORS_ORIGINS` - CORS allowed origins (comma-separated)
//!
//! A `.env` file in the working directory is loaded first.

use clap::Parser;
use quill_api::{AppState, serve};
use quill_orchestrator::QuillConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "quill-web", version, about = "Quill web front end")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 7860)]
    port: u16,

    /// Bind address
    #[arg(short, long, env = "QUILL_BIND_ADDR", default_value = "127.0.0.1")]
    bind: String,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quill_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if args.bind == "0.0.0.0" {
        tracing::warn!(
            "Server binding to 0.0.0.0 exposes the pipeline, and your API credits, \
             to all network interfaces."
        );
    }

    let cors_origins: Option<Vec<String>> = std::env::var("QUILL_CORS_ORIGINS")
        .ok()
        .map(|s| s.split(',').map(|o| o.trim().to_string()).collect());

    if let Some(path) = &args.config {
        tracing::info!(path = %path.display(), "Loading configuration");
    }
    let config = QuillConfig::load(args.config.as_deref())?;

    let state = AppState::from_config(&config)?;

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    serve(Arc::new(state), addr, cors_origins).await?;

    Ok(())
}

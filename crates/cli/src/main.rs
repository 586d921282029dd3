//! Quill command-line binary.
//!
//! Usage:
//!   quill --topic "Turing Machine"
//!   quill -t Rust --config quill.toml --output-dir articles
//!
//! Reads the same environment variables as `quill-web`, after loading `.env`.

use clap::Parser;
use quill_orchestrator::{Orchestrator, QuillConfig};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "quill", version, about = "Research, draft and critique an article on a topic")]
struct Args {
    /// Topic to write about
    #[arg(short, long)]
    topic: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base directory for outputs (overrides config and QUILL_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

/// The trimmed topic, or `None` when it is missing or blank.
fn requested_topic(topic: Option<&str>) -> Option<&str> {
    topic.map(str::trim).filter(|t| !t.is_empty())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quill_orchestrator=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let Some(topic) = requested_topic(args.topic.as_deref()) else {
        error!("Please provide a topic with --topic");
        return Ok(());
    };

    let mut config = QuillConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    let orchestrator = Orchestrator::from_config(&config)?;
    let result = orchestrator.run(topic).await;

    let degraded = result.degraded_stages();
    if !degraded.is_empty() {
        warn!(stages = ?degraded, "Some stages used fallback output");
    }
    for artifact in result.failed_artifacts() {
        warn!(
            path = %artifact.path.display(),
            error = artifact.error.as_deref().unwrap_or_default(),
            "Artifact was not saved"
        );
    }
    info!(out_dir = %result.out_dir.display(), "Done. Outputs saved");

    Ok(())
}

//! Configuration for the pipeline.
//!
//! Sourced once at process start: built-in defaults, then an optional TOML
//! file, then environment variables. The result is passed explicitly to
//! [`crate::Orchestrator::from_config`].
//!
//! # Security
//!
//! - Config file permission validation on Unix systems
//! - Rejects world-readable files containing API keys
//! - Warns about API keys stored in config files

use quill_agents::{DEFAULT_TONE, ResearchOptions};
use quill_common::{QuillError, Result};
use quill_encyclopedia::EncyclopediaConfig;
use quill_llm::LlmConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "OPENAI_MODEL";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_TONE: &str = "WRITER_TONE";
pub const ENV_OUTPUT_DIR: &str = "QUILL_OUTPUT_DIR";

/// Main pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuillConfig {
    /// Base directory for per-topic output directories
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Chat-completion provider
    #[serde(default)]
    pub llm: LlmConfig,

    /// Writing stage settings
    #[serde(default)]
    pub writer: WriterConfig,

    /// Research stage settings
    #[serde(default)]
    pub research: ResearchOptions,

    /// Encyclopedia endpoint
    #[serde(default)]
    pub encyclopedia: EncyclopediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            tone: default_tone(),
        }
    }
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            llm: LlmConfig::default(),
            writer: WriterConfig::default(),
            research: ResearchOptions::default(),
            encyclopedia: EncyclopediaConfig::default(),
        }
    }
}

impl QuillConfig {
    /// Load configuration from an optional TOML file, then apply the
    /// process environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Load configuration from a TOML file.
    ///
    /// On Unix systems, this function validates that:
    /// - The file is a regular file (not a symlink)
    /// - The file is not world-readable if it contains an API key
    /// - Warns if API keys are stored in the config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        #[cfg(unix)]
        validate_config_file_permissions(path)?;

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            QuillError::Config(format!("Invalid config file '{}': {e}", path.display()))
        })?;

        if config.llm.api_key.is_some() {
            warn!(
                "API key found in config file '{}'. For better security, \
                 use the {ENV_API_KEY} environment variable instead.",
                path.display()
            );
        }

        Ok(config)
    }

    /// Overlay values from an environment lookup. Unset or blank variables
    /// leave the current value alone.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = var(ENV_API_KEY) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = var(ENV_MODEL) {
            self.llm.model = model;
        }
        if let Some(url) = var(ENV_BASE_URL) {
            self.llm.api_url = Some(url);
        }
        if let Some(tone) = var(ENV_TONE) {
            self.writer.tone = tone;
        }
        if let Some(dir) = var(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        self
    }
}

/// Validate config file permissions on Unix systems.
///
/// Requirements:
/// - File must be a regular file (not symlink, directory, etc.)
/// - File must not be world-writable (mode & 0o002 == 0)
/// - If file contains API key patterns, must not be world-readable
#[cfg(unix)]
fn validate_config_file_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::symlink_metadata(path).map_err(|e| {
        QuillError::Config(format!("Failed to read config file '{}': {e}", path.display()))
    })?;

    if !metadata.is_file() {
        return Err(QuillError::Config(format!(
            "Config path '{}' is not a regular file. Symlinks and directories are not allowed.",
            path.display()
        )));
    }

    let permission_bits = metadata.permissions().mode() & 0o777;

    if permission_bits & 0o002 != 0 {
        return Err(QuillError::Config(format!(
            "Config file '{}' is world-writable (mode {permission_bits:04o}). \
             Fix with: chmod o-w {}",
            path.display(),
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).unwrap_or_default();
    let has_api_key = content.contains("api_key");

    if has_api_key && permission_bits & 0o004 != 0 {
        return Err(QuillError::Config(format!(
            "Config file '{}' contains an API key but is world-readable \
             (mode {permission_bits:04o}). Fix with: chmod 600 {}",
            path.display(),
            path.display()
        )));
    }

    Ok(())
}

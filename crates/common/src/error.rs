//! Error types for Quill.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuillError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuillError>;

//! Error types for the CLI application.

use rootcause_llm::LlmError;
use rootcause_pipeline::PipelineError;
use rootcause_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline error
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Result store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Classifier backend error
    #[error("Classifier error: {0}")]
    Llm(#[from] LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Known-positive tickets were not classified "yes"
    #[error("Verification failed: {0} known-positive ticket(s) not classified as yes")]
    VerificationFailed(usize),
}

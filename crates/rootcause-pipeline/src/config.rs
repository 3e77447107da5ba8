//! Configuration for a pipeline run

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Default number of tickets selected per run
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default number of tickets classified and committed together
pub const DEFAULT_MINIBATCH_SIZE: usize = 10;

/// Default decoding temperature, low to keep verdicts deterministic
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// What to do with a response that does not open with a clear yes/no
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictPolicy {
    /// Store every response verbatim without inspecting it
    #[default]
    Accept,
    /// Store verbatim, log unclear responses
    Warn,
    /// Abort the run before committing a minibatch with an unclear response
    Reject,
}

/// Configuration for the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum unclassified tickets selected per run
    pub batch_size: usize,

    /// Tickets per minibatch (the unit of commit)
    pub minibatch_size: usize,

    /// Decoding temperature sent with every request
    pub temperature: f32,

    /// Handling of responses without a clear leading yes/no
    pub verdict_policy: VerdictPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            minibatch_size: DEFAULT_MINIBATCH_SIZE,
            temperature: DEFAULT_TEMPERATURE,
            verdict_policy: VerdictPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Configuration with explicit batch and minibatch sizes
    pub fn with_sizes(batch_size: usize, minibatch_size: usize) -> Self {
        Self {
            batch_size,
            minibatch_size,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.minibatch_size == 0 {
            return Err(PipelineError::Configuration(
                "minibatch_size must be greater than 0".to_string(),
            ));
        }
        if self.batch_size < self.minibatch_size {
            return Err(PipelineError::Configuration(format!(
                "batch size ({}) must be greater than or equal to minibatch size ({})",
                self.batch_size, self.minibatch_size
            )));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(PipelineError::Configuration(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }

    /// Minibatch size as a non-zero count
    pub fn minibatch_size(&self) -> Result<NonZeroUsize, PipelineError> {
        NonZeroUsize::new(self.minibatch_size).ok_or_else(|| {
            PipelineError::Configuration("minibatch_size must be greater than 0".to_string())
        })
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        toml::from_str(toml_str)
            .map_err(|e| PipelineError::Configuration(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Configuration(format!("Failed to serialize to TOML: {}", e)))
    }
}

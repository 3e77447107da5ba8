//! Configuration management for the CLI.
//!
//! Settings are layered: built-in defaults, then the TOML config file, then
//! environment variables and command-line flags (clap merges those two).

use crate::cli::Cli;
use crate::error::{CliError, Result};
use rootcause_llm::ollama::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use rootcause_pipeline::{PipelineConfig, PipelineError};
use rootcause_store::WriteMode;
use serde::{Deserialize, Serialize};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Ticket source variable read when `TICKETS_PATH` and `--tickets` are unset.
pub const LEGACY_TICKETS_VAR: &str = "MCMN_TICKETS_PATH";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Ticket source JSON file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets_path: Option<PathBuf>,

    /// System instruction file, sent verbatim with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_message_path: Option<PathBuf>,

    /// SQLite result store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// Classifier backend settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Result store settings
    #[serde(default)]
    pub store: StoreSettings,

    /// Batch sizing and verdict handling
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Classifier backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Ollama API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout; unset waits indefinitely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Result store settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// How appends treat tickets that already hold a verdict
    #[serde(default)]
    pub write_mode: WriteMode,
}

/// Paths a classification run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// Ticket source JSON file
    pub tickets: PathBuf,
    /// System instruction file
    pub system_message: PathBuf,
    /// SQLite result store
    pub db: PathBuf,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".rootcause").join("config.toml"))
    }

    /// Load configuration from `explicit`, or from the default path.
    ///
    /// An explicit file must exist. A missing default file yields the
    /// built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::path() {
                Ok(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply environment and command-line values over the file's.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        self.apply_overrides_with(cli, |key| env::var_os(key));
    }

    fn apply_overrides_with<F>(&mut self, cli: &Cli, env_var: F)
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let tickets = cli
            .tickets
            .clone()
            .or_else(|| env_var(LEGACY_TICKETS_VAR).map(PathBuf::from));
        if let Some(path) = tickets {
            self.tickets_path = Some(path);
        }
        if let Some(path) = &cli.system_message {
            self.system_message_path = Some(path.clone());
        }
        if let Some(path) = &cli.db {
            self.db_path = Some(path.clone());
        }
        if let Some(endpoint) = &cli.endpoint {
            self.llm.endpoint = endpoint.clone();
        }
        if let Some(model) = &cli.model {
            self.llm.model = model.clone();
        }
    }

    /// Every path a run needs, or an error naming each one that is missing.
    pub fn run_paths(&self) -> Result<RunPaths> {
        require(&[
            ("tickets_path", &self.tickets_path),
            ("system_message_path", &self.system_message_path),
            ("db_path", &self.db_path),
        ])?;

        Ok(RunPaths {
            tickets: self.tickets_path.clone().unwrap_or_default(),
            system_message: self.system_message_path.clone().unwrap_or_default(),
            db: self.db_path.clone().unwrap_or_default(),
        })
    }

    /// Ticket source and result store paths.
    pub fn status_paths(&self) -> Result<(PathBuf, PathBuf)> {
        require(&[("tickets_path", &self.tickets_path), ("db_path", &self.db_path)])?;
        Ok((
            self.tickets_path.clone().unwrap_or_default(),
            self.db_path.clone().unwrap_or_default(),
        ))
    }

    /// Result store path.
    pub fn db_path(&self) -> Result<PathBuf> {
        require(&[("db_path", &self.db_path)])?;
        Ok(self.db_path.clone().unwrap_or_default())
    }
}

impl LlmSettings {
    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: None,
        }
    }
}

fn require(settings: &[(&str, &Option<PathBuf>)]) -> Result<()> {
    let missing: Vec<&str> = settings
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| *key)
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(PipelineError::Configuration(format!(
        "missing required setting(s): {}",
        missing.join(", ")
    ))
    .into())
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

//! Rootcause CLI library.
//!
//! Argument parsing, layered configuration, output formatting and the
//! `run`, `status` and `verify` commands behind the `rootcause` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

const WORKSPACE_CRATES: [&str; 5] = [
    "rootcause_cli",
    "rootcause_domain",
    "rootcause_llm",
    "rootcause_pipeline",
    "rootcause_store",
];

/// Log filter used when `RUST_LOG` is unset
///
/// Workspace crates log at `info` (or `debug` when verbose), everything
/// else at `warn`.
pub fn default_log_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    std::iter::once("warn".to_string())
        .chain(WORKSPACE_CRATES.iter().map(|krate| format!("{}={}", krate, level)))
        .collect::<Vec<_>>()
        .join(",")
}

//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Rootcause - classify support tickets by evident root cause.
#[derive(Debug, Parser)]
#[command(name = "rootcause")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ~/.rootcause/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ticket source JSON file (MCMN_TICKETS_PATH is also read)
    #[arg(long, env = "TICKETS_PATH", global = true)]
    pub tickets: Option<PathBuf>,

    /// File holding the classifier's system instruction
    #[arg(long, env = "SYSTEM_MESSAGE_PATH", global = true)]
    pub system_message: Option<PathBuf>,

    /// SQLite result store
    #[arg(long, env = "DB_PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Ollama API endpoint
    #[arg(long, env = "OLLAMA_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Model used for classification
    #[arg(long, env = "OLLAMA_MODEL", global = true)]
    pub model: Option<String>,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify the next batch of unclassified tickets (the default)
    Run(RunArgs),

    /// Show how many tickets are classified and how many remain
    Status(StatusArgs),

    /// Check stored verdicts against tickets known to be positive
    Verify(VerifyArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Run(RunArgs::default())
    }
}

/// Arguments for the run command.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Maximum tickets to process this run
    pub batch_size: Option<usize>,

    /// Tickets classified per durable commit
    pub minibatch_size: Option<usize>,
}

/// Arguments for the status command.
#[derive(Debug, Default, Args)]
pub struct StatusArgs {
    /// Print the counts as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the verify command.
#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Ticket number whose verdict must be "yes" (repeatable)
    #[arg(short = 'k', long = "known-positive", required = true)]
    pub known_positive: Vec<String>,
}

//! Rootcause CLI - classify support tickets by root cause.

use clap::Parser;
use rootcause_cli::{commands, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    // A missing .env file is fine; real environment variables still apply
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout carries only progress output.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(rootcause_cli::default_log_filter(verbose)));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(mut cli: Cli) -> rootcause_cli::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);

    let formatter = Formatter::new(!cli.no_color);

    match cli.command.take().unwrap_or_default() {
        Command::Run(args) => commands::execute_run(args, &config, &formatter),
        Command::Status(args) => commands::execute_status(args, &config, &formatter),
        Command::Verify(args) => commands::execute_verify(args, &config, &formatter),
    }
}

//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use rootcause_domain::traits::ChatProvider;
use rootcause_llm::OllamaProvider;
use rootcause_pipeline::{Pipeline, PipelineConfig, PipelineError, RunReport, TicketSource};
use rootcause_store::SqliteStore;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::info;

/// Execute the run command against the configured Ollama endpoint.
pub fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let pipeline_config = sized_config(&args, config)?;
    config.run_paths()?;

    let provider = OllamaProvider::with_timeout(
        &config.llm.endpoint,
        &config.llm.model,
        config.llm.timeout(),
    )?;
    info!(endpoint = %config.llm.endpoint, model = %config.llm.model, "Using Ollama classifier");

    run_pipeline(provider, pipeline_config, config, formatter)?;
    Ok(())
}

/// Classify the next batch with `provider`, printing progress per minibatch.
///
/// The completion line is printed only when every minibatch committed.
pub fn run_pipeline<P>(
    provider: P,
    pipeline_config: PipelineConfig,
    config: &Config,
    formatter: &Formatter,
) -> Result<RunReport>
where
    P: ChatProvider,
    P::Error: Display,
{
    pipeline_config.validate()?;
    let paths = config.run_paths()?;
    let system_message = read_system_message(&paths.system_message)?;

    let store = SqliteStore::new(&paths.db).with_write_mode(config.store.write_mode);
    let mut pipeline = Pipeline::new(provider, store, system_message, pipeline_config);

    let report = pipeline.run(&TicketSource::new(&paths.tickets), |minibatch| {
        println!("{}", formatter.minibatch_done(minibatch));
    })?;

    if report.batch_len == 0 {
        println!("{}", formatter.info("No unclassified tickets remain."));
    }
    println!("{}", formatter.run_complete());
    Ok(report)
}

/// Config sizes overridden by the positional arguments, validated.
fn sized_config(args: &RunArgs, config: &Config) -> Result<PipelineConfig> {
    let mut pipeline_config = config.pipeline.clone();
    if let Some(batch_size) = args.batch_size {
        pipeline_config.batch_size = batch_size;
    }
    if let Some(minibatch_size) = args.minibatch_size {
        pipeline_config.minibatch_size = minibatch_size;
    }
    pipeline_config.validate()?;
    Ok(pipeline_config)
}

/// The instruction file is sent verbatim; a missing file is a configuration error.
fn read_system_message(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        PipelineError::Configuration(format!(
            "cannot read system message {}: {}",
            path.display(),
            e
        ))
        .into()
    })
}

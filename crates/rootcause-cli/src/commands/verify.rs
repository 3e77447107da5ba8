//! Verify command implementation.

use crate::cli::VerifyArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rootcause_pipeline::{GroundTruth, GroundTruthReport};
use rootcause_store::SqliteStore;

/// Execute the verify command.
///
/// Fails when any known-positive ticket's stored verdict is not a "yes".
pub fn execute_verify(args: VerifyArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let report = check_known_positive(&args.known_positive, config)?;
    println!("{}", formatter.ground_truth(&report));

    if !report.is_ok() {
        return Err(CliError::VerificationFailed(report.violations.len()));
    }
    Ok(())
}

/// Check stored verdicts for `numbers` against the expected "yes".
pub fn check_known_positive(numbers: &[String], config: &Config) -> Result<GroundTruthReport> {
    let store = SqliteStore::new(config.db_path()?);
    let verdicts = store.verdicts_for(numbers)?;
    Ok(GroundTruth::new(numbers.iter().cloned()).check(&verdicts))
}

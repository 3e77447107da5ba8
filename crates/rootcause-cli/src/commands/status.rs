//! Status command implementation.

use crate::cli::StatusArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use rootcause_domain::traits::ResultStore;
use rootcause_pipeline::{exclude_classified, TicketSource};
use rootcause_store::SqliteStore;
use serde::Serialize;

/// Classification progress across the ticket source and the result store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    /// Tickets in the source file
    pub tickets: usize,
    /// Source tickets the store holds a root cause for
    pub classified: usize,
    /// Source tickets still to classify
    pub remaining: usize,
    /// Rows in the result table
    pub stored_rows: usize,
    /// Ticket numbers stored more than once
    pub duplicated: usize,
}

/// Execute the status command.
pub fn execute_status(args: StatusArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let summary = summarize(config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", formatter.status_table(&summary));
        if summary.duplicated > 0 {
            println!(
                "{}",
                formatter.warning(&format!(
                    "{} ticket number(s) have more than one classified row",
                    summary.duplicated
                ))
            );
        }
    }

    Ok(())
}

/// Count source tickets against the store's classified set.
pub fn summarize(config: &Config) -> Result<StatusSummary> {
    let (tickets_path, db_path) = config.status_paths()?;
    let rows = TicketSource::new(&tickets_path).load_rows()?;
    let store = SqliteStore::new(&db_path);

    let known = store.classified_numbers()?;
    let store_status = store.status()?;

    let tickets = rows.len();
    let remaining = exclude_classified(rows, &known, tickets).len();

    Ok(StatusSummary {
        tickets,
        classified: tickets - remaining,
        remaining,
        stored_rows: store_status.total_rows,
        duplicated: store_status.duplicated,
    })
}

//! Batch selection: the unclassified tickets a run works on

use crate::error::PipelineError;
use crate::source::TicketSource;
use rootcause_domain::traits::ResultStore;
use rootcause_domain::TicketRow;
use std::collections::HashSet;
use std::fmt::Display;
use tracing::info;

/// Load every ticket, drop the ones already classified, keep the first `batch_size`
///
/// The store is only read. The result may be shorter than `batch_size`, or
/// empty, when few unclassified tickets remain.
pub fn select_batch<S>(
    store: &S,
    source: &TicketSource,
    batch_size: usize,
) -> Result<Vec<TicketRow>, PipelineError>
where
    S: ResultStore,
    S::Error: Display,
{
    let rows = source.load_rows()?;
    let known = store
        .classified_numbers()
        .map_err(|e| PipelineError::StoreAccess(e.to_string()))?;

    let total = rows.len();
    let batch = exclude_classified(rows, &known, batch_size);

    info!(
        "Selected {} of {} tickets ({} already classified)",
        batch.len(),
        total,
        known.len()
    );
    Ok(batch)
}

/// Filter out rows whose number is in `known`, preserving order, then truncate
pub fn exclude_classified(
    rows: Vec<TicketRow>,
    known: &HashSet<String>,
    batch_size: usize,
) -> Vec<TicketRow> {
    rows.into_iter()
        .filter(|row| !known.contains(&row.number))
        .take(batch_size)
        .collect()
}

//! Minibatch orchestration
//!
//! A run selects a batch, validates it, then walks it in contiguous
//! minibatches. Each minibatch is classified one ticket at a time and
//! appended to the store before the next one starts, so an interrupted run
//! leaves every earlier minibatch durable and the next run skips them.

use crate::classifier::TicketClassifier;
use crate::config::{PipelineConfig, VerdictPolicy};
use crate::error::PipelineError;
use crate::select::select_batch;
use crate::source::TicketSource;
use rootcause_domain::traits::{AppendOutcome, ChatProvider, ResultStore};
use rootcause_domain::{Batch, ClassifiedRow, Minibatch, TicketRow, Verdict};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Progress after one minibatch commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinibatchReport {
    /// 1-based minibatch number
    pub index: usize,
    /// Offset of the first row within the batch
    pub start: usize,
    /// Exclusive end offset within the batch
    pub end: usize,
    /// Rows inserted
    pub written: usize,
    /// Rows the store declined as already classified
    pub skipped: usize,
}

/// Summary of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Rows in the selected batch
    pub batch_len: usize,
    /// Minibatches committed
    pub minibatches: usize,
    /// Tickets sent to the classifier
    pub classified: usize,
    /// Rows inserted
    pub written: usize,
    /// Rows the store declined as already classified
    pub skipped: usize,
}

impl RunReport {
    fn record(&mut self, minibatch: &Minibatch<'_>, outcome: AppendOutcome) {
        self.minibatches += 1;
        self.classified += minibatch.rows.len();
        self.written += outcome.written;
        self.skipped += outcome.skipped;
    }
}

/// Drives classification of unclassified tickets into the result store
pub struct Pipeline<P, S> {
    classifier: TicketClassifier<P>,
    store: S,
    config: PipelineConfig,
}

impl<P, S> Pipeline<P, S>
where
    P: ChatProvider,
    P::Error: Display,
    S: ResultStore,
    S::Error: Display,
{
    /// Create a pipeline
    pub fn new(
        provider: P,
        store: S,
        system_message: impl Into<String>,
        config: PipelineConfig,
    ) -> Self {
        let classifier =
            TicketClassifier::new(provider, system_message).with_temperature(config.temperature);
        Self {
            classifier,
            store,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The classifier client
    pub fn classifier(&self) -> &TicketClassifier<P> {
        &self.classifier
    }

    /// The result store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the pipeline, returning the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Select the next batch from `source` and process it
    ///
    /// The configuration is validated before anything is read, so a batch
    /// size below the minibatch size fails without touching the store or
    /// the classifier. The result table's shape is checked before the
    /// exclusion query runs. `on_minibatch` is called after every commit.
    pub fn run<F>(&mut self, source: &TicketSource, on_minibatch: F) -> Result<RunReport, PipelineError>
    where
        F: FnMut(&MinibatchReport),
    {
        self.config.validate()?;
        self.check_store_schema()?;
        info!(
            batch_size = self.config.batch_size,
            minibatch_size = self.config.minibatch_size,
            source = %source.path().display(),
            "Starting classification run"
        );

        let rows = select_batch(&self.store, source, self.config.batch_size)?;
        self.process_selected(rows, on_minibatch)
    }

    /// Classify and persist an already-selected batch
    ///
    /// The store's table shape is checked before the first request. Rows
    /// are processed in the order given. Any error aborts the run; the
    /// failing minibatch commits nothing.
    pub fn process<F>(
        &mut self,
        rows: Vec<TicketRow>,
        on_minibatch: F,
    ) -> Result<RunReport, PipelineError>
    where
        F: FnMut(&MinibatchReport),
    {
        self.check_store_schema()?;
        self.process_selected(rows, on_minibatch)
    }

    fn check_store_schema(&self) -> Result<(), PipelineError> {
        let problems = self
            .store
            .schema_problems()
            .map_err(|e| PipelineError::StoreAccess(e.to_string()))?;
        if !problems.is_empty() {
            return Err(PipelineError::SchemaMismatch(problems.join("; ")));
        }
        Ok(())
    }

    fn process_selected<F>(
        &mut self,
        rows: Vec<TicketRow>,
        mut on_minibatch: F,
    ) -> Result<RunReport, PipelineError>
    where
        F: FnMut(&MinibatchReport),
    {
        let minibatch_size = self.config.minibatch_size()?;
        let batch = Batch::new(rows);

        let mut report = RunReport {
            batch_len: batch.len(),
            ..RunReport::default()
        };

        for minibatch in batch.minibatches(minibatch_size) {
            debug!(
                "Processing batch {}, records {}:{}",
                minibatch.index,
                minibatch.offset,
                minibatch.end()
            );

            let classified = self.classify_minibatch(&minibatch)?;
            let outcome = self
                .store
                .append_minibatch(&classified)
                .map_err(|e| PipelineError::StoreWrite(e.to_string()))?;

            report.record(&minibatch, outcome);
            on_minibatch(&MinibatchReport {
                index: minibatch.index,
                start: minibatch.offset,
                end: minibatch.end(),
                written: outcome.written,
                skipped: outcome.skipped,
            });
        }

        info!(
            minibatches = report.minibatches,
            written = report.written,
            skipped = report.skipped,
            "Classification run complete"
        );
        Ok(report)
    }

    /// Verdicts paired with their rows, in row order
    fn classify_minibatch(
        &self,
        minibatch: &Minibatch<'_>,
    ) -> Result<Vec<ClassifiedRow>, PipelineError> {
        let mut classified = Vec::with_capacity(minibatch.rows.len());

        for (position, row) in minibatch.rows.iter().enumerate() {
            debug!("{}: Processing ticket {}", position + 1, row.number);
            let verdict = self.classifier.classify(row)?;
            self.check_verdict(row, &verdict)?;
            classified.push(row.clone().classify(verdict));
        }

        Ok(classified)
    }

    fn check_verdict(&self, row: &TicketRow, verdict: &str) -> Result<(), PipelineError> {
        if self.config.verdict_policy == VerdictPolicy::Accept || Verdict::parse(verdict).is_clear()
        {
            return Ok(());
        }

        match self.config.verdict_policy {
            VerdictPolicy::Reject => Err(PipelineError::VerdictRejected {
                number: row.number.clone(),
                verdict: verdict.to_string(),
            }),
            _ => {
                warn!(ticket = %row.number, "Verdict does not open with a clear yes/no");
                Ok(())
            }
        }
    }
}

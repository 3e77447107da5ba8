//! Error types for the classification pipeline

use thiserror::Error;

/// Errors that abort a pipeline run
///
/// None of these are recovered locally. Minibatches committed before the
/// failure stay durable; the failing minibatch commits nothing.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Missing or invalid configuration, raised before any processing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ticket source could not be read or parsed
    #[error("Ticket source error: {0}")]
    Source(String),

    /// The existing result table has the wrong shape
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The classifier failed for a ticket
    #[error("Classification failed for ticket {number}: {message}")]
    Classification {
        /// Ticket being classified
        number: String,
        /// Provider error text
        message: String,
    },

    /// A classifier response did not open with a clear yes/no
    #[error("Verdict rejected for ticket {number}: {verdict:?}")]
    VerdictRejected {
        /// Ticket whose verdict was rejected
        number: String,
        /// The verbatim response
        verdict: String,
    },

    /// Result store could not be opened or read
    #[error("Store access error: {0}")]
    StoreAccess(String),

    /// Result store rejected a minibatch
    #[error("Store write error: {0}")]
    StoreWrite(String),
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Source(format!("invalid ticket JSON: {}", e))
    }
}

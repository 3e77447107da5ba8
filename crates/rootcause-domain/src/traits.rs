//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the classification pipeline
//! and its infrastructure. Implementations live in other crates.

use crate::chat::ChatRequest;
use crate::ticket::ClassifiedRow;
use std::collections::HashSet;

/// Trait for chat-completion backends
///
/// Implemented by the infrastructure layer (rootcause-llm)
pub trait ChatProvider {
    /// Error type for provider operations
    type Error;

    /// Send one request and return the completion text, unmodified
    fn chat(&self, request: &ChatRequest) -> Result<String, Self::Error>;
}

/// Trait for the persistent table of classified tickets
///
/// Implemented by the infrastructure layer (rootcause-store)
pub trait ResultStore {
    /// Error type for store operations
    type Error;

    /// Distinct ticket numbers that already hold a non-null root cause
    fn classified_numbers(&self) -> Result<HashSet<String>, Self::Error>;

    /// Problems with the existing table's shape, empty when compatible
    ///
    /// A store whose table does not exist yet is compatible.
    fn schema_problems(&self) -> Result<Vec<String>, Self::Error>;

    /// Durably append one minibatch of classified rows
    ///
    /// All rows commit together or none do.
    fn append_minibatch(&mut self, rows: &[ClassifiedRow]) -> Result<AppendOutcome, Self::Error>;
}

/// What a minibatch append did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Rows inserted
    pub written: usize,

    /// Rows the store declined because the ticket was already classified
    pub skipped: usize,
}

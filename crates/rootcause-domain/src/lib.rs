//! Rootcause Domain Layer
//!
//! Core model for classifying support tickets by root cause. Every other
//! layer in the workspace depends on this crate, so it has ZERO external
//! dependencies and holds only value types and trait boundaries.
//!
//! ## Key Concepts
//!
//! - **TicketRow**: a normalized ticket (number, rendered transcript, resolution note)
//! - **ClassifiedRow**: a ticket row plus the classifier's verbatim verdict
//! - **Batch**: the ordered working set for one run
//! - **Minibatch**: a contiguous slice of a batch; the atomic unit of classify-and-commit
//! - **Verdict**: the leading yes/no token of a classifier response
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Infrastructure (HTTP chat providers, SQLite) lives in other crates
//! - `ChatProvider` and `ResultStore` are the seams between them

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod chat;
pub mod ticket;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use batch::{Batch, Minibatch};
pub use chat::{ChatMessage, ChatRequest, Role};
pub use ticket::{ClassifiedRow, TicketRow};
pub use traits::AppendOutcome;
pub use verdict::Verdict;

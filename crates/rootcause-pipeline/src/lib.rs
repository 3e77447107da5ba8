//! Rootcause Pipeline
//!
//! Classifies support tickets by root cause in resumable minibatches.
//!
//! # Architecture
//!
//! ```text
//! TicketSource → normalize → select_batch → Pipeline ─┬─ TicketClassifier → ChatProvider
//!                                 ▲                    └─ ResultStore (append per minibatch)
//!                                 └──────── classified numbers ───────────┘
//! ```
//!
//! Every minibatch is committed before the next one starts. Re-running
//! after a crash re-selects only the tickets the store does not yet hold a
//! root cause for.
//!
//! # Example Usage
//!
//! ```no_run
//! use rootcause_pipeline::{Pipeline, PipelineConfig, TicketSource};
//! use rootcause_llm::OllamaProvider;
//! use rootcause_store::SqliteStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OllamaProvider::default_endpoint("qwen2.5:14b-instruct")?;
//! let store = SqliteStore::new("tickets.db");
//! let system_message = std::fs::read_to_string("system_message.txt")?;
//!
//! let mut pipeline = Pipeline::new(provider, store, system_message, PipelineConfig::default());
//! let report = pipeline.run(&TicketSource::new("tickets.json"), |mb| {
//!     println!("Processing batch {}, records {}:{}... Done!", mb.index, mb.start, mb.end);
//! })?;
//!
//! println!("Classified {} tickets", report.classified);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod extract;
mod ground_truth;
mod pipeline;
mod select;
mod source;

#[cfg(test)]
mod tests;

pub use classifier::{user_prompt, TicketClassifier};
pub use config::{
    PipelineConfig, VerdictPolicy, DEFAULT_BATCH_SIZE, DEFAULT_MINIBATCH_SIZE, DEFAULT_TEMPERATURE,
};
pub use error::PipelineError;
pub use extract::{normalize, normalize_record, render_transcript, MESSAGE_SEPARATOR, NO_TIMESTAMP};
pub use ground_truth::{GroundTruth, GroundTruthReport, GroundTruthViolation};
pub use pipeline::{MinibatchReport, Pipeline, RunReport};
pub use select::{exclude_classified, select_batch};
pub use source::{parse_tickets, TicketMessage, TicketRecord, TicketSource, NUMBER_KEYS};

//! Ticket source loading
//!
//! The source is a JSON array of ticket objects. Every field is optional and
//! wrongly-typed values degrade to "absent" instead of failing the load.

use crate::error::PipelineError;
use crate::extract::normalize;
use rootcause_domain::TicketRow;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Keys holding the ticket id, in order of preference
pub const NUMBER_KEYS: [&str; 3] = ["Number", "number", "id"];

/// A raw ticket as found in the source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketRecord {
    /// Ticket id, from the first of [`NUMBER_KEYS`] holding a usable value
    pub number: Option<String>,

    /// Conversation messages in source order
    pub messages: Vec<TicketMessage>,

    /// Resolution note written when the ticket was closed
    pub resolution_note: Option<String>,
}

/// One message of a ticket conversation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketMessage {
    /// When the message was sent
    pub timestamp: Option<String>,

    /// Message body
    pub text: Option<String>,
}

impl TicketRecord {
    /// Read a record from any JSON value; a non-object is an empty record
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };

        let number = NUMBER_KEYS
            .iter()
            .find_map(|key| fields.remove(*key).and_then(lenient_string));
        let messages = match fields.remove("messages") {
            Some(Value::Array(items)) => items.into_iter().map(TicketMessage::from_value).collect(),
            _ => Vec::new(),
        };

        Self {
            number,
            messages,
            resolution_note: fields.remove("resolution_note").and_then(lenient_string),
        }
    }
}

impl TicketMessage {
    /// Read a message from any JSON value; a non-object is an empty message
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };

        Self {
            timestamp: fields.remove("timestamp").and_then(lenient_string),
            text: fields.remove("text").and_then(lenient_string),
        }
    }
}

impl<'de> Deserialize<'de> for TicketRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Handle to the ticket source file
#[derive(Debug, Clone)]
pub struct TicketSource {
    path: PathBuf,
}

impl TicketSource {
    /// Create a handle; nothing is read until a load is requested
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the source file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse every ticket record
    pub fn load_records(&self) -> Result<Vec<TicketRecord>, PipelineError> {
        let contents = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PipelineError::Configuration(format!(
                "ticket source not found: {}",
                self.path.display()
            )),
            _ => PipelineError::Source(format!("cannot read {}: {}", self.path.display(), e)),
        })?;

        let records = parse_tickets(&contents)?;
        debug!(count = records.len(), path = %self.path.display(), "Loaded ticket records");
        Ok(records)
    }

    /// Load every ticket and normalize it into rows, in source order
    pub fn load_rows(&self) -> Result<Vec<TicketRow>, PipelineError> {
        Ok(normalize(&self.load_records()?))
    }
}

/// Parse a JSON array of ticket objects
pub fn parse_tickets(json: &str) -> Result<Vec<TicketRecord>, PipelineError> {
    Ok(serde_json::from_str(json)?)
}

/// Strings pass through, numbers are rendered, anything else is absent
fn lenient_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

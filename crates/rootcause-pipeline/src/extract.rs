//! Record normalization: raw ticket records into uniform rows

use crate::source::{TicketMessage, TicketRecord};
use rootcause_domain::TicketRow;

/// Timestamp rendered for messages that have none
pub const NO_TIMESTAMP: &str = "NO_TIMESTAMP";

/// Separator placed between rendered message blocks
pub const MESSAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Normalize records into rows, one per record, preserving order
pub fn normalize(records: &[TicketRecord]) -> Vec<TicketRow> {
    records.iter().map(normalize_record).collect()
}

/// Normalize a single record
///
/// Absent ids and resolution notes become empty strings.
pub fn normalize_record(record: &TicketRecord) -> TicketRow {
    TicketRow::new(
        record.number.clone().unwrap_or_default(),
        render_transcript(&record.messages),
        record.resolution_note.clone().unwrap_or_default(),
    )
}

/// Render messages as `[timestamp]\ntext` blocks joined by [`MESSAGE_SEPARATOR`]
pub fn render_transcript(messages: &[TicketMessage]) -> String {
    messages
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join(MESSAGE_SEPARATOR)
}

fn render_block(message: &TicketMessage) -> String {
    let timestamp = message
        .timestamp
        .as_deref()
        .filter(|ts| !ts.is_empty())
        .unwrap_or(NO_TIMESTAMP);
    let text = message.text.as_deref().unwrap_or_default().trim();
    format!("[{}]\n{}", timestamp, text)
}

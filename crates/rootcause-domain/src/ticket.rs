//! Ticket rows before and after classification

/// A normalized support ticket, one per record in the ticket source
///
/// `transcript` holds every message of the ticket rendered in source order;
/// rows are never reordered or deduplicated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRow {
    /// Ticket number (the source record's id)
    pub number: String,

    /// Rendered conversation transcript
    pub transcript: String,

    /// Human-written resolution note, possibly empty
    pub resolution: String,
}

impl TicketRow {
    /// Create a new ticket row
    pub fn new(
        number: impl Into<String>,
        transcript: impl Into<String>,
        resolution: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            transcript: transcript.into(),
            resolution: resolution.into(),
        }
    }

    /// Attach a classifier verdict, producing the row that gets persisted
    ///
    /// # Examples
    ///
    /// ```
    /// use rootcause_domain::TicketRow;
    ///
    /// let row = TicketRow::new("INC001", "[T1]\nprinter jammed", "replaced roller");
    /// let classified = row.classify("Yes - worn roller");
    /// assert_eq!(classified.number(), "INC001");
    /// assert_eq!(classified.evident_root_cause, "Yes - worn roller");
    /// ```
    pub fn classify(self, evident_root_cause: impl Into<String>) -> ClassifiedRow {
        ClassifiedRow {
            row: self,
            evident_root_cause: evident_root_cause.into(),
        }
    }
}

/// A ticket row with its evident root cause attached
///
/// Written once to the result store and never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    /// The ticket as it was sent to the classifier
    pub row: TicketRow,

    /// The classifier's output, verbatim
    pub evident_root_cause: String,
}

impl ClassifiedRow {
    /// Ticket number of the underlying row
    pub fn number(&self) -> &str {
        &self.row.number
    }
}

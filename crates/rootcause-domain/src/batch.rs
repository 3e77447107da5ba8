//! Batches and minibatch slicing
//!
//! A [`Batch`] keeps its rows exactly as selected. Rows are never reordered,
//! deduplicated or dropped; an empty or repeated ticket number is carried
//! through to the classifier and the store like any other.

use crate::ticket::TicketRow;
use std::num::NonZeroUsize;

/// Ordered working set of ticket rows for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    rows: Vec<TicketRow>,
}

impl Batch {
    /// Build a batch from rows in selection order
    ///
    /// # Examples
    ///
    /// ```
    /// use rootcause_domain::{Batch, TicketRow};
    ///
    /// let batch = Batch::new(vec![
    ///     TicketRow::new("INC1", "a", ""),
    ///     TicketRow::new("INC1", "b", ""),
    /// ]);
    /// assert_eq!(batch.len(), 2);
    /// ```
    pub fn new(rows: Vec<TicketRow>) -> Self {
        Self { rows }
    }

    /// Number of rows in the batch
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows, in batch order
    pub fn rows(&self) -> &[TicketRow] {
        &self.rows
    }

    /// Contiguous minibatches of at most `size` rows, starting at offset 0
    ///
    /// The final minibatch may be shorter than `size`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rootcause_domain::{Batch, TicketRow};
    /// use std::num::NonZeroUsize;
    ///
    /// let rows = (0..23).map(|i| TicketRow::new(format!("INC{}", i), "", "")).collect();
    /// let batch = Batch::new(rows);
    /// let sizes: Vec<usize> = batch
    ///     .minibatches(NonZeroUsize::new(10).unwrap())
    ///     .map(|mb| mb.rows.len())
    ///     .collect();
    /// assert_eq!(sizes, vec![10, 10, 3]);
    /// ```
    pub fn minibatches(&self, size: NonZeroUsize) -> impl Iterator<Item = Minibatch<'_>> {
        let size = size.get();
        self.rows
            .chunks(size)
            .enumerate()
            .map(move |(idx, rows)| Minibatch {
                index: idx + 1,
                offset: idx * size,
                rows,
            })
    }
}

/// A contiguous slice of a batch, classified and committed as one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minibatch<'a> {
    /// 1-based position of this minibatch within the batch
    pub index: usize,

    /// Offset of the first row within the batch
    pub offset: usize,

    /// The rows of this minibatch
    pub rows: &'a [TicketRow],
}

impl Minibatch<'_> {
    /// Exclusive end offset within the batch
    pub fn end(&self) -> usize {
        self.offset + self.rows.len()
    }
}

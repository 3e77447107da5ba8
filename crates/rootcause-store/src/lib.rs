//! Rootcause Storage Layer
//!
//! Implements the `ResultStore` trait on a SQLite table named `inc`.
//!
//! # Connection model
//!
//! The store holds a path, not a connection. Reads open a short-lived
//! read-only connection; every minibatch append opens its own read-write
//! connection, writes inside one transaction and releases it on commit.
//! No lock is held between minibatches.
//!
//! # Examples
//!
//! ```no_run
//! use rootcause_store::{SqliteStore, WriteMode};
//! use rootcause_domain::traits::ResultStore;
//!
//! let store = SqliteStore::new("tickets.db").with_write_mode(WriteMode::SkipClassified);
//! let known = store.classified_numbers().unwrap();
//! println!("{} tickets already classified", known.len());
//! ```

#![warn(missing_docs)]

use rootcause_domain::traits::{AppendOutcome, ResultStore};
use rootcause_domain::ClassifiedRow;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Name of the result table
pub const TABLE: &str = "inc";

/// Columns every result table must carry
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "number",
    "timestamped_text_exchange",
    "resolution",
    "evident_root_cause",
];

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be opened or read
    #[error("Store access error: {0}")]
    Access(#[source] rusqlite::Error),

    /// Rows could not be written or committed
    #[error("Store write error: {0}")]
    Write(#[source] rusqlite::Error),

    /// The existing table is missing required columns
    #[error("Schema mismatch: {}", .0.join("; "))]
    Schema(Vec<String>),
}

/// How appended rows interact with tickets already in the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Insert every row unconditionally
    #[default]
    Append,

    /// Skip rows whose ticket already holds a classified row
    SkipClassified,
}

/// Row counts describing the table's contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    /// All rows in the table
    pub total_rows: usize,

    /// Distinct ticket numbers with a non-null root cause
    pub classified: usize,

    /// Ticket numbers with more than one classified row
    pub duplicated: usize,
}

/// SQLite-based implementation of ResultStore
pub struct SqliteStore {
    path: PathBuf,
    write_mode: WriteMode,
}

impl SqliteStore {
    /// Create a store backed by the database file at `path`
    ///
    /// Nothing is opened until the first read or append. A file that does
    /// not exist yet reads as an empty store and is created on first append.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_mode: WriteMode::default(),
        }
    }

    /// Set how appends treat already-classified tickets
    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Active write mode
    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Open a read-only connection, or `None` when the table does not exist yet
    fn open_read(&self) -> Result<Option<Connection>, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Store file absent; reading as empty");
            return Ok(None);
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(StoreError::Access)?;

        let exists = table_exists(&conn).map_err(StoreError::Access)?;
        Ok(exists.then_some(conn))
    }

    /// Fail with [`StoreError::Schema`] when the existing table is incompatible
    pub fn check_schema(&self) -> Result<(), StoreError> {
        let problems = self.schema_problems()?;
        if problems.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Schema(problems))
        }
    }

    /// Summarize the table's contents
    pub fn status(&self) -> Result<StoreStatus, StoreError> {
        let Some(conn) = self.open_read()? else {
            return Ok(StoreStatus::default());
        };

        let (total_rows, classified, duplicated) = conn
            .query_row(
                "SELECT
                    (SELECT COUNT(*) FROM inc),
                    (SELECT COUNT(DISTINCT number) FROM inc WHERE evident_root_cause IS NOT NULL),
                    (SELECT COUNT(*) FROM (
                        SELECT number FROM inc
                        WHERE evident_root_cause IS NOT NULL
                        GROUP BY number HAVING COUNT(*) > 1
                    ))",
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?)),
            )
            .map_err(StoreError::Access)?;

        Ok(StoreStatus {
            total_rows: total_rows as usize,
            classified: classified as usize,
            duplicated: duplicated as usize,
        })
    }

    /// Stored root causes for the given ticket numbers
    ///
    /// Numbers without a classified row are absent from the map. When a
    /// ticket was classified more than once, the most recent row wins.
    pub fn verdicts_for(&self, numbers: &[String]) -> Result<HashMap<String, String>, StoreError> {
        let mut verdicts = HashMap::new();
        let Some(conn) = self.open_read()? else {
            return Ok(verdicts);
        };

        let mut stmt = conn
            .prepare(
                "SELECT evident_root_cause FROM inc
                 WHERE number = ?1 AND evident_root_cause IS NOT NULL
                 ORDER BY rowid DESC LIMIT 1",
            )
            .map_err(StoreError::Access)?;

        for number in numbers {
            let verdict: Option<String> = stmt
                .query_row(params![number], |row| row.get(0))
                .optional()
                .map_err(StoreError::Access)?;
            if let Some(verdict) = verdict {
                verdicts.insert(number.clone(), verdict);
            }
        }

        Ok(verdicts)
    }
}

impl ResultStore for SqliteStore {
    type Error = StoreError;

    fn classified_numbers(&self) -> Result<HashSet<String>, Self::Error> {
        let Some(conn) = self.open_read()? else {
            return Ok(HashSet::new());
        };

        let mut stmt = conn
            .prepare("SELECT DISTINCT number FROM inc WHERE evident_root_cause IS NOT NULL")
            .map_err(StoreError::Access)?;

        // A NULL number cannot match any ticket, so it is dropped here
        let numbers = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))
            .map_err(StoreError::Access)?
            .filter_map(|r| r.transpose())
            .collect::<Result<HashSet<_>, _>>()
            .map_err(StoreError::Access)?;

        debug!(count = numbers.len(), "Loaded classified ticket numbers");
        Ok(numbers)
    }

    fn schema_problems(&self) -> Result<Vec<String>, Self::Error> {
        let Some(conn) = self.open_read()? else {
            return Ok(Vec::new());
        };

        let mut stmt = conn
            .prepare("SELECT name, type FROM pragma_table_info(?1)")
            .map_err(StoreError::Access)?;
        let columns = stmt
            .query_map(params![TABLE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(StoreError::Access)?
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(StoreError::Access)?;

        let problems = REQUIRED_COLUMNS
            .iter()
            .filter_map(|&required| match columns.get(required) {
                None => Some(format!("column '{}' is missing", required)),
                Some(declared) if !is_text_affinity(declared) => Some(format!(
                    "column '{}' is declared {}, expected TEXT",
                    required, declared
                )),
                Some(_) => None,
            })
            .collect();

        Ok(problems)
    }

    fn append_minibatch(&mut self, rows: &[ClassifiedRow]) -> Result<AppendOutcome, Self::Error> {
        let mut conn = Connection::open(&self.path).map_err(StoreError::Write)?;

        let sql = match self.write_mode {
            WriteMode::Append => {
                "INSERT INTO inc (number, timestamped_text_exchange, resolution, evident_root_cause)
                 VALUES (?1, ?2, ?3, ?4)"
            }
            WriteMode::SkipClassified => {
                "INSERT INTO inc (number, timestamped_text_exchange, resolution, evident_root_cause)
                 SELECT ?1, ?2, ?3, ?4
                 WHERE NOT EXISTS (
                     SELECT 1 FROM inc WHERE number = ?1 AND evident_root_cause IS NOT NULL
                 )"
            }
        };

        let tx = conn.transaction().map_err(StoreError::Write)?;
        // An existing table is written as-is, never altered
        if !table_exists(&tx).map_err(StoreError::Write)? {
            debug!(path = %self.path.display(), "Creating result table");
            tx.execute_batch(include_str!("schema.sql"))
                .map_err(StoreError::Write)?;
        }
        let mut outcome = AppendOutcome::default();
        {
            let mut stmt = tx.prepare(sql).map_err(StoreError::Write)?;
            for classified in rows {
                let inserted = stmt
                    .execute(params![
                        &classified.row.number,
                        &classified.row.transcript,
                        &classified.row.resolution,
                        &classified.evident_root_cause,
                    ])
                    .map_err(StoreError::Write)?;
                if inserted == 0 {
                    outcome.skipped += 1;
                } else {
                    outcome.written += inserted;
                }
            }
        }
        tx.commit().map_err(StoreError::Write)?;

        info!(
            written = outcome.written,
            skipped = outcome.skipped,
            "Committed minibatch to {}",
            self.path.display()
        );
        Ok(outcome)
    }
}

fn table_exists(conn: &Connection) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![TABLE],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

/// Whether a declared column type gets SQLite TEXT affinity
///
/// An empty declaration (typeless column) also accepts text unchanged.
fn is_text_affinity(declared: &str) -> bool {
    let declared = declared.to_ascii_uppercase();
    declared.is_empty()
        || declared.contains("CHAR")
        || declared.contains("CLOB")
        || declared.contains("TEXT")
}

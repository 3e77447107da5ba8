//! Integration tests for rootcause-store
//!
//! Every test works on a throwaway database file: appends open a fresh
//! connection per minibatch, so `:memory:` would not persist between calls.

use rootcause_domain::traits::ResultStore;
use rootcause_domain::{ClassifiedRow, TicketRow};
use rootcause_store::{SqliteStore, StoreError, WriteMode};
use rusqlite::Connection;
use tempfile::TempDir;

fn classified(number: &str, verdict: &str) -> ClassifiedRow {
    TicketRow::new(number, format!("[T1]\n{} transcript", number), "fixed").classify(verdict)
}

fn temp_store() -> (TempDir, SqliteStore) {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(dir.path().join("results.db"));
    (dir, store)
}

#[test]
fn test_missing_file_reads_as_empty() {
    let (_dir, store) = temp_store();

    assert!(store.classified_numbers().unwrap().is_empty());
    assert!(store.schema_problems().unwrap().is_empty());
    assert_eq!(store.status().unwrap().total_rows, 0);
    assert!(!store.path().exists(), "Reads must not create the database");
}

#[test]
fn test_append_creates_table() {
    let (_dir, mut store) = temp_store();

    let outcome = store
        .append_minibatch(&[classified("INC1", "Yes"), classified("INC2", "No")])
        .unwrap();
    assert_eq!(outcome.written, 2);
    assert_eq!(outcome.skipped, 0);

    let known = store.classified_numbers().unwrap();
    assert_eq!(known.len(), 2);
    assert!(known.contains("INC1") && known.contains("INC2"));
    assert!(store.schema_problems().unwrap().is_empty());
}

#[test]
fn test_append_stores_fields_verbatim() {
    let (_dir, mut store) = temp_store();
    store
        .append_minibatch(&[classified("INC7", "  Yes - cert expired\n")])
        .unwrap();

    let conn = Connection::open(store.path()).unwrap();
    let (transcript, resolution, verdict): (String, String, String) = conn
        .query_row(
            "SELECT timestamped_text_exchange, resolution, evident_root_cause FROM inc WHERE number = 'INC7'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();

    assert_eq!(transcript, "[T1]\nINC7 transcript");
    assert_eq!(resolution, "fixed");
    assert_eq!(verdict, "  Yes - cert expired\n");
}

#[test]
fn test_append_mode_keeps_duplicates() {
    let (_dir, mut store) = temp_store();

    store.append_minibatch(&[classified("INC1", "Yes")]).unwrap();
    store.append_minibatch(&[classified("INC1", "No")]).unwrap();

    let status = store.status().unwrap();
    assert_eq!(status.total_rows, 2);
    assert_eq!(status.classified, 1);
    assert_eq!(status.duplicated, 1);
}

#[test]
fn test_skip_classified_mode() {
    let (_dir, store) = temp_store();
    let mut store = store.with_write_mode(WriteMode::SkipClassified);

    store.append_minibatch(&[classified("INC1", "Yes")]).unwrap();
    let outcome = store
        .append_minibatch(&[classified("INC1", "No"), classified("INC2", "No")])
        .unwrap();

    assert_eq!(outcome.written, 1);
    assert_eq!(outcome.skipped, 1);

    let status = store.status().unwrap();
    assert_eq!(status.total_rows, 2);
    assert_eq!(status.duplicated, 0);
}

#[test]
fn test_null_root_cause_is_not_classified() {
    let (_dir, store) = temp_store();
    let conn = Connection::open(store.path()).unwrap();
    conn.execute_batch(
        "CREATE TABLE inc (number TEXT, timestamped_text_exchange TEXT, resolution TEXT, evident_root_cause TEXT);
         INSERT INTO inc VALUES ('INC1', 't', 'r', NULL);
         INSERT INTO inc VALUES ('INC2', 't', 'r', 'Yes');
         INSERT INTO inc VALUES (NULL, 't', 'r', 'Yes');",
    )
    .unwrap();
    drop(conn);

    let known = store.classified_numbers().unwrap();
    assert_eq!(known.len(), 1);
    assert!(known.contains("INC2"));
}

#[test]
fn test_schema_problems_on_foreign_table() {
    let (_dir, store) = temp_store();
    let conn = Connection::open(store.path()).unwrap();
    conn.execute_batch("CREATE TABLE inc (number INTEGER, resolution TEXT, evident_root_cause TEXT);")
        .unwrap();
    drop(conn);

    let problems = store.schema_problems().unwrap();
    assert_eq!(problems.len(), 2);
    assert!(problems.iter().any(|p| p.contains("'number'") && p.contains("INTEGER")));
    assert!(problems.iter().any(|p| p.contains("'timestamped_text_exchange' is missing")));

    assert!(matches!(store.check_schema(), Err(StoreError::Schema(_))));
}

#[test]
fn test_failed_minibatch_commits_nothing() {
    let (_dir, store) = temp_store();
    let conn = Connection::open(store.path()).unwrap();
    // The CHECK constraint rejects the second row of the minibatch
    conn.execute_batch(
        "CREATE TABLE inc (
            number TEXT,
            timestamped_text_exchange TEXT,
            resolution TEXT,
            evident_root_cause TEXT CHECK (evident_root_cause <> 'boom')
        );",
    )
    .unwrap();
    drop(conn);

    let mut store = store;
    let result = store.append_minibatch(&[classified("INC1", "Yes"), classified("INC2", "boom")]);
    assert!(matches!(result, Err(StoreError::Write(_))));

    assert_eq!(store.status().unwrap().total_rows, 0);
}

#[test]
fn test_unwritable_location_is_write_error() {
    let dir = TempDir::new().unwrap();
    let mut store = SqliteStore::new(dir.path().join("missing").join("results.db"));

    let result = store.append_minibatch(&[classified("INC1", "Yes")]);
    assert!(matches!(result, Err(StoreError::Write(_))));
}

#[test]
fn test_unreadable_file_is_access_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not-a-db.db");
    std::fs::write(&path, b"this is definitely not sqlite, just plain text padding out the header").unwrap();

    let store = SqliteStore::new(&path);
    assert!(matches!(store.classified_numbers(), Err(StoreError::Access(_))));
}

#[test]
fn test_verdicts_for_latest_row_wins() {
    let (_dir, mut store) = temp_store();
    store.append_minibatch(&[classified("INC1", "No")]).unwrap();
    store.append_minibatch(&[classified("INC1", "Yes")]).unwrap();

    let verdicts = store
        .verdicts_for(&["INC1".to_string(), "INC404".to_string()])
        .unwrap();
    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts["INC1"], "Yes");
}

fn index_names(store: &SqliteStore) -> Vec<String> {
    let conn = Connection::open(store.path()).unwrap();
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'inc'")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_new_table_gets_number_index() {
    let (_dir, mut store) = temp_store();
    store.append_minibatch(&[classified("INC1", "Yes")]).unwrap();

    assert_eq!(index_names(&store), vec!["idx_inc_number".to_string()]);
}

#[test]
fn test_existing_table_is_not_altered() {
    let (_dir, mut store) = temp_store();
    Connection::open(store.path())
        .unwrap()
        .execute_batch(
            "CREATE TABLE inc (number TEXT, timestamped_text_exchange TEXT,
                               resolution TEXT, evident_root_cause TEXT)",
        )
        .unwrap();

    store.append_minibatch(&[classified("INC1", "Yes")]).unwrap();
    store.append_minibatch(&[classified("INC2", "No")]).unwrap();

    assert!(index_names(&store).is_empty());
    assert_eq!(store.status().unwrap().total_rows, 2);
}

//! Read-only SQLite execution for the dashboard.
//!
//! One short-lived connection per request; callers run these from
//! `spawn_blocking`.

use std::path::Path;
use std::time::Duration;

use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::{DashboardError, Result};

const BUSY_TIMEOUT_MS: u64 = 100;

/// Columns, row objects keyed by column name, and the row count of one
/// executed statement.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Value>,
    pub row_count: usize,
}

/// Rejects anything but a non-blank statement starting with `SELECT`.
///
/// This single keyword check is the only SQL validation the dashboard does;
/// the connection is additionally opened read-only.
pub fn check_sql(sql: &str) -> Result<()> {
    let trimmed = sql.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::InvalidInput(
            "no SQL query provided".to_string(),
        ));
    }
    if !trimmed.to_uppercase().starts_with("SELECT") {
        return Err(DashboardError::QueryRejected(
            "only SELECT queries are allowed".to_string(),
        ));
    }
    Ok(())
}

fn open_read_only(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    conn.busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS))?;
    conn.pragma_update(None, "query_only", 1)?;
    Ok(conn)
}

/// Runs a guarded SELECT against the database file and decodes every row
/// into a JSON object keyed by column name.
pub fn execute_select(db_path: &Path, sql: &str) -> Result<QueryResult> {
    check_sql(sql)?;
    let conn = open_read_only(db_path)?;
    let mut statement = conn.prepare(sql)?;
    let columns: Vec<String> = statement
        .column_names()
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut rows = statement.query([])?;
    let mut result_rows = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = serde_json::Map::new();
        for (index, column) in columns.iter().enumerate() {
            let value = row.get::<usize, SqlValue>(index)?;
            record.insert(column.clone(), json_from_sql(value));
        }
        result_rows.push(Value::Object(record));
    }

    Ok(QueryResult {
        row_count: result_rows.len(),
        columns,
        rows: result_rows,
    })
}

/// Startup diagnostic: opens the database and lists its table names.
pub fn probe(db_path: &Path) -> Result<Vec<String>> {
    let conn = open_read_only(db_path)?;
    let mut statement =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let tables = statement
        .query_map([], |row| row.get::<usize, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(tables)
}

fn json_from_sql(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(value) => json!(value),
        SqlValue::Real(value) => json!(value),
        SqlValue::Text(value) => json!(value),
        SqlValue::Blob(value) => json!(encode_blob_hex(&value)),
    }
}

fn encode_blob_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        output.push(HEX[(byte >> 4) as usize] as char);
        output.push(HEX[(byte & 0x0f) as usize] as char);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fixture_db(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("fixture.db");
        let conn = Connection::open(&path).expect("create db");
        conn.execute_batch(
            "CREATE TABLE people (name TEXT, age INTEGER, score REAL, photo BLOB);
             INSERT INTO people VALUES ('Ada', 36, 9.5, x'00ff');
             INSERT INTO people VALUES (NULL, NULL, NULL, NULL);",
        )
        .expect("seed");
        path
    }

    #[test]
    fn rejects_blank_sql() {
        match check_sql("   ") {
            Err(DashboardError::InvalidInput(message)) => {
                assert_eq!(message, "no SQL query provided");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_select_sql() {
        for sql in ["DELETE FROM people", "update people set age = 1", "PRAGMA x"] {
            match check_sql(sql) {
                Err(DashboardError::QueryRejected(_)) => {}
                other => panic!("expected QueryRejected for {sql:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn accepts_select_case_insensitively() {
        assert!(check_sql("select 1").is_ok());
        assert!(check_sql("  SELECT * FROM t;").is_ok());
    }

    #[test]
    fn guard_runs_before_the_database_is_touched() {
        let missing = Path::new("/definitely/not/a/file.db");
        match execute_select(missing, "DROP TABLE people") {
            Err(DashboardError::QueryRejected(_)) => {}
            other => panic!("expected QueryRejected, got {other:?}"),
        }
    }

    #[test]
    fn select_returns_typed_json_rows() {
        let dir = tempdir().expect("tempdir");
        let path = fixture_db(dir.path());

        let result = execute_select(&path, "SELECT name, age, score, photo FROM people")
            .expect("execute");
        assert_eq!(result.columns, vec!["name", "age", "score", "photo"]);
        assert_eq!(result.row_count, 2);
        assert_eq!(result.rows[0]["name"], json!("Ada"));
        assert_eq!(result.rows[0]["age"], json!(36));
        assert_eq!(result.rows[0]["score"], json!(9.5));
        assert_eq!(result.rows[0]["photo"], json!("00ff"));
        assert_eq!(result.rows[1]["name"], Value::Null);
    }

    #[test]
    fn empty_result_set_keeps_column_names() {
        let dir = tempdir().expect("tempdir");
        let path = fixture_db(dir.path());

        let result =
            execute_select(&path, "SELECT name FROM people WHERE age > 200").expect("execute");
        assert_eq!(result.columns, vec!["name"]);
        assert_eq!(result.row_count, 0);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn missing_database_is_a_clean_error() {
        let dir = tempdir().expect("tempdir");
        let err = execute_select(&dir.path().join("absent.db"), "SELECT 1")
            .expect_err("should fail");
        match err {
            DashboardError::Database(_) => {}
            other => panic!("expected Database error, got {other:?}"),
        }
    }

    #[test]
    fn probe_lists_tables() {
        let dir = tempdir().expect("tempdir");
        let path = fixture_db(dir.path());
        let tables = probe(&path).expect("probe");
        assert_eq!(tables, vec!["people"]);
    }
}

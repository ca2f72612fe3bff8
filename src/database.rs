//! SQLite execution of service-generated SQL.
//!
//! A single pool is opened at startup. Queries are run dynamically (no
//! compile-time checking, the SQL comes from the service at runtime) and every
//! cell is decoded by its SQLite storage class into a `serde_json::Value`.

use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::path::Path;
use tracing::debug;

use crate::history::TableData;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("failed to open database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database file read-only. The file must already exist; askdb
    /// never creates or mutates the data it is asked about.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .read_only(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(DatabaseError::Connect)?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by tests with `sqlite::memory:`).
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Execute a validated query and return the full result set.
    pub async fn run_sql(&self, sql: &str) -> Result<TableData, DatabaseError> {
        debug!(sql, "Executing generated SQL");
        let rows: Vec<SqliteRow> = sqlx::query(sql).fetch_all(&self.pool).await?;

        let columns = match rows.first() {
            Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
            None => Vec::new(),
        };

        let mut decoded = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut cells = Vec::with_capacity(row.columns().len());
            for i in 0..row.columns().len() {
                cells.push(decode_cell(row, i)?);
            }
            decoded.push(cells);
        }

        let total_rows = decoded.len();
        Ok(TableData {
            columns,
            rows: decoded,
            total_rows,
        })
    }
}

/// Decode one cell by its runtime storage class. SQLite types are dynamic,
/// so the value's own type info is authoritative, not the column's.
fn decode_cell(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_uppercase();
    let value = match type_name.as_str() {
        "INTEGER" | "INT" | "BIGINT" | "BOOLEAN" => json!(row.try_get::<i64, _>(index)?),
        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
            let f = row.try_get::<f64, _>(index)?;
            serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
        }
        "BLOB" => {
            let bytes = row.try_get::<Vec<u8>, _>(index)?;
            json!(format!("blob({} bytes)", bytes.len()))
        }
        // TEXT, DATE, TIME, DATETIME and anything else stored as text.
        _ => json!(row.try_get::<String, _>(index)?),
    };
    Ok(value)
}

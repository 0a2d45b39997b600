//! Embedded backend on rusqlite

use crate::driver::{Driver, DriverKind, ExecOutcome};
use crate::errors::{from_rusqlite, sqlite_open, Result};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use slimorm_core::{ColumnInfo, Row, Value};
use std::path::Path;
use std::sync::Arc;

/// SQLite database handle
///
/// With `autocommit` on, every statement commits immediately. With it off,
/// the first write opens a transaction that stays open until `commit()`.
pub struct SqliteDriver {
    conn: Connection,
    autocommit: bool,
}

impl SqliteDriver {
    /// Open (or create) the database file at `path`
    pub fn open<P: AsRef<Path>>(path: P, autocommit: bool) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(sqlite_open)?;
        tracing::debug!(path = %path.as_ref().display(), autocommit, "opened sqlite database");
        Ok(Self { conn, autocommit })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(sqlite_open)?;
        Ok(Self {
            conn,
            autocommit: true,
        })
    }

    /// Run several `;`-separated statements without parameters
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| from_rusqlite("execute_batch", e))
    }

    pub fn is_autocommit(&self) -> bool {
        self.autocommit
    }

    fn begin_if_needed(&self) -> Result<()> {
        if !self.autocommit && self.conn.is_autocommit() {
            self.conn
                .execute_batch("BEGIN")
                .map_err(|e| from_rusqlite("begin", e))?;
        }
        Ok(())
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(v) => SqlValue::Integer(i64::from(*v)),
        Value::Integer(v) => SqlValue::Integer(*v),
        Value::Real(v) => SqlValue::Real(*v),
        Value::Text(v) => SqlValue::Text(v.clone()),
        Value::Blob(v) => SqlValue::Blob(v.clone()),
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
        ValueRef::Blob(v) => Value::Blob(v.to_vec()),
    }
}

impl Driver for SqliteDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::Sqlite
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        self.begin_if_needed()?;

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| from_rusqlite("execute", e))?;
        let rows_affected = stmt
            .execute(params_from_iter(params.iter().map(to_sql_value)))
            .map_err(|e| from_rusqlite("execute", e))?;

        Ok(ExecOutcome {
            rows_affected: rows_affected as u64,
            last_insert_id: Some(self.conn.last_insert_rowid()),
        })
    }

    fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| from_rusqlite("fetch_all", e))?;
        // writes run through raw queries join the open transaction too
        if !stmt.readonly() {
            self.begin_if_needed()?;
        }

        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let columns = Arc::new(ColumnInfo::new(names));
        let width = columns.len();

        let mut rows = stmt
            .query(params_from_iter(params.iter().map(to_sql_value)))
            .map_err(|e| from_rusqlite("fetch_all", e))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(|e| from_rusqlite("fetch_all", e))? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                let value = row.get_ref(i).map_err(|e| from_rusqlite("fetch_all", e))?;
                values.push(from_value_ref(value));
            }
            out.push(Row::with_columns(columns.clone(), values));
        }

        Ok(out)
    }

    fn commit(&self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn
                .execute_batch("COMMIT")
                .map_err(|e| from_rusqlite("commit", e))?;
        }
        Ok(())
    }
}

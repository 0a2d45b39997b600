//! Backend abstraction
//!
//! A `Driver` owns one live database handle and runs single statements with
//! positional `?` parameters. Everything above it (cursor, session) is
//! backend-agnostic.

use slimorm_core::{Dialect, Result, Row, Value};
use std::fmt;

/// Which backend is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    /// Embedded file-based database (rusqlite)
    Sqlite,
    /// Networked MySQL/MariaDB server (sqlx)
    MySql,
}

impl DriverKind {
    pub fn dialect(&self) -> Dialect {
        match self {
            DriverKind::Sqlite => Dialect::Sqlite,
            DriverKind::MySql => Dialect::MySql,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DriverKind::Sqlite => "sqlite",
            DriverKind::MySql => "mysql",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a statement that returns no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    /// Auto-increment value generated by the statement, when the backend
    /// reports one
    pub last_insert_id: Option<i64>,
}

/// One live database handle
///
/// Calls block until the backend answers. Errors are surfaced as
/// `OrmError::Database` carrying the driver's message.
pub trait Driver {
    fn kind(&self) -> DriverKind;

    /// Run a statement that returns no rows
    fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecOutcome>;

    /// Run a query and collect every result row
    fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Commit pending work when the backend is not in autocommit mode
    fn commit(&self) -> Result<()> {
        Ok(())
    }
}

impl<D: Driver + ?Sized> Driver for Box<D> {
    fn kind(&self) -> DriverKind {
        (**self).kind()
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        (**self).execute(sql, params)
    }

    fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        (**self).fetch_all(sql, params)
    }

    fn commit(&self) -> Result<()> {
        (**self).commit()
    }
}

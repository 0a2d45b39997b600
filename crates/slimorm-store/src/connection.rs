//! Connection holder and cursors
//!
//! One `ConnectionHolder` owns at most one live driver. Connecting again
//! replaces the previous driver. Every record operation borrows a `Cursor`
//! from the holder for the duration of one statement.

use crate::config::ConnectParams;
use crate::driver::{Driver, DriverKind, ExecOutcome};
use crate::sqlite::SqliteDriver;
use slimorm_core::{log_op_end, log_op_error, log_op_start, OrmError, Result, Row, Statement, Value};

/// Explicit handle to the active database connection
#[derive(Default)]
pub struct ConnectionHolder {
    driver: Option<Box<dyn Driver>>,
}

impl ConnectionHolder {
    /// A holder with no connection yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a connection from parameters, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns `OrmError::Connection` if the backend cannot be opened. The
    /// previous connection, if any, is kept in that case.
    pub fn connect(&mut self, params: &ConnectParams) -> Result<()> {
        let start = std::time::Instant::now();
        log_op_start!("connect", backend = params.backend_name());

        let result = open_driver(params).map(|driver| {
            self.driver = Some(driver);
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!("connect", duration_ms = duration_ms);
            }
            Err(e) => {
                log_op_error!("connect", e, duration_ms = duration_ms);
            }
        }
        result
    }

    /// Install an already-open driver, replacing any previous one
    pub fn connect_with(&mut self, driver: Box<dyn Driver>) {
        self.driver = Some(driver);
    }

    /// Drop the active connection
    pub fn disconnect(&mut self) {
        self.driver = None;
    }

    pub fn is_connected(&self) -> bool {
        self.driver.is_some()
    }

    /// Backend of the active connection
    pub fn driver_kind(&self) -> Option<DriverKind> {
        self.driver.as_ref().map(|d| d.kind())
    }

    /// Borrow a cursor for one statement
    ///
    /// # Errors
    ///
    /// Returns `OrmError::UninitializedConnection` before `connect`.
    pub fn cursor(&self) -> Result<Cursor<'_>> {
        let driver = self
            .driver
            .as_deref()
            .ok_or(OrmError::UninitializedConnection)?;
        Ok(Cursor {
            driver,
            lastrowid: None,
            rowcount: None,
        })
    }

    /// Commit pending work on a non-autocommit connection
    ///
    /// # Errors
    ///
    /// Returns `OrmError::UninitializedConnection` before `connect`, or the
    /// driver's commit failure.
    pub fn commit(&self) -> Result<()> {
        self.driver
            .as_deref()
            .ok_or(OrmError::UninitializedConnection)?
            .commit()
    }
}

impl std::fmt::Debug for ConnectionHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHolder")
            .field("driver", &self.driver_kind())
            .finish()
    }
}

fn open_driver(params: &ConnectParams) -> Result<Box<dyn Driver>> {
    match params {
        ConnectParams::Sqlite { path, autocommit } => {
            Ok(Box::new(SqliteDriver::open(path, *autocommit)?))
        }
        #[cfg(feature = "mysql")]
        ConnectParams::MySql {
            database,
            user,
            password,
            host,
            port,
        } => {
            let params = crate::mysql::MySqlParams {
                database: database.clone(),
                user: user.clone(),
                password: password.clone(),
                host: host.clone(),
                port: *port,
            };
            Ok(Box::new(crate::mysql::MySqlDriver::connect(&params)?))
        }
        #[cfg(not(feature = "mysql"))]
        ConnectParams::MySql { .. } => Err(OrmError::connection(
            "mysql",
            "support not compiled in; rebuild slimorm-store with the `mysql` feature",
        )),
    }
}

/// Statement handle borrowed from a `ConnectionHolder`
pub struct Cursor<'c> {
    driver: &'c dyn Driver,
    lastrowid: Option<i64>,
    rowcount: Option<u64>,
}

impl<'c> Cursor<'c> {
    pub fn driver_kind(&self) -> DriverKind {
        self.driver.kind()
    }

    /// Run a statement that returns no rows
    ///
    /// # Errors
    ///
    /// Returns `OrmError::Database` with the driver's message.
    pub fn execute(&mut self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        tracing::debug!(sql = sql, param_count = params.len(), "execute");
        let outcome = self.driver.execute(sql, params)?;
        self.lastrowid = outcome.last_insert_id;
        self.rowcount = Some(outcome.rows_affected);
        Ok(outcome)
    }

    /// Run a built statement that returns no rows
    ///
    /// # Errors
    ///
    /// Returns `OrmError::Database` with the driver's message.
    pub fn execute_statement(&mut self, statement: &Statement) -> Result<ExecOutcome> {
        self.execute(&statement.sql, &statement.params)
    }

    /// Run a query and collect every row
    ///
    /// # Errors
    ///
    /// Returns `OrmError::Database` with the driver's message.
    pub fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        tracing::debug!(sql = sql, param_count = params.len(), "fetch_all");
        let rows = self.driver.fetch_all(sql, params)?;
        self.rowcount = Some(rows.len() as u64);
        Ok(rows)
    }

    /// Auto-increment value produced by the last `execute`
    pub fn lastrowid(&self) -> Option<i64> {
        self.lastrowid
    }

    /// Rows affected (or returned) by the last statement; `None` before any
    pub fn rowcount(&self) -> Option<u64> {
        self.rowcount
    }
}

//! Query execution and persistence
//!
//! A `Session` runs record operations against a `ConnectionHolder`. Each
//! call takes one cursor, runs exactly one statement to completion and
//! releases the cursor.
//!
//! Every public operation emits a start event and exactly one end or
//! end_error event.

use crate::connection::ConnectionHolder;
use slimorm_core::query::{build_count, build_delete, build_insert, build_select, build_update};
use slimorm_core::{
    log_op_end, log_op_error, log_op_start, Conditions, Mode, OrmError, Record, RecordType,
    Result, Row, SelectOptions, Value,
};
use std::sync::Arc;
use std::time::Instant;

/// What `save` did
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The record was clean, or had nothing to write
    Skipped,
    /// A row was inserted; carries the driver-assigned primary key
    Inserted(Value),
    /// The row was overwritten by primary key
    Updated,
}

/// Result rows of one query, hydrated into records as they are consumed
///
/// The driver is drained when the query runs; each `next()` builds one
/// `Record` in update mode, clean.
pub struct Records {
    record_type: Arc<RecordType>,
    rows: std::vec::IntoIter<Row>,
}

impl Records {
    fn new(record_type: Arc<RecordType>, rows: Vec<Row>) -> Self {
        Self {
            record_type,
            rows: rows.into_iter(),
        }
    }
}

impl Iterator for Records {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.rows
            .next()
            .map(|row| Record::hydrate(self.record_type.clone(), row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Records {}

impl std::fmt::Debug for Records {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Records")
            .field("record_type", &self.record_type.name())
            .field("remaining", &self.rows.len())
            .finish()
    }
}

/// Runs record operations on a borrowed connection
#[derive(Debug, Clone, Copy)]
pub struct Session<'c> {
    holder: &'c ConnectionHolder,
}

impl<'c> Session<'c> {
    pub fn new(holder: &'c ConnectionHolder) -> Self {
        Self { holder }
    }

    /// Select every row of `record_type` matching `conditions`
    ///
    /// # Errors
    ///
    /// Returns `OrmError::UninitializedConnection` before connect, or
    /// `OrmError::Database` if the driver rejects the query.
    pub fn all(
        &self,
        record_type: &Arc<RecordType>,
        conditions: &Conditions,
        options: &SelectOptions,
    ) -> Result<Records> {
        traced("all", record_type.name(), || {
            let statement = build_select(record_type.table(), conditions, options);
            let rows = self
                .holder
                .cursor()?
                .fetch_all(&statement.sql, &statement.params)?;
            Ok(Records::new(record_type.clone(), rows))
        })
    }

    /// First matching record, or `None`
    ///
    /// Any `limit` in `options` is replaced by 1.
    ///
    /// # Errors
    ///
    /// Same as [`Session::all`].
    pub fn one(
        &self,
        record_type: &Arc<RecordType>,
        conditions: &Conditions,
        options: &SelectOptions,
    ) -> Result<Option<Record>> {
        traced("one", record_type.name(), || {
            let options = options.clone().limit(1);
            let statement = build_select(record_type.table(), conditions, &options);
            let rows = self
                .holder
                .cursor()?
                .fetch_all(&statement.sql, &statement.params)?;
            Ok(rows
                .into_iter()
                .next()
                .map(|row| Record::hydrate(record_type.clone(), row)))
        })
    }

    /// Run caller-written SQL and hydrate every row as `record_type`
    ///
    /// `params` are bound positionally; only the SQL text is taken as is.
    ///
    /// # Errors
    ///
    /// Returns `OrmError::Database` for malformed SQL or bind mismatches.
    pub fn raw(
        &self,
        record_type: &Arc<RecordType>,
        sql: &str,
        params: &[Value],
    ) -> Result<Records> {
        traced("raw", record_type.name(), || {
            let rows = self.holder.cursor()?.fetch_all(sql, params)?;
            Ok(Records::new(record_type.clone(), rows))
        })
    }

    /// Number of matching rows
    ///
    /// Falls back to 0 when the driver returns no row.
    ///
    /// # Errors
    ///
    /// Same as [`Session::all`].
    pub fn count(
        &self,
        record_type: &Arc<RecordType>,
        conditions: &Conditions,
        group_by: Option<&str>,
    ) -> Result<i64> {
        traced("count", record_type.name(), || {
            let statement = build_count(record_type.table(), conditions, group_by);
            let rows = self
                .holder
                .cursor()?
                .fetch_all(&statement.sql, &statement.params)?;
            Ok(rows
                .first()
                .and_then(|row| row.get_by_name("count"))
                .and_then(Value::as_i64)
                .unwrap_or(0))
        })
    }

    /// Persist a record
    ///
    /// Clean records are skipped. Records pending insert issue one INSERT
    /// and take the driver-assigned key; persisted records issue one UPDATE
    /// keyed by their primary key.
    ///
    /// # Errors
    ///
    /// Returns `OrmError::MissingPrimaryKey` when a persisted record has no
    /// key value, or `OrmError::Database` if the driver rejects the
    /// statement. The record is left unchanged on error.
    pub fn save(&self, record: &mut Record) -> Result<SaveOutcome> {
        let record_type = record.record_type().clone();
        traced("save", record_type.name(), || self.save_impl(record))
    }

    fn save_impl(&self, record: &mut Record) -> Result<SaveOutcome> {
        if !record.is_dirty() {
            return Ok(SaveOutcome::Skipped);
        }

        let record_type = record.record_type().clone();
        let mut cursor = self.holder.cursor()?;

        match record.mode() {
            Mode::Insert => {
                let statement = build_insert(
                    cursor.driver_kind().dialect(),
                    record_type.table(),
                    &record.fields(),
                    record.field_values(),
                );
                let outcome = cursor.execute_statement(&statement)?;
                let key = outcome
                    .last_insert_id
                    .map(Value::Integer)
                    .unwrap_or(Value::Null);
                record.mark_inserted(key.clone());
                Ok(SaveOutcome::Inserted(key))
            }
            Mode::Update => {
                let key = record
                    .primary_key()
                    .cloned()
                    .ok_or_else(|| OrmError::MissingPrimaryKey {
                        record_type: record_type.name().to_string(),
                    })?;
                let statement = build_update(
                    record_type.table(),
                    record_type.primary_key(),
                    &record.fields(),
                    record.field_values(),
                    key,
                );
                match statement {
                    Some(statement) => {
                        cursor.execute_statement(&statement)?;
                        record.mark_saved();
                        Ok(SaveOutcome::Updated)
                    }
                    None => {
                        record.mark_saved();
                        Ok(SaveOutcome::Skipped)
                    }
                }
            }
        }
    }

    /// Delete the record's row by primary key
    ///
    /// Runs unconditionally; deleting twice affects 0 rows the second time.
    ///
    /// # Errors
    ///
    /// Returns `OrmError::MissingPrimaryKey` when the record has no key
    /// value, or `OrmError::Database` from the driver.
    pub fn delete(&self, record: &Record) -> Result<u64> {
        let record_type = record.record_type();
        traced("delete", record_type.name(), || {
            let key = record
                .primary_key()
                .cloned()
                .ok_or_else(|| OrmError::MissingPrimaryKey {
                    record_type: record_type.name().to_string(),
                })?;
            let statement = build_delete(record_type.table(), record_type.primary_key(), key);
            let outcome = self.holder.cursor()?.execute_statement(&statement)?;
            Ok(outcome.rows_affected)
        })
    }
}

fn traced<T>(op: &str, record_type: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    log_op_start!(op, record_type = record_type);

    let result = f();

    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms, record_type = record_type);
        }
        Err(e) => {
            log_op_error!(op, e, duration_ms = duration_ms, record_type = record_type);
        }
    }
    result
}

//! Record instances: one row's values plus lifecycle state.

use crate::errors::Result;
use crate::record_type::{RecordType, RESERVED_PREFIX};
use crate::row::Row;
use crate::value::Value;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::sync::Arc;

/// Whether the next save inserts a new row or overwrites by primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Not yet persisted
    Insert,
    /// Persisted; saves issue an UPDATE keyed by the primary key
    Update,
}

/// One in-memory row of a record type
///
/// User assignment (`set`) and loading from a result row (`hydrate`) are
/// separate paths: only `set` marks the record dirty.
#[derive(Debug, Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    values: IndexMap<String, Value>,
    mode: Mode,
    dirty: bool,
}

impl Record {
    /// A fresh, empty record pending insert
    pub fn new(record_type: Arc<RecordType>) -> Self {
        Self {
            record_type,
            values: IndexMap::new(),
            mode: Mode::Insert,
            dirty: true,
        }
    }

    /// A record pending insert, pre-populated with `data`
    pub fn create<I, K, V>(record_type: Arc<RecordType>, data: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut record = Self::new(record_type);
        for (column, value) in data {
            record.set(column, value)?;
        }
        Ok(record)
    }

    /// Load a persisted record from a result row in one step
    ///
    /// The record comes back in update mode and clean, whatever columns the
    /// row carries. A column name repeated in the row (`SELECT a.*, b.*`)
    /// keeps its first value, matching `Row::get_by_name`.
    pub fn hydrate(record_type: Arc<RecordType>, row: Row) -> Self {
        let mut values = IndexMap::with_capacity(row.len());
        for (column, value) in row.into_pairs() {
            values.entry(column).or_insert(value);
        }
        Self {
            record_type,
            values,
            mode: Mode::Update,
            dirty: false,
        }
    }

    /// Assign a column value and mark the record dirty
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let column = column.into();
        self.record_type.check_column(&column)?;
        self.values.insert(column, value.into());
        self.dirty = true;
        Ok(())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Current primary-key value; `None` until inserted or hydrated
    pub fn primary_key(&self) -> Option<&Value> {
        self.values
            .get(self.record_type.primary_key())
            .filter(|v| !v.is_null())
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// All non-reserved `(column, value)` pairs, primary key included
    pub fn data(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .filter(|(k, _)| !k.starts_with(RESERVED_PREFIX))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Columns eligible for INSERT/UPDATE: every non-reserved column except
    /// the primary key. Declared columns come first, in declaration order.
    pub fn fields(&self) -> Vec<&str> {
        let pk = self.record_type.primary_key();
        let mut fields: Vec<&str> = self
            .record_type
            .columns()
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| *name != pk && self.values.contains_key(*name))
            .collect();

        for (name, _) in self.data() {
            if name != pk && !fields.contains(&name) {
                fields.push(name);
            }
        }
        fields
    }

    /// Values of `fields()`, in the same order
    pub fn field_values(&self) -> Vec<Value> {
        self.fields()
            .into_iter()
            .map(|f| self.values.get(f).cloned().unwrap_or_default())
            .collect()
    }

    /// Record the driver-assigned key after an INSERT
    pub fn mark_inserted(&mut self, primary_key: Value) {
        let pk = self.record_type.primary_key().to_string();
        self.values.insert(pk, primary_key);
        self.mode = Mode::Update;
        self.dirty = false;
    }

    /// Record a completed UPDATE
    pub fn mark_saved(&mut self) {
        self.mode = Mode::Update;
        self.dirty = false;
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .data()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (k, v) in self.data() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

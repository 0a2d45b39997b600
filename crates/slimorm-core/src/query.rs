//! Builds parameterized SELECT, COUNT, INSERT, UPDATE and DELETE statements.
//!
//! Values are always bound through `?` placeholders. Identifiers and the raw
//! fragments in [`SelectOptions`] (`order_by`, `group_by`, `fields`) are
//! pasted into the SQL text as given: they must come from trusted code,
//! never from user input. Condition keys are quoted but not validated.

use crate::value::Value;
use indexmap::IndexMap;

/// SQL dialect quirks that differ between the supported backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    MySql,
}

/// A SQL string with its positional bind parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a table name, each part of a `schema.table` name on its own
pub fn quote_table(name: &str) -> String {
    name.split('.').map(quote_ident).collect::<Vec<_>>().join(".")
}

/// Insertion-ordered `column = value` equality constraints
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    inner: IndexMap<String, Value>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Add or replace a constraint; a replaced column keeps its position
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.inner.insert(column.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for (k, v) in iter {
            conditions.insert(k, v);
        }
        conditions
    }
}

/// Optional clauses for a SELECT
///
/// A `limit` or `offset` of zero is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOptions {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub order_by: Option<String>,
    pub group_by: Option<String>,
    pub fields: Option<String>,
}

impl SelectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }
}

/// Select list used by [`build_count`]; the result column is `count`
pub const COUNT_FIELDS: &str = "COUNT(*) AS count";

fn clause(keyword: &str, fragment: Option<&str>) -> String {
    match fragment {
        Some(f) if !f.is_empty() => format!("{} {}", keyword, f),
        _ => String::new(),
    }
}

fn numeric_clause(keyword: &str, n: Option<u64>) -> String {
    match n {
        Some(n) if n > 0 => format!("{} {}", keyword, n),
        _ => String::new(),
    }
}

/// Build `SELECT {fields} FROM {table} WHERE ...` with optional clauses
///
/// Clauses are joined by single spaces; absent clauses leave their slot
/// empty. With no conditions the WHERE clause is `WHERE 1=1`.
pub fn build_select(table: &str, conditions: &Conditions, options: &SelectOptions) -> Statement {
    let where_kw = if conditions.is_empty() {
        "WHERE 1=1"
    } else {
        "WHERE"
    };

    let mut params = Vec::with_capacity(conditions.len());
    let predicates: Vec<String> = conditions
        .iter()
        .map(|(column, value)| {
            params.push(value.clone());
            format!("({}=?)", quote_ident(column))
        })
        .collect();

    let sql = format!(
        "SELECT {fields} FROM {table} {where_kw} {query} {group_by} {order_by} {limit} {offset}",
        fields = options.fields.as_deref().unwrap_or("*"),
        table = quote_table(table),
        where_kw = where_kw,
        query = predicates.join(" AND "),
        group_by = clause("GROUP BY", options.group_by.as_deref()),
        order_by = clause("ORDER BY", options.order_by.as_deref()),
        limit = numeric_clause("LIMIT", options.limit),
        offset = numeric_clause("OFFSET", options.offset),
    );

    Statement::new(sql, params)
}

/// Build the COUNT variant of [`build_select`]
pub fn build_count(table: &str, conditions: &Conditions, group_by: Option<&str>) -> Statement {
    let options = SelectOptions {
        group_by: group_by.map(str::to_string),
        fields: Some(COUNT_FIELDS.to_string()),
        ..SelectOptions::default()
    };
    build_select(table, conditions, &options)
}

/// Build an INSERT over `fields` (never including the primary key)
pub fn build_insert(
    dialect: Dialect,
    table: &str,
    fields: &[&str],
    values: Vec<Value>,
) -> Statement {
    if fields.is_empty() {
        let sql = match dialect {
            Dialect::Sqlite => format!("INSERT INTO {} DEFAULT VALUES", quote_table(table)),
            Dialect::MySql => format!("INSERT INTO {} () VALUES ()", quote_table(table)),
        };
        return Statement::new(sql, Vec::new());
    }

    let columns: Vec<String> = fields.iter().map(|f| quote_ident(f)).collect();
    let placeholders = vec!["?"; fields.len()].join(",");
    let sql = format!(
        "INSERT INTO {}( {} ) VALUES( {} )",
        quote_table(table),
        columns.join(","),
        placeholders
    );
    Statement::new(sql, values)
}

/// Build an UPDATE keyed by the primary key, bound as the last parameter
///
/// Returns `None` when there is nothing to set.
pub fn build_update(
    table: &str,
    primary_key: &str,
    fields: &[&str],
    mut values: Vec<Value>,
    key: Value,
) -> Option<Statement> {
    if fields.is_empty() {
        return None;
    }

    let assignments: Vec<String> = fields
        .iter()
        .map(|f| format!("{}=?", quote_ident(f)))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE {}=?",
        quote_table(table),
        assignments.join(","),
        quote_ident(primary_key)
    );
    values.push(key);
    Some(Statement::new(sql, values))
}

/// Build a DELETE keyed by the primary key
pub fn build_delete(table: &str, primary_key: &str, key: Value) -> Statement {
    let sql = format!(
        "DELETE FROM {} WHERE {}=?",
        quote_table(table),
        quote_ident(primary_key)
    );
    Statement::new(sql, vec![key])
}

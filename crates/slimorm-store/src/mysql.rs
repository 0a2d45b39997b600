//! Networked backend on sqlx (MySQL/MariaDB)
//!
//! sqlx is async; each call is driven to completion on a private
//! current-thread runtime so the `Driver` contract stays blocking.

use crate::driver::{Driver, DriverKind, ExecOutcome};
use crate::errors::{from_sqlx, Result};
use slimorm_core::{ColumnInfo, OrmError, Row, Value};
use slimorm_core_types::Sensitive;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Connection, MySql, Row as _, TypeInfo, ValueRef as _};
use std::cell::RefCell;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// Parameters for a MySQL server connection
#[derive(Debug, Clone)]
pub struct MySqlParams {
    pub database: String,
    pub user: String,
    pub password: Sensitive<String>,
    pub host: String,
    pub port: u16,
}

pub struct MySqlDriver {
    runtime: Runtime,
    conn: RefCell<MySqlConnection>,
}

impl MySqlDriver {
    pub fn connect(params: &MySqlParams) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| OrmError::connection("mysql", e.to_string()))?;

        let options = MySqlConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .username(&params.user)
            .password(params.password.expose())
            .database(&params.database);

        let conn = runtime
            .block_on(MySqlConnection::connect_with(&options))
            .map_err(|e| OrmError::connection("mysql", e.to_string()))?;

        tracing::debug!(
            host = %params.host,
            port = params.port,
            database = %params.database,
            "opened mysql connection"
        );

        Ok(Self {
            runtime,
            conn: RefCell::new(conn),
        })
    }
}

fn bind_all<'q>(
    sql: &'q str,
    params: &[Value],
) -> Query<'q, MySql, MySqlArguments> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<i64>),
            Value::Bool(v) => query.bind(*v),
            Value::Integer(v) => query.bind(*v),
            Value::Real(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.clone()),
            Value::Blob(v) => query.bind(v.clone()),
        };
    }
    query
}

fn decode_column(row: &MySqlRow, index: usize, name: &str) -> Result<Value> {
    let raw = row.try_get_raw(index).map_err(|e| from_sqlx("fetch_all", e))?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    if let Ok(v) = row.try_get::<i64, _>(index) {
        return Ok(Value::Integer(v));
    }
    if let Ok(v) = row.try_get::<u64, _>(index) {
        return i64::try_from(v)
            .map(Value::Integer)
            .map_err(|e| OrmError::Decode {
                column: name.to_string(),
                message: e.to_string(),
            });
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return Ok(Value::Real(v));
    }
    if let Ok(v) = row.try_get::<f32, _>(index) {
        return Ok(Value::Real(f64::from(v)));
    }
    if let Ok(v) = row.try_get::<String, _>(index) {
        return Ok(Value::Text(v));
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
        return Ok(Value::Blob(v));
    }
    if let Ok(v) = row.try_get::<chrono::NaiveDateTime, _>(index) {
        return Ok(Value::Text(v.to_string()));
    }
    if let Ok(v) = row.try_get::<chrono::NaiveDate, _>(index) {
        return Ok(Value::Text(v.to_string()));
    }
    if let Ok(v) = row.try_get::<chrono::NaiveTime, _>(index) {
        return Ok(Value::Text(v.to_string()));
    }
    if let Ok(v) = row.try_get::<chrono::DateTime<chrono::Utc>, _>(index) {
        return Ok(Value::Text(v.to_rfc3339()));
    }
    if let Ok(v) = row.try_get::<bool, _>(index) {
        return Ok(Value::Bool(v));
    }

    let type_name = row.column(index).type_info().name();
    let decoded = match fallback_for(type_name) {
        Some(Fallback::Text) => row.try_get_unchecked::<String, _>(index).map(Value::Text),
        Some(Fallback::Integer) => row
            .try_get_unchecked::<u16, _>(index)
            .map(|v| Value::Integer(i64::from(v))),
        Some(Fallback::Bits) => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(|v| Value::Integer(bits_to_i64(&v))),
        None => {
            return Err(OrmError::Decode {
                column: name.to_string(),
                message: format!("unsupported column type {}", type_name),
            })
        }
    };
    decoded.map_err(|e| OrmError::Decode {
        column: name.to_string(),
        message: e.to_string(),
    })
}

/// How to read a column type that no typed decoder accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallback {
    /// Exact decimals and JSON arrive as text
    Text,
    /// YEAR arrives as a small unsigned integer
    Integer,
    /// BIT(n) arrives as big-endian bytes
    Bits,
}

fn fallback_for(type_name: &str) -> Option<Fallback> {
    match type_name {
        "DECIMAL" | "NEWDECIMAL" | "JSON" => Some(Fallback::Text),
        "YEAR" => Some(Fallback::Integer),
        "BIT" => Some(Fallback::Bits),
        _ => None,
    }
}

fn bits_to_i64(bytes: &[u8]) -> i64 {
    bytes
        .iter()
        .fold(0i64, |acc, b| (acc << 8) | i64::from(*b))
}

impl Driver for MySqlDriver {
    fn kind(&self) -> DriverKind {
        DriverKind::MySql
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        let mut conn = self.conn.borrow_mut();
        let result = self
            .runtime
            .block_on(bind_all(sql, params).execute(&mut *conn))
            .map_err(|e| from_sqlx("execute", e))?;

        let last_insert_id = match result.last_insert_id() {
            0 => None,
            id => i64::try_from(id).ok(),
        };
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id,
        })
    }

    fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let mut conn = self.conn.borrow_mut();
        let rows = self
            .runtime
            .block_on(bind_all(sql, params).fetch_all(&mut *conn))
            .map_err(|e| from_sqlx("fetch_all", e))?;

        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        let names: Vec<String> = first
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let columns = Arc::new(ColumnInfo::new(names));

        rows.iter()
            .map(|row| {
                let values = columns
                    .names()
                    .iter()
                    .enumerate()
                    .map(|(i, name)| decode_column(row, i, name))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Row::with_columns(columns.clone(), values))
            })
            .collect()
    }
}

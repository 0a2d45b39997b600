//! Error helpers for slimorm-store
//!
//! Converts driver errors into `OrmError` at the driver boundary.

use slimorm_core::errors::OrmError;

pub use slimorm_core::errors::Result;

/// Wrap a rusqlite failure that happened while running a statement
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> OrmError {
    OrmError::database(op, err.to_string())
}

/// Wrap a rusqlite failure that happened while opening the database
pub fn sqlite_open(err: rusqlite::Error) -> OrmError {
    OrmError::connection("sqlite", err.to_string())
}

/// Wrap an sqlx failure that happened while running a statement
#[cfg(feature = "mysql")]
pub fn from_sqlx(op: &str, err: sqlx::Error) -> OrmError {
    OrmError::database(op, err.to_string())
}

/// Wrap a YAML parse failure in the connection config
pub fn config_parse(err: serde_yaml::Error) -> OrmError {
    OrmError::config(err.to_string())
}

/// Wrap an IO failure while reading the connection config
pub fn config_io(path: &std::path::Path, err: std::io::Error) -> OrmError {
    OrmError::config(format!("cannot read {}: {}", path.display(), err))
}

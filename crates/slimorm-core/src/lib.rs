//! slimorm core - mapping between record types, rows and SQL
//!
//! This crate holds everything that does not touch a database:
//! - Name conversion from type names to table names
//! - Record type metadata and an explicit, name-keyed registry
//! - Record instances with insert/update mode and dirty tracking
//! - The parameterized statement builder
//! - Error and logging facilities shared with the store

pub mod errors;
pub mod logging_facility;
pub mod naming;
pub mod query;
pub mod record;
pub mod record_type;
pub mod registry;
pub mod row;
pub mod value;

#[doc(hidden)]
pub use slimorm_core_types as core_types;

// Re-export commonly used types
pub use errors::{ErrorKind, OrmError, Result};
pub use naming::underscorify;
pub use query::{Conditions, Dialect, SelectOptions, Statement};
pub use record::{Mode, Record};
pub use record_type::{ColumnDef, RecordType};
pub use registry::Registry;
pub use row::{ColumnInfo, Row};
pub use value::Value;

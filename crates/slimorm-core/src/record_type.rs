//! Record type metadata: which table a type maps to, and how.

use crate::errors::{OrmError, Result};
use crate::naming::underscorify;

/// Default primary-key column name (the auto-increment column)
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Prefix marking names that can never be data columns
pub const RESERVED_PREFIX: char = '_';

/// One declared column of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A declared mapping from a type name to a database table
///
/// Table name and primary key are computed once when the type is built and
/// never change afterwards. The column list is optional: an empty list
/// leaves the type open, so rows from raw joins can carry any columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordType {
    name: String,
    table: String,
    primary_key: String,
    columns: Vec<ColumnDef>,
}

impl RecordType {
    /// Declare a type with the default table (underscored name) and `id` key
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let table = underscorify(&name);
        Self {
            name,
            table,
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            columns: Vec::new(),
        }
    }

    /// Override the table name
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Override the primary-key column name
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    /// Append a column to the declared schema
    pub fn with_column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// True when no column schema was declared
    pub fn is_open(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        column == self.primary_key || self.columns.iter().any(|c| c.name == column)
    }

    /// Check that `column` may be assigned by user code
    pub fn check_column(&self, column: &str) -> Result<()> {
        if column.starts_with(RESERVED_PREFIX) {
            return Err(OrmError::ReservedColumn {
                column: column.to_string(),
            });
        }
        if !self.is_open() && !self.has_column(column) {
            return Err(OrmError::UnknownColumn {
                record_type: self.name.clone(),
                column: column.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_name() {
        let rt = RecordType::new("UserPosts");
        assert_eq!(rt.table(), "user_posts");
        assert_eq!(rt.primary_key(), "id");
        assert!(rt.is_open());
    }

    #[test]
    fn test_overrides() {
        let rt = RecordType::new("Person")
            .with_table("people")
            .with_primary_key("person_id");
        assert_eq!(rt.name(), "Person");
        assert_eq!(rt.table(), "people");
        assert_eq!(rt.primary_key(), "person_id");
    }

    #[test]
    fn test_reserved_column_rejected() {
        let rt = RecordType::new("Posts");
        assert_eq!(
            rt.check_column("_mode"),
            Err(OrmError::ReservedColumn {
                column: "_mode".to_string()
            })
        );
    }

    #[test]
    fn test_open_type_accepts_any_column() {
        let rt = RecordType::new("Join");
        assert!(rt.check_column("anything").is_ok());
    }

    #[test]
    fn test_declared_schema_rejects_unknown_column() {
        let rt = RecordType::new("Posts")
            .with_column(ColumnDef::new("slug"))
            .with_column(ColumnDef::new("title"));

        assert!(rt.check_column("slug").is_ok());
        assert!(rt.check_column("id").is_ok());
        let err = rt.check_column("body").unwrap_err();
        assert_eq!(
            err,
            OrmError::UnknownColumn {
                record_type: "Posts".to_string(),
                column: "body".to_string()
            }
        );
    }
}

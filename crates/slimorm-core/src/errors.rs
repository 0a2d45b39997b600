use thiserror::Error;

/// Result type alias using OrmError
pub type Result<T> = std::result::Result<T, OrmError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code usable for programmatic handling and
/// log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    UninitializedConnection,
    Database,
    UnknownColumn,
    ReservedColumn,
    RecordTypeConflict,
    MissingPrimaryKey,
    Config,
    Decode,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Connection => "ERR_CONNECTION",
            ErrorKind::UninitializedConnection => "ERR_UNINITIALIZED_CONNECTION",
            ErrorKind::Database => "ERR_DATABASE",
            ErrorKind::UnknownColumn => "ERR_UNKNOWN_COLUMN",
            ErrorKind::ReservedColumn => "ERR_RESERVED_COLUMN",
            ErrorKind::RecordTypeConflict => "ERR_RECORD_TYPE_CONFLICT",
            ErrorKind::MissingPrimaryKey => "ERR_MISSING_PRIMARY_KEY",
            ErrorKind::Config => "ERR_CONFIG",
            ErrorKind::Decode => "ERR_DECODE",
        }
    }
}

/// Error taxonomy for mapping and persistence operations
///
/// Driver failures are never retried or swallowed: they surface as
/// `Database` with the driver's own message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrmError {
    /// The backend could not open the target database
    #[error("Cannot connect to {backend} database: {message}")]
    Connection { backend: String, message: String },

    /// A record operation was attempted before `connect`
    #[error("No database connection: call connect() before running record operations")]
    UninitializedConnection,

    /// The driver rejected or failed a statement
    #[error("Database error in {op}: {message}")]
    Database { op: String, message: String },

    /// Column is not part of the record type's declared schema
    #[error("Record type {record_type} has no column '{column}'")]
    UnknownColumn { record_type: String, column: String },

    /// Column names starting with an underscore are reserved
    #[error("Column name '{column}' is reserved (leading underscore)")]
    ReservedColumn { column: String },

    /// A different definition is already registered under this name
    #[error("Record type {name} is already registered with a different definition")]
    RecordTypeConflict { name: String },

    /// Update or delete on a record without a primary key value
    #[error("Record of type {record_type} has no primary key value")]
    MissingPrimaryKey { record_type: String },

    /// Connection configuration could not be read or parsed
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// A column value could not be converted from the driver representation
    #[error("Cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl OrmError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrmError::Connection { .. } => ErrorKind::Connection,
            OrmError::UninitializedConnection => ErrorKind::UninitializedConnection,
            OrmError::Database { .. } => ErrorKind::Database,
            OrmError::UnknownColumn { .. } => ErrorKind::UnknownColumn,
            OrmError::ReservedColumn { .. } => ErrorKind::ReservedColumn,
            OrmError::RecordTypeConflict { .. } => ErrorKind::RecordTypeConflict,
            OrmError::MissingPrimaryKey { .. } => ErrorKind::MissingPrimaryKey,
            OrmError::Config { .. } => ErrorKind::Config,
            OrmError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Create a database error for the given operation
    pub fn database(op: impl Into<String>, message: impl Into<String>) -> Self {
        OrmError::Database {
            op: op.into(),
            message: message.into(),
        }
    }

    /// Create a connection error for the given backend
    pub fn connection(backend: impl Into<String>, message: impl Into<String>) -> Self {
        OrmError::Connection {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        OrmError::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ErrorKind::Connection.code(), "ERR_CONNECTION");
        assert_eq!(
            ErrorKind::UninitializedConnection.code(),
            "ERR_UNINITIALIZED_CONNECTION"
        );
        assert_eq!(ErrorKind::Database.code(), "ERR_DATABASE");
    }

    #[test]
    fn test_kind_matches_variant() {
        let err = OrmError::database("save", "UNIQUE constraint failed: posts.slug");
        assert_eq!(err.kind(), ErrorKind::Database);
        assert_eq!(err.code(), "ERR_DATABASE");

        let err = OrmError::UninitializedConnection;
        assert_eq!(err.kind(), ErrorKind::UninitializedConnection);
    }

    #[test]
    fn test_database_message_is_verbatim() {
        let err = OrmError::database("raw", "near \"SELEC\": syntax error");
        assert_eq!(
            err.to_string(),
            "Database error in raw: near \"SELEC\": syntax error"
        );
    }

    #[test]
    fn test_connection_error_display() {
        let err = OrmError::connection("sqlite", "unable to open database file");
        assert!(err.to_string().contains("sqlite"));
        assert!(err.to_string().contains("unable to open"));
    }
}

//! Canonical schema constants for structured logging
//!
//! These constants keep field names consistent between the logging macros,
//! the error facility and log consumers.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Mapping identifiers
pub const FIELD_RECORD_TYPE: &str = "record_type";
pub const FIELD_TABLE: &str = "table";
pub const FIELD_BACKEND: &str = "backend";

// Statement shape
pub const FIELD_SQL: &str = "sql";
pub const FIELD_PARAM_COUNT: &str = "param_count";
pub const FIELD_ROW_COUNT: &str = "row_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

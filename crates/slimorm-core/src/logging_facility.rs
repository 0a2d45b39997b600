//! Structured logging for record operations
//!
//! The store brackets each operation (`connect`, `all`, `one`, `raw`,
//! `count`, `save`, `delete`) with `log_op_start!` and either
//! `log_op_end!` or `log_op_error!`. Binaries pick an output format once
//! with [`init`]; tests read events back through [`test_capture`].
//!
//! ```rust
//! use slimorm_core::logging_facility::{init, Profile};
//!
//! init(Profile::Production);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};

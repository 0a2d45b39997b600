//! Subcommand implementations

pub mod count;
pub mod delete;
pub mod list;
pub mod raw;
pub mod set;

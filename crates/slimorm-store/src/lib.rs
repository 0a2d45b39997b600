//! slimorm store - drivers, connection handling and record persistence
//!
//! Builds on `slimorm-core`: statements built there are executed here
//! through a `Driver`, and result rows are hydrated back into records.
//!
//! ```
//! use slimorm_core::{Conditions, Record, RecordType, SelectOptions};
//! use slimorm_store::{ConnectParams, ConnectionHolder, Session};
//! use std::sync::Arc;
//!
//! let mut holder = ConnectionHolder::new();
//! holder.connect(&ConnectParams::sqlite(":memory:")).unwrap();
//! holder
//!     .cursor()
//!     .unwrap()
//!     .execute("CREATE TABLE posts (id INTEGER PRIMARY KEY, title TEXT)", &[])
//!     .unwrap();
//!
//! let posts = Arc::new(RecordType::new("Posts"));
//! let session = Session::new(&holder);
//! let mut post = Record::create(posts.clone(), [("title", "Hello")]).unwrap();
//! session.save(&mut post).unwrap();
//!
//! assert_eq!(session.count(&posts, &Conditions::new(), None).unwrap(), 1);
//! let all: Vec<_> = session
//!     .all(&posts, &Conditions::new(), &SelectOptions::new())
//!     .unwrap()
//!     .collect();
//! assert_eq!(all.len(), 1);
//! ```

pub mod config;
pub mod connection;
pub mod driver;
pub mod errors;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod session;
pub mod sqlite;

pub use config::{ConnectParams, ConnectionConfig};
pub use connection::{ConnectionHolder, Cursor};
pub use driver::{Driver, DriverKind, ExecOutcome};
#[cfg(feature = "mysql")]
pub use mysql::{MySqlDriver, MySqlParams};
pub use session::{Records, SaveOutcome, Session};
pub use sqlite::SqliteDriver;

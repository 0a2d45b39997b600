use slimorm_core::{ColumnDef, RecordType, Result, Row, Value};
use slimorm_store::{ConnectionHolder, Driver, DriverKind, ExecOutcome, SqliteDriver};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

#[allow(dead_code)]
pub const POSTS_DDL: &str = "CREATE TABLE posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    slug TEXT,
    author_id INTEGER
)";

#[allow(dead_code)]
pub const AUTHORS_DDL: &str = "CREATE TABLE authors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
)";

/// A statement seen by `RecordingDriver`
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Driver wrapper that logs every statement before delegating
#[allow(dead_code)]
pub struct RecordingDriver<D> {
    inner: D,
    log: Rc<RefCell<Vec<Recorded>>>,
}

#[allow(dead_code)]
impl<D: Driver> RecordingDriver<D> {
    pub fn new(inner: D) -> (Self, Rc<RefCell<Vec<Recorded>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                inner,
                log: log.clone(),
            },
            log,
        )
    }

    fn record(&self, sql: &str, params: &[Value]) {
        self.log.borrow_mut().push(Recorded {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
    }
}

impl<D: Driver> Driver for RecordingDriver<D> {
    fn kind(&self) -> DriverKind {
        self.inner.kind()
    }

    fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecOutcome> {
        self.record(sql, params);
        self.inner.execute(sql, params)
    }

    fn fetch_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        self.record(sql, params);
        self.inner.fetch_all(sql, params)
    }
}

/// In-memory database with the blog schema
#[allow(dead_code)]
pub fn blog_driver() -> SqliteDriver {
    let driver = SqliteDriver::open_in_memory().unwrap();
    driver.execute_batch(POSTS_DDL).unwrap();
    driver.execute_batch(AUTHORS_DDL).unwrap();
    driver
}

/// Connected holder plus the statement log
#[allow(dead_code)]
pub fn recording_holder() -> (ConnectionHolder, Rc<RefCell<Vec<Recorded>>>) {
    let (driver, log) = RecordingDriver::new(blog_driver());
    let mut holder = ConnectionHolder::new();
    holder.connect_with(Box::new(driver));
    (holder, log)
}

#[allow(dead_code)]
pub fn posts_type() -> Arc<RecordType> {
    Arc::new(
        RecordType::new("Posts")
            .with_column(ColumnDef::new("title"))
            .with_column(ColumnDef::new("slug"))
            .with_column(ColumnDef::new("author_id")),
    )
}

#[allow(dead_code)]
pub fn authors_type() -> Arc<RecordType> {
    Arc::new(RecordType::new("Authors"))
}

// End-to-end scenarios against an on-disk database

mod common;

use common::{authors_type, posts_type, AUTHORS_DDL, POSTS_DDL};
use slimorm_core::{Conditions, ErrorKind, Mode, Record, RecordType, SelectOptions, Value};
use slimorm_store::{ConnectParams, ConnectionConfig, ConnectionHolder, Session};
use std::sync::Arc;
use tempfile::TempDir;

fn connect_fresh(dir: &TempDir) -> ConnectionHolder {
    let mut holder = ConnectionHolder::new();
    holder
        .connect(&ConnectParams::sqlite(dir.path().join("blog.db")))
        .unwrap();
    {
        let mut cursor = holder.cursor().unwrap();
        cursor.execute(POSTS_DDL, &[]).unwrap();
        cursor.execute(AUTHORS_DDL, &[]).unwrap();
    }
    holder
}

#[test]
fn test_blog_scenario() {
    // Given: an empty embedded database
    let dir = TempDir::new().unwrap();
    let holder = connect_fresh(&dir);
    let session = Session::new(&holder);
    let posts = posts_type();

    // When: three posts are created and saved
    let mut saved = Vec::new();
    for title in ["first", "second", "third"] {
        let mut post = Record::create(posts.clone(), [("title", title)]).unwrap();
        session.save(&mut post).unwrap();
        saved.push(post);
    }

    // Then: count is 3
    assert_eq!(session.count(&posts, &Conditions::new(), None).unwrap(), 3);

    // When: one is deleted
    session.delete(&saved[1]).unwrap();

    // Then: count is 2 and all() yields exactly the remaining two, persisted and clean
    assert_eq!(session.count(&posts, &Conditions::new(), None).unwrap(), 2);
    let remaining: Vec<Record> = session
        .all(&posts, &Conditions::new(), &SelectOptions::new().order_by("id"))
        .unwrap()
        .collect();
    assert_eq!(remaining.len(), 2);
    let titles: Vec<_> = remaining.iter().map(|r| r.get("title").cloned()).collect();
    assert_eq!(
        titles,
        vec![Some(Value::from("first")), Some(Value::from("third"))]
    );
    for record in &remaining {
        assert_eq!(record.mode(), Mode::Update);
        assert!(!record.is_dirty());
    }
}

#[test]
fn test_count_on_empty_table_is_zero() {
    let dir = TempDir::new().unwrap();
    let holder = connect_fresh(&dir);
    let session = Session::new(&holder);

    assert_eq!(
        session.count(&posts_type(), &Conditions::new(), None).unwrap(),
        0
    );
    assert_eq!(
        session
            .count(&posts_type(), &Conditions::new().with("slug", "nope"), None)
            .unwrap(),
        0
    );
}

#[test]
fn test_count_tracks_inserts_minus_deletes() {
    let dir = TempDir::new().unwrap();
    let holder = connect_fresh(&dir);
    let session = Session::new(&holder);
    let posts = posts_type();

    let n = 7;
    let m = 3;
    let mut saved = Vec::new();
    for i in 0..n {
        let mut post = Record::create(posts.clone(), [("title", format!("post {}", i))]).unwrap();
        session.save(&mut post).unwrap();
        saved.push(post);
    }
    for post in saved.iter().take(m) {
        session.delete(post).unwrap();
    }

    assert_eq!(
        session.count(&posts, &Conditions::new(), None).unwrap(),
        (n - m) as i64
    );
}

#[test]
fn test_count_with_conditions_and_group_by() {
    let dir = TempDir::new().unwrap();
    let holder = connect_fresh(&dir);
    let session = Session::new(&holder);
    let posts = posts_type();

    for (title, author) in [("a", 1), ("b", 1), ("c", 2)] {
        let mut post = Record::new(posts.clone());
        post.set("title", title).unwrap();
        post.set("author_id", author).unwrap();
        session.save(&mut post).unwrap();
    }

    let by_author = Conditions::new().with("author_id", 1);
    assert_eq!(session.count(&posts, &by_author, None).unwrap(), 2);
    // first group's count
    assert_eq!(
        session
            .count(&posts, &Conditions::new(), Some("author_id"))
            .unwrap(),
        2
    );
}

#[test]
fn test_all_with_limit_and_offset() {
    let dir = TempDir::new().unwrap();
    let holder = connect_fresh(&dir);
    let session = Session::new(&holder);
    let posts = posts_type();

    for i in 1..=5 {
        let mut post = Record::create(posts.clone(), [("title", format!("p{}", i))]).unwrap();
        session.save(&mut post).unwrap();
    }

    let page: Vec<_> = session
        .all(
            &posts,
            &Conditions::new(),
            &SelectOptions::new().order_by("id").limit(2).offset(2),
        )
        .unwrap()
        .map(|r| r.primary_key().cloned())
        .collect();
    assert_eq!(
        page,
        vec![Some(Value::Integer(3)), Some(Value::Integer(4))]
    );
}

#[test]
fn test_raw_join_hydrates_arbitrary_columns() {
    // Given: an author and two posts
    let dir = TempDir::new().unwrap();
    let holder = connect_fresh(&dir);
    let session = Session::new(&holder);

    let mut author = Record::create(authors_type(), [("name", "ada")]).unwrap();
    session.save(&mut author).unwrap();
    let author_id = author.primary_key().cloned().unwrap();
    for title in ["x", "y"] {
        let mut post = Record::new(posts_type());
        post.set("title", title).unwrap();
        post.set("author_id", author_id.clone()).unwrap();
        session.save(&mut post).unwrap();
    }

    // When: a join is run through raw() into an open record type
    let listing = Arc::new(RecordType::new("PostListing"));
    let rows: Vec<Record> = session
        .raw(
            &listing,
            "SELECT p.title AS title, a.name AS author FROM posts p \
             JOIN authors a ON a.id = p.author_id WHERE a.id = ? ORDER BY p.id",
            &[author_id],
        )
        .unwrap()
        .collect();

    // Then: every row carries exactly the selected columns
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("title"), Some(&Value::from("x")));
    assert_eq!(rows[1].get("author"), Some(&Value::from("ada")));
    assert_eq!(rows[0].to_string(), "title=x; author=ada");
}

#[test]
fn test_raw_join_with_repeated_columns_keeps_first_table_values() {
    // Given: two tables that both have `id` and `name`
    let dir = TempDir::new().unwrap();
    let holder = connect_fresh(&dir);
    {
        let mut cursor = holder.cursor().unwrap();
        cursor
            .execute("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)", &[])
            .unwrap();
        cursor
            .execute("CREATE TABLE cats (id INTEGER PRIMARY KEY, name TEXT)", &[])
            .unwrap();
        cursor
            .execute("INSERT INTO users (id, name) VALUES (1, 'ada')", &[])
            .unwrap();
        cursor
            .execute("INSERT INTO cats (id, name) VALUES (42, 'tom')", &[])
            .unwrap();
    }
    let session = Session::new(&holder);
    let users = Arc::new(RecordType::new("Users"));

    // When: both tables are selected with `*`
    let mut rows: Vec<Record> = session
        .raw(&users, "SELECT u.*, c.* FROM users u, cats c", &[])
        .unwrap()
        .collect();

    // Then: the record takes the user's id and name, so writes target the user row
    assert_eq!(rows.len(), 1);
    let user = &mut rows[0];
    assert_eq!(user.primary_key(), Some(&Value::Integer(1)));
    assert_eq!(user.get("name"), Some(&Value::from("ada")));

    user.set("name", "ada l.").unwrap();
    session.save(user).unwrap();
    let reloaded = session
        .one(&users, &Conditions::new().with("id", 1), &SelectOptions::new())
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.get("name"), Some(&Value::from("ada l.")));
    assert_eq!(session.delete(user).unwrap(), 1);
}

#[test]
fn test_raw_syntax_error_is_database_error() {
    let dir = TempDir::new().unwrap();
    let holder = connect_fresh(&dir);
    let session = Session::new(&holder);

    let err = session
        .raw(&posts_type(), "SELEKT nothing", &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Database);
}

#[test]
fn test_data_survives_reconnect() {
    let dir = TempDir::new().unwrap();
    let posts = posts_type();
    {
        let holder = connect_fresh(&dir);
        let session = Session::new(&holder);
        let mut post = Record::create(posts.clone(), [("title", "durable")]).unwrap();
        session.save(&mut post).unwrap();
    }

    let mut holder = ConnectionHolder::new();
    holder
        .connect(&ConnectParams::sqlite(dir.path().join("blog.db")))
        .unwrap();
    let session = Session::new(&holder);
    let post = session
        .one(&posts, &Conditions::new().with("title", "durable"), &SelectOptions::new())
        .unwrap();
    assert!(post.is_some());
}

#[test]
fn test_manual_commit_connection_from_config() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("manual.db");
    let yaml = format!(
        "connection:\n  backend: sqlite\n  path: '{}'\n  autocommit: false\n",
        db.display()
    );
    let config = ConnectionConfig::from_yaml_str(&yaml).unwrap();
    let posts = posts_type();

    {
        let mut holder = ConnectionHolder::new();
        holder.connect(&config.connection).unwrap();
        holder.cursor().unwrap().execute(POSTS_DDL, &[]).unwrap();
        let session = Session::new(&holder);
        let mut post = Record::create(posts.clone(), [("title", "committed")]).unwrap();
        session.save(&mut post).unwrap();
        holder.commit().unwrap();

        let mut lost = Record::create(posts.clone(), [("title", "uncommitted")]).unwrap();
        session.save(&mut lost).unwrap();
    }

    let mut holder = ConnectionHolder::new();
    holder.connect(&ConnectParams::sqlite(&db)).unwrap();
    let session = Session::new(&holder);
    assert_eq!(session.count(&posts, &Conditions::new(), None).unwrap(), 1);
}

#[test]
fn test_raw_write_waits_for_commit_on_manual_connection() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("raw_manual.db");
    let posts = posts_type();
    {
        let mut holder = ConnectionHolder::new();
        holder.connect(&ConnectParams::sqlite(&db)).unwrap();
        holder.cursor().unwrap().execute(POSTS_DDL, &[]).unwrap();
    }

    {
        let mut holder = ConnectionHolder::new();
        holder
            .connect(&ConnectParams::Sqlite {
                path: db.clone(),
                autocommit: false,
            })
            .unwrap();
        let session = Session::new(&holder);
        let inserted: Vec<Record> = session
            .raw(
                &posts,
                "INSERT INTO posts (title) VALUES (?)",
                &[Value::from("never committed")],
            )
            .unwrap()
            .collect();
        assert!(inserted.is_empty());
        // dropped without commit
    }

    let mut holder = ConnectionHolder::new();
    holder.connect(&ConnectParams::sqlite(&db)).unwrap();
    let session = Session::new(&holder);
    assert_eq!(session.count(&posts, &Conditions::new(), None).unwrap(), 0);
}

#[test]
fn test_operations_before_connect_are_uninitialized() {
    let holder = ConnectionHolder::new();
    let session = Session::new(&holder);
    let posts = posts_type();

    let err = session
        .all(&posts, &Conditions::new(), &SelectOptions::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UninitializedConnection);

    let mut post = Record::create(posts, [("title", "t")]).unwrap();
    let err = session.save(&mut post).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UninitializedConnection);
}

#[test]
fn test_connect_to_unreachable_path_is_connection_error() {
    let mut holder = ConnectionHolder::new();
    let err = holder
        .connect(&ConnectParams::sqlite("/nonexistent-dir/deeper/blog.db"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
}

//! Tests for the session store: users, sessions, and the append-only move
//! log, including the `BEGIN IMMEDIATE` transaction path.

use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tempfile::NamedTempFile;

use strictly_grids::db::{NewSessionRow, NewUser, SessionFilter, SessionStore};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready store.
fn setup_test_db() -> (NamedTempFile, SessionStore) {
    let db_file = NamedTempFile::new().expect("failed to create temp file");
    let db_path = db_file.path().to_str().expect("invalid path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("failed to connect");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("migrations failed");

    let store = SessionStore::new(db_path).expect("failed to create store");
    (db_file, store)
}

fn new_session_row(id: &str, host_id: &str) -> NewSessionRow {
    NewSessionRow::new(
        id.to_string(),
        "tic_tac_toe".to_string(),
        None,
        host_id.to_string(),
        "Host".to_string(),
        None,
        None,
        None,
        None,
        "WAITING".to_string(),
        None,
        "[[null,null,null],[null,null,null],[null,null,null]]".to_string(),
        None,
        false,
    )
}

#[test]
fn create_user_round_trips() {
    let (_db, store) = setup_test_db();
    let created = store
        .create_user(NewUser::new(
            "u1".to_string(),
            "Alice".to_string(),
            None,
        ))
        .expect("create failed");
    assert_eq!(created.name(), "Alice");

    let fetched = store.get_user("u1").expect("get failed");
    assert_eq!(fetched.map(|u| u.name().clone()), Some("Alice".to_string()));
}

#[test]
fn get_user_missing_returns_none() {
    let (_db, store) = setup_test_db();
    assert!(store.get_user("nope").expect("get failed").is_none());
}

#[test]
fn create_session_persists_waiting_state() {
    let (_db, store) = setup_test_db();
    store
        .create_user(NewUser::new("host".to_string(), "Host".to_string(), None))
        .expect("create user failed");

    let row = store
        .create_session(new_session_row("s1", "host"))
        .expect("create session failed");
    assert_eq!(row.status(), "WAITING");
    assert!(row.guest_id().is_none());

    let fetched = store.get_session("s1").expect("get failed").expect("missing");
    assert_eq!(fetched.host_id(), "host");
}

#[test]
fn append_move_assigns_contiguous_move_no() {
    let (_db, store) = setup_test_db();
    store
        .create_user(NewUser::new("host".to_string(), "Host".to_string(), None))
        .expect("create user failed");
    store
        .create_session(new_session_row("s1", "host"))
        .expect("create session failed");

    store
        .transact::<_, _, strictly_grids::db::StoreError>(|conn| {
            SessionStore::append_move(conn, "m1".to_string(), "s1", "host".to_string(), 0, 0)?;
            SessionStore::append_move(conn, "m2".to_string(), "s1", "host".to_string(), 1, 1)
        })
        .expect("transact failed");

    let moves = store.list_moves("s1").expect("list failed");
    assert_eq!(moves.len(), 2);
    assert_eq!(*moves[0].move_no(), 1);
    assert_eq!(*moves[1].move_no(), 2);
}

#[test]
fn list_sessions_paginates_and_filters_by_host() {
    let (_db, store) = setup_test_db();
    store
        .create_user(NewUser::new("host".to_string(), "Host".to_string(), None))
        .expect("create user failed");
    store
        .create_user(NewUser::new("other".to_string(), "Other".to_string(), None))
        .expect("create user failed");

    for i in 0..3 {
        store
            .create_session(new_session_row(&format!("s{i}"), "host"))
            .expect("create session failed");
    }
    store
        .create_session(new_session_row("s-other", "other"))
        .expect("create session failed");

    let filter = SessionFilter {
        status: None,
        host_id: Some("host".to_string()),
        limit: 2,
        cursor: None,
    };
    let (page, next_cursor) = store.list_sessions(filter).expect("list failed");
    assert_eq!(page.len(), 2);
    assert!(next_cursor.is_some());

    let filter2 = SessionFilter {
        status: None,
        host_id: Some("host".to_string()),
        limit: 2,
        cursor: next_cursor,
    };
    let (page2, next_cursor2) = store.list_sessions(filter2).expect("list failed");
    assert_eq!(page2.len(), 1);
    assert!(next_cursor2.is_none());
}

#[test]
fn finished_sessions_and_move_counts_feed_leaderboard() {
    let (_db, store) = setup_test_db();
    store
        .create_user(NewUser::new("host".to_string(), "Host".to_string(), None))
        .expect("create user failed");
    store
        .create_session(new_session_row("s1", "host"))
        .expect("create session failed");

    store
        .transact::<_, _, strictly_grids::db::StoreError>(|conn| {
            SessionStore::save(
                conn,
                "s1",
                None,
                None,
                None,
                "FINISHED",
                None,
                "[[null,null,null],[null,null,null],[null,null,null]]".to_string(),
                Some("host".to_string()),
                false,
            )
        })
        .expect("transact failed");

    let finished = store.finished_sessions().expect("finished query failed");
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].winner().as_deref(), Some("host"));

    let counts = store
        .move_counts(&["s1".to_string()])
        .expect("move counts failed");
    assert_eq!(counts.get("s1").copied().unwrap_or(0), 0);
}

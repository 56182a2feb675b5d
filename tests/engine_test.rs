//! End-to-end scenarios for the session engine, run against a temp SQLite
//! database with migrations applied.

use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tempfile::NamedTempFile;

use strictly_grids::db::{NewUser, SessionStore};
use strictly_grids::engine::{CreateSessionInput, SessionEngine};
use strictly_grids::error::{ConflictKind, EngineError};
use strictly_grids::rules::GameType;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

fn setup() -> (NamedTempFile, SessionEngine, SessionStore) {
    let db_file = NamedTempFile::new().expect("temp file");
    let db_path = db_file.path().to_str().expect("path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("connect");
    conn.run_pending_migrations(MIGRATIONS).expect("migrate");

    let store = SessionStore::new(db_path).expect("store");
    let engine = SessionEngine::new(store.clone());
    (db_file, engine, store)
}

fn make_user(store: &SessionStore, id: &str, name: &str) {
    store
        .create_user(NewUser::new(id.to_string(), name.to_string(), None))
        .expect("create user");
}

#[tokio::test]
async fn s1_tic_tac_toe_diagonal_win() {
    let (_db, engine, store) = setup();
    make_user(&store, "u1", "U1");
    make_user(&store, "u2", "U2");

    let session = engine
        .create_session(CreateSessionInput {
            host_id: "u1".to_string(),
            host_name: None,
            host_icon: None,
            game_icon: None,
            game_type: GameType::TicTacToe,
        })
        .await
        .expect("create");

    let session = engine
        .join_session(&session.id, "u2")
        .await
        .expect("join");
    assert_eq!(session.current_turn.as_deref(), Some("u1"));

    let moves = [
        ("u1", 0, 0),
        ("u2", 0, 1),
        ("u1", 1, 1),
        ("u2", 0, 2),
        ("u1", 2, 2),
    ];
    let mut last = session;
    for (player, row, col) in moves {
        last = engine
            .submit_move(&last.id, player, row, col)
            .await
            .expect("move");
    }

    assert_eq!(last.winner.as_deref(), Some("u1"));
    assert!(!last.draw);
    assert_eq!(last.status, strictly_grids::domain::Status::Finished);
    assert!(last.current_turn.is_none());
    assert_eq!(last.moves.len(), 5);
    for (i, m) in last.moves.iter().enumerate() {
        assert_eq!(m.move_no, (i + 1) as u32);
    }
}

#[tokio::test]
async fn s2_tic_tac_toe_draw() {
    let (_db, engine, store) = setup();
    make_user(&store, "u1", "U1");
    make_user(&store, "u2", "U2");

    let session = engine
        .create_session(CreateSessionInput {
            host_id: "u1".to_string(),
            host_name: None,
            host_icon: None,
            game_icon: None,
            game_type: GameType::TicTacToe,
        })
        .await
        .expect("create");
    let session = engine.join_session(&session.id, "u2").await.expect("join");

    let moves = [
        ("u1", 0, 0),
        ("u2", 0, 1),
        ("u1", 0, 2),
        ("u2", 1, 1),
        ("u1", 1, 0),
        ("u2", 1, 2),
        ("u1", 2, 1),
        ("u2", 2, 0),
        ("u1", 2, 2),
    ];
    let mut last = session;
    for (player, row, col) in moves {
        last = engine
            .submit_move(&last.id, player, row, col)
            .await
            .expect("move");
    }

    assert!(last.draw);
    assert!(last.winner.is_none());
    assert_eq!(last.status, strictly_grids::domain::Status::Finished);
}

#[tokio::test]
async fn s3_out_of_turn_rejected() {
    let (_db, engine, store) = setup();
    make_user(&store, "u1", "U1");
    make_user(&store, "u2", "U2");

    let session = engine
        .create_session(CreateSessionInput {
            host_id: "u1".to_string(),
            host_name: None,
            host_icon: None,
            game_icon: None,
            game_type: GameType::TicTacToe,
        })
        .await
        .expect("create");
    let session = engine.join_session(&session.id, "u2").await.expect("join");

    let result = engine.submit_move(&session.id, "u2", 0, 0).await;
    match result {
        Err(EngineError::Conflict { kind, .. }) => assert_eq!(kind, ConflictKind::NotYourTurn),
        other => panic!("expected not_your_turn conflict, got {other:?}"),
    }

    let reloaded = engine.join_session(&session.id, "u1").await.expect("idempotent rejoin");
    assert!(reloaded.moves.is_empty());
    assert_eq!(reloaded.current_turn.as_deref(), Some("u1"));
}

#[tokio::test]
async fn s5_connect_four_vertical_win() {
    let (_db, engine, store) = setup();
    make_user(&store, "u1", "U1");
    make_user(&store, "u2", "U2");

    let session = engine
        .create_session(CreateSessionInput {
            host_id: "u1".to_string(),
            host_name: None,
            host_icon: None,
            game_icon: None,
            game_type: GameType::ConnectFour,
        })
        .await
        .expect("create");
    let session = engine.join_session(&session.id, "u2").await.expect("join");

    let drops = [
        ("u1", 5, 3),
        ("u2", 5, 4),
        ("u1", 4, 3),
        ("u2", 4, 4),
        ("u1", 3, 3),
        ("u2", 3, 4),
        ("u1", 2, 3),
    ];
    let mut last = session;
    for (player, row, col) in drops {
        last = engine
            .submit_move(&last.id, player, row, col)
            .await
            .expect("move");
    }

    assert_eq!(last.winner.as_deref(), Some("u1"));
    assert_eq!(last.status, strictly_grids::domain::Status::Finished);
    for row in 2..6 {
        assert_eq!(last.board.get(row, 3).as_deref(), Some("u1"));
    }
}

#[tokio::test]
async fn s6_join_after_finished_is_conflict() {
    let (_db, engine, store) = setup();
    make_user(&store, "u1", "U1");
    make_user(&store, "u2", "U2");
    make_user(&store, "u3", "U3");

    let session = engine
        .create_session(CreateSessionInput {
            host_id: "u1".to_string(),
            host_name: None,
            host_icon: None,
            game_icon: None,
            game_type: GameType::TicTacToe,
        })
        .await
        .expect("create");
    let session = engine.join_session(&session.id, "u2").await.expect("join");

    let moves = [("u1", 0, 0), ("u2", 0, 1), ("u1", 1, 1), ("u2", 0, 2), ("u1", 2, 2)];
    let mut last = session;
    for (player, row, col) in moves {
        last = engine
            .submit_move(&last.id, player, row, col)
            .await
            .expect("move");
    }
    assert_eq!(last.status, strictly_grids::domain::Status::Finished);

    let result = engine.join_session(&last.id, "u3").await;
    match result {
        Err(EngineError::Conflict { kind, .. }) => {
            assert!(matches!(kind, ConflictKind::AlreadyFinished | ConflictKind::AlreadyFull))
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn cannot_join_own_session() {
    let (_db, engine, store) = setup();
    make_user(&store, "u1", "U1");

    let session = engine
        .create_session(CreateSessionInput {
            host_id: "u1".to_string(),
            host_name: None,
            host_icon: None,
            game_icon: None,
            game_type: GameType::TicTacToe,
        })
        .await
        .expect("create");

    let result = engine.join_session(&session.id, "u1").await;
    match result {
        Err(EngineError::Conflict { kind, .. }) => assert_eq!(kind, ConflictKind::CannotJoinOwnSession),
        other => panic!("expected cannot_join_own_session conflict, got {other:?}"),
    }
}

//! The transactional state machine governing a session's lifecycle. Owns
//! the create / join / submit-move operations and the concurrency
//! discipline that makes two racing `move` requests on the same session
//! safe.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::{NewMoveRow, NewSessionRow, SessionStore};
use crate::domain::{Session, Status};
use crate::error::{ConflictKind, EngineError, ValidationKind};
use crate::rules::{GameType, RuleSet};

/// Per-session lock registry layered in front of the store's `BEGIN
/// IMMEDIATE` transactions. A single SQLite writer lock would serialize
/// every session's writes process-wide; keying a lock per session id lets
/// unrelated sessions proceed fully in parallel while moves on the same
/// session still queue up in order.
#[derive(Debug, Clone, Default)]
struct LockRegistry {
    locks: Arc<std::sync::Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl LockRegistry {
    fn lock_for(&self, session_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().expect("lock registry poisoned");
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

/// Inputs to [`SessionEngine::create_session`].
#[derive(Debug, Clone)]
pub struct CreateSessionInput {
    /// The creating user's id.
    pub host_id: String,
    /// Display name to record for the host on this session. Defaults to the
    /// host user's profile name when absent.
    pub host_name: Option<String>,
    /// Host's cosmetic icon. Defaults to the host user's profile icon when
    /// absent.
    pub host_icon: Option<String>,
    /// Cosmetic icon for the session.
    pub game_icon: Option<String>,
    /// Which game to play. Defaults to tic-tac-toe at the facade layer.
    pub game_type: GameType,
}

/// The Session Engine: create / join / submit-move orchestration.
#[derive(Debug, Clone)]
pub struct SessionEngine {
    store: SessionStore,
    locks: LockRegistry,
}

impl SessionEngine {
    /// Builds an engine over the given store.
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            locks: LockRegistry::default(),
        }
    }

    /// Verifies the host exists, initializes an empty board in WAITING,
    /// persists, and returns the full projection.
    #[instrument(skip(self, input), fields(host_id = %input.host_id))]
    pub async fn create_session(&self, input: CreateSessionInput) -> Result<Session, EngineError> {
        let store = self.store.clone();
        let host = store
            .get_user(&input.host_id)
            .map_err(EngineError::from)?
            .ok_or_else(|| EngineError::not_found("host user does not exist"))?;

        let rules = RuleSet::for_game(input.game_type);
        let board = rules.initial_board().to_json().map_err(EngineError::from)?;

        let host_name = input.host_name.unwrap_or_else(|| host.name().clone());
        let host_icon = input.host_icon.or_else(|| host.icon().clone());

        let new_session = NewSessionRow::new(
            Uuid::new_v4().to_string(),
            input.game_type.to_db_string().to_string(),
            input.game_icon,
            host.id().clone(),
            host_name,
            host_icon,
            None,
            None,
            None,
            Status::Waiting.to_db_string().to_string(),
            None,
            board,
            None,
            false,
        );

        let row = tokio::task::spawn_blocking(move || store.create_session(new_session))
            .await
            .map_err(|e| EngineError::internal(format!("join error: {e}")))?
            .map_err(EngineError::from)?;

        info!(session_id = %row.id(), "session created");
        Session::from_row(row, Vec::new())
    }

    /// Loads under lock, handles idempotent re-join, validates the joiner
    /// isn't the host, sets the guest and flips the session to ACTIVE.
    #[instrument(skip(self), fields(session_id = %session_id, player_id = %player_id))]
    pub async fn join_session(
        &self,
        session_id: &str,
        player_id: &str,
    ) -> Result<Session, EngineError> {
        let guard_lock = self.locks.lock_for(session_id);
        let _guard = guard_lock.lock().await;

        let store = self.store.clone();
        let session_id = session_id.to_string();
        let player_id = player_id.to_string();

        let row = tokio::task::spawn_blocking(move || {
            store.transact::<_, _, EngineError>(|conn| {
                let row = SessionStore::load_for_update(conn, &session_id)?
                    .ok_or_else(|| EngineError::not_found("session does not exist"))?;

                let status = Status::from_db_string(row.status())?;

                if status != Status::Waiting {
                    let already_joined = row.host_id() == &player_id
                        || row.guest_id().as_deref() == Some(player_id.as_str());
                    if already_joined {
                        return Ok(row);
                    }
                    let kind = if status == Status::Finished {
                        ConflictKind::AlreadyFinished
                    } else {
                        ConflictKind::AlreadyFull
                    };
                    return Err(EngineError::conflict(kind, "session is not joinable"));
                }

                if row.host_id() == &player_id {
                    return Err(EngineError::conflict(
                        ConflictKind::CannotJoinOwnSession,
                        "host cannot join their own session as guest",
                    ));
                }

                let guest = store
                    .get_user(&player_id)
                    .map_err(EngineError::from)?
                    .ok_or_else(|| EngineError::not_found("guest user does not exist"))?;

                let host_id = row.host_id().clone();
                let updated = SessionStore::save(
                    conn,
                    row.id(),
                    Some(guest.id().clone()),
                    Some(guest.name().clone()),
                    guest.icon().clone(),
                    Status::Active.to_db_string(),
                    Some(host_id),
                    row.board().clone(),
                    None,
                    false,
                )?;
                Ok(updated)
            })
        })
        .await
        .map_err(|e| EngineError::internal(format!("join error: {e}")))??;

        let moves = self.store.list_moves(row.id()).map_err(EngineError::from)?;
        info!(session_id = %row.id(), "session joined");
        Session::from_row(row, moves)
    }

    /// Loads under lock, validates turn order and move legality, mutates
    /// the board, detects win/draw, and commits.
    #[instrument(skip(self), fields(session_id = %session_id, player_id = %player_id))]
    pub async fn submit_move(
        &self,
        session_id: &str,
        player_id: &str,
        row_in: usize,
        col_in: usize,
    ) -> Result<Session, EngineError> {
        let guard_lock = self.locks.lock_for(session_id);
        let _guard = guard_lock.lock().await;

        let store = self.store.clone();
        let session_id_owned = session_id.to_string();
        let player_id_owned = player_id.to_string();

        let row = tokio::task::spawn_blocking(move || {
            store.transact::<_, _, EngineError>(|conn| {
                let session = SessionStore::load_for_update(conn, &session_id_owned)?
                    .ok_or_else(|| EngineError::not_found("session does not exist"))?;

                let status = Status::from_db_string(session.status())?;
                match status {
                    Status::Waiting => {
                        return Err(EngineError::conflict(
                            ConflictKind::NotActive,
                            "session has not started",
                        ))
                    }
                    Status::Finished => {
                        return Err(EngineError::conflict(
                            ConflictKind::AlreadyFinished,
                            "session has already finished",
                        ))
                    }
                    Status::Active => {}
                }

                let guest_id = session.guest_id().clone();
                if session.host_id() != &player_id_owned
                    && guest_id.as_deref() != Some(player_id_owned.as_str())
                {
                    return Err(EngineError::validation(
                        ValidationKind::NotInSession,
                        "player is not in this session",
                    ));
                }
                if session.current_turn().as_deref() != Some(player_id_owned.as_str()) {
                    return Err(EngineError::conflict(
                        ConflictKind::NotYourTurn,
                        "it is not this player's turn",
                    ));
                }

                let game_type = GameType::from_db_string(session.game_type())?;
                let rules = RuleSet::for_game(game_type);
                let mut board = crate::board::Board::from_json(session.board())?;

                let (row, col) = rules
                    .validate_move(&board, row_in, col_in)
                    .map_err(EngineError::from)?;

                board.set(row, col, player_id_owned.clone());

                let existing_moves = store.list_moves(&session_id_owned)?;
                let move_no = existing_moves.len() as i32 + 1;
                SessionStore::append_move(
                    conn,
                    Uuid::new_v4().to_string(),
                    &session_id_owned,
                    player_id_owned.clone(),
                    row as i32,
                    col as i32,
                )?;

                let board_json = board.to_json()?;

                let won = rules.check_winner(&board, row, col, &player_id_owned);
                let (status, winner, draw, next_turn) = if won {
                    (Status::Finished, Some(player_id_owned.clone()), false, None)
                } else if rules.check_draw(&board, move_no as usize) {
                    (Status::Finished, None, true, None)
                } else {
                    let other = if session.host_id() == &player_id_owned {
                        guest_id.clone().unwrap_or_default()
                    } else {
                        session.host_id().clone()
                    };
                    (Status::Active, None, false, Some(other))
                };

                let updated = SessionStore::save(
                    conn,
                    &session_id_owned,
                    guest_id,
                    session.guest_name().clone(),
                    session.guest_icon().clone(),
                    status.to_db_string(),
                    next_turn,
                    board_json,
                    winner,
                    draw,
                )?;
                Ok(updated)
            })
        })
        .await
        .map_err(|e| EngineError::internal(format!("move error: {e}")))??;

        let moves = self.store.list_moves(row.id()).map_err(EngineError::from)?;
        info!(session_id = %row.id(), move_count = moves.len(), "move submitted");
        Session::from_row(row, moves)
    }
}

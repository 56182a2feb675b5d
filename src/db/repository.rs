//! Session store: transactional persistence for users, sessions and moves.
//!
//! [`SessionStore::transact`] is the session lock primitive: it opens a
//! SQLite `BEGIN IMMEDIATE` transaction, which blocks until it can acquire
//! the database's write lock and holds it until the closure returns. Every
//! mutation the engine performs on a session happens inside that one
//! transaction, so a partial move (board written but status not yet
//! FINISHED, or vice versa) is never observable — a caller-aborted request
//! rolls the whole transaction back.

use base64::Engine as _;
use diesel::connection::Connection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

use crate::db::models::{MoveRow, NewMoveRow, NewSessionRow, NewUser, SessionRow, User};
use crate::db::schema;
use crate::db::StoreError;

/// Filter and pagination parameters for [`SessionStore::list_sessions`].
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Restrict to sessions in this status.
    pub status: Option<String>,
    /// Restrict to sessions with this host.
    pub host_id: Option<String>,
    /// Maximum rows to return (caller must have already bounded this, e.g. <= 100).
    pub limit: i64,
    /// Opaque cursor from a previous page, if any.
    pub cursor: Option<String>,
}

/// Persistent, transactional store of sessions and their append-only moves.
#[derive(Debug, Clone)]
pub struct SessionStore {
    db_path: String,
}

/// Cursor payload: the `(created_at, id)` of the last row on the previous page.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Cursor {
    created_at: chrono::NaiveDateTime,
    id: String,
}

impl SessionStore {
    /// Creates a new store backed by the SQLite database at `db_path`.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests, though
    /// each connection gets its own in-memory database, so tests generally
    /// want a temp file instead).
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, StoreError> {
        info!(path = %db_path, "creating session store");
        Ok(Self { db_path })
    }

    /// Establishes a connection with foreign-key enforcement turned on.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)?;
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(conn)
    }

    /// Creates a new user profile.
    #[instrument(skip(self, new_user), fields(user_id = %new_user.id()))]
    pub fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut conn = self.connection()?;
        let user = diesel::insert_into(schema::users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)?;
        info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    /// Gets a user by id. Returns `None` if not found.
    #[instrument(skip(self))]
    pub fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.connection()?;
        let user = schema::users::table
            .find(id)
            .first::<User>(&mut conn)
            .optional()?;
        Ok(user)
    }

    /// Creates a new session.
    #[instrument(skip(self, new_session), fields(session_id = %new_session.id()))]
    pub fn create_session(&self, new_session: NewSessionRow) -> Result<SessionRow, StoreError> {
        let mut conn = self.connection()?;
        let session = diesel::insert_into(schema::sessions::table)
            .values(&new_session)
            .returning(SessionRow::as_returning())
            .get_result(&mut conn)?;
        info!(session_id = %session.id(), "session created");
        Ok(session)
    }

    /// Gets a session by id, outside any transaction. Callers that intend to
    /// mutate the session must go through [`SessionStore::transact`] and
    /// [`SessionStore::load_for_update`] instead.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: &str) -> Result<Option<SessionRow>, StoreError> {
        let mut conn = self.connection()?;
        let session = schema::sessions::table
            .find(id)
            .first::<SessionRow>(&mut conn)
            .optional()?;
        Ok(session)
    }

    /// Lists moves for a session, ordered by `move_no`.
    #[instrument(skip(self))]
    pub fn list_moves(&self, session_id: &str) -> Result<Vec<MoveRow>, StoreError> {
        let mut conn = self.connection()?;
        let moves = schema::moves::table
            .filter(schema::moves::session_id.eq(session_id))
            .order(schema::moves::move_no.asc())
            .load::<MoveRow>(&mut conn)?;
        Ok(moves)
    }

    /// Lists sessions matching `filter`, newest first, with opaque-cursor
    /// pagination. Returns the page and an encoded cursor for the next page,
    /// or `None` if this was the last page.
    #[instrument(skip(self, filter))]
    pub fn list_sessions(
        &self,
        filter: SessionFilter,
    ) -> Result<(Vec<SessionRow>, Option<String>), StoreError> {
        let mut conn = self.connection()?;
        let decoded = filter
            .cursor
            .as_deref()
            .map(decode_cursor)
            .transpose()?;

        let mut query = schema::sessions::table.into_boxed();
        if let Some(status) = &filter.status {
            query = query.filter(schema::sessions::status.eq(status.clone()));
        }
        if let Some(host_id) = &filter.host_id {
            query = query.filter(schema::sessions::host_id.eq(host_id.clone()));
        }
        if let Some(cursor) = &decoded {
            query = query.filter(
                schema::sessions::created_at
                    .lt(cursor.created_at)
                    .or(schema::sessions::created_at
                        .eq(cursor.created_at)
                        .and(schema::sessions::id.lt(cursor.id.clone()))),
            );
        }

        let page_size = filter.limit.max(1);
        let rows = query
            .order((
                schema::sessions::created_at.desc(),
                schema::sessions::id.desc(),
            ))
            .limit(page_size + 1)
            .load::<SessionRow>(&mut conn)?;

        let has_more = rows.len() as i64 > page_size;
        let mut page = rows;
        page.truncate(page_size as usize);

        let next_cursor = if has_more {
            page.last().map(|last| {
                encode_cursor(&Cursor {
                    created_at: *last.created_at(),
                    id: last.id().clone(),
                })
            })
        } else {
            None
        };

        Ok((page, next_cursor))
    }

    /// Returns every FINISHED session, for leaderboard aggregation.
    #[instrument(skip(self))]
    pub fn finished_sessions(&self) -> Result<Vec<SessionRow>, StoreError> {
        let mut conn = self.connection()?;
        let rows = schema::sessions::table
            .filter(schema::sessions::status.eq("FINISHED"))
            .load::<SessionRow>(&mut conn)?;
        Ok(rows)
    }

    /// Returns the number of recorded moves per session id, for the sessions
    /// given. Used by leaderboard efficiency aggregation.
    #[instrument(skip(self, session_ids))]
    pub fn move_counts(
        &self,
        session_ids: &[String],
    ) -> Result<std::collections::HashMap<String, i64>, StoreError> {
        let mut conn = self.connection()?;
        let counts: Vec<(String, i64)> = schema::moves::table
            .filter(schema::moves::session_id.eq_any(session_ids))
            .group_by(schema::moves::session_id)
            .select((
                schema::moves::session_id,
                diesel::dsl::count(schema::moves::id),
            ))
            .load(&mut conn)?;
        Ok(counts.into_iter().collect())
    }

    /// Opens a `BEGIN IMMEDIATE` transaction and runs `f` inside it. This is
    /// the session lock: it blocks until SQLite's single writer lock is
    /// free, and holds it for the duration of `f` — released only when the
    /// transaction commits or rolls back.
    ///
    /// Generic over the error type so callers (the engine) can return their
    /// own tagged errors directly from the closure via `?`, rather than
    /// funnelling business-logic failures through [`StoreError`] first.
    #[instrument(skip(self, f))]
    pub fn transact<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<R, E>,
        E: From<diesel::result::Error> + From<StoreError>,
    {
        let mut conn = self.connection().map_err(E::from)?;
        conn.immediate_transaction(f)
    }

    /// Loads a session row by id inside an open transaction.
    #[instrument(skip(conn))]
    pub fn load_for_update(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<SessionRow>, StoreError> {
        let session = schema::sessions::table
            .find(id)
            .first::<SessionRow>(conn)
            .optional()?;
        Ok(session)
    }

    /// Persists the mutable fields of a session inside an open transaction.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(conn))]
    pub fn save(
        conn: &mut SqliteConnection,
        id: &str,
        guest_id: Option<String>,
        guest_name: Option<String>,
        guest_icon: Option<String>,
        status: &str,
        current_turn: Option<String>,
        board_json: String,
        winner: Option<String>,
        draw: bool,
    ) -> Result<SessionRow, StoreError> {
        let updated = diesel::update(schema::sessions::table.find(id))
            .set((
                schema::sessions::guest_id.eq(guest_id),
                schema::sessions::guest_name.eq(guest_name),
                schema::sessions::guest_icon.eq(guest_icon),
                schema::sessions::status.eq(status),
                schema::sessions::current_turn.eq(current_turn),
                schema::sessions::board.eq(board_json),
                schema::sessions::winner.eq(winner),
                schema::sessions::draw.eq(draw),
            ))
            .returning(SessionRow::as_returning())
            .get_result(conn)?;
        Ok(updated)
    }

    /// Appends a move inside an open transaction, assigning `move_no` as one
    /// past the current maximum for the session.
    #[instrument(skip(conn))]
    pub fn append_move(
        conn: &mut SqliteConnection,
        id: String,
        session_id: &str,
        player_id: String,
        row: i32,
        col: i32,
    ) -> Result<MoveRow, StoreError> {
        let current_max: Option<i32> = schema::moves::table
            .filter(schema::moves::session_id.eq(session_id))
            .select(diesel::dsl::max(schema::moves::move_no))
            .first(conn)?;
        let move_no = current_max.unwrap_or(0) + 1;

        let new_move = NewMoveRow::new(id, session_id.to_string(), player_id, row, col, move_no);
        let inserted = diesel::insert_into(schema::moves::table)
            .values(&new_move)
            .returning(MoveRow::as_returning())
            .get_result(conn)?;
        Ok(inserted)
    }
}

fn encode_cursor(cursor: &Cursor) -> String {
    let json = serde_json::to_vec(cursor).expect("Cursor always serializes");
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json)
}

fn decode_cursor(token: &str) -> Result<Cursor, StoreError> {
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| StoreError::invalid_cursor(format!("invalid cursor: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::invalid_cursor(format!("invalid cursor: {e}")))
}

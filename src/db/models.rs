//! Database models for users, sessions and moves.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::schema;

/// User profile database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: String,
    name: String,
    icon: Option<String>,
    created_at: NaiveDateTime,
}

/// Insertable user model for creating new users.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    id: String,
    name: String,
    icon: Option<String>,
}

/// Session database row.
///
/// `board` is a JSON-serialized 2D array; callers go through
/// [`crate::board::Board`] rather than parsing this field directly.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::sessions)]
pub struct SessionRow {
    id: String,
    game_type: String,
    game_icon: Option<String>,
    host_id: String,
    host_name: String,
    host_icon: Option<String>,
    guest_id: Option<String>,
    guest_name: Option<String>,
    guest_icon: Option<String>,
    status: String,
    current_turn: Option<String>,
    board: String,
    winner: Option<String>,
    draw: bool,
    created_at: NaiveDateTime,
}

/// Insertable session row, produced by the engine on session creation.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::sessions)]
pub struct NewSessionRow {
    id: String,
    game_type: String,
    game_icon: Option<String>,
    host_id: String,
    host_name: String,
    host_icon: Option<String>,
    guest_id: Option<String>,
    guest_name: Option<String>,
    guest_icon: Option<String>,
    status: String,
    current_turn: Option<String>,
    board: String,
    winner: Option<String>,
    draw: bool,
}

/// Move database row; the move log is append-only.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::moves)]
pub struct MoveRow {
    id: String,
    session_id: String,
    player_id: String,
    row: i32,
    col: i32,
    move_no: i32,
    created_at: NaiveDateTime,
}

/// Insertable move row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::moves)]
pub struct NewMoveRow {
    id: String,
    session_id: String,
    player_id: String,
    row: i32,
    col: i32,
    move_no: i32,
}

//! Wire DTOs: camelCase JSON shapes and their conversions to/from domain
//! types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::Cell;
use crate::domain::{self, Session};
use crate::query::{LeaderboardEntry, LeaderboardMetric, SessionPage};
use crate::rules::GameType;

fn iso(dt: chrono::NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(dt, Utc)
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<crate::db::User> for UserResponse {
    fn from(user: crate::db::User) -> Self {
        Self {
            id: user.id().clone(),
            name: user.name().clone(),
            icon: user.icon().clone(),
            created_at: iso(*user.created_at()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub host_id: String,
    pub host_name: Option<String>,
    pub host_icon: Option<String>,
    pub game_icon: Option<String>,
    pub game_type: Option<GameType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub player_id: String,
    pub row: i64,
    pub col: i64,
}

#[derive(Debug, Serialize)]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
}

impl From<&domain::Player> for PlayerDto {
    fn from(p: &domain::Player) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            icon: p.icon.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDto {
    pub player_id: String,
    pub row: usize,
    pub col: usize,
    pub move_no: u32,
}

impl From<&domain::Move> for MoveDto {
    fn from(m: &domain::Move) -> Self {
        Self {
            player_id: m.player_id.clone(),
            row: m.row,
            col: m.col,
            move_no: m.move_no,
        }
    }
}

/// The canonical `Session` wire shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub players: Vec<PlayerDto>,
    pub status: String,
    pub current_turn: Option<String>,
    pub board: Vec<Vec<Cell>>,
    pub moves: Vec<MoveDto>,
    pub winner: Option<String>,
    pub draw: bool,
    pub game_icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        let status = match session.status {
            domain::Status::Waiting => "WAITING",
            domain::Status::Active => "ACTIVE",
            domain::Status::Finished => "FINISHED",
        };
        Self {
            id: session.id,
            players: session.players().into_iter().map(PlayerDto::from).collect(),
            status: status.to_string(),
            current_turn: session.current_turn,
            board: session.board.rows_iter().cloned().collect(),
            moves: session.moves.iter().map(MoveDto::from).collect(),
            winner: session.winner,
            draw: session.draw,
            game_icon: session.game_icon,
            created_at: iso(session.created_at),
        }
    }
}

/// Compact per-item projection for list-sessions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryDto {
    pub id: String,
    pub host: PlayerDto,
    pub game_icon: Option<String>,
    pub status: String,
    pub players: Vec<PlayerDto>,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionSummaryDto {
    fn from(session: &Session) -> Self {
        let status = match session.status {
            domain::Status::Waiting => "WAITING",
            domain::Status::Active => "ACTIVE",
            domain::Status::Finished => "FINISHED",
        };
        Self {
            id: session.id.clone(),
            host: PlayerDto::from(&session.host),
            game_icon: session.game_icon.clone(),
            status: status.to_string(),
            players: session.players().into_iter().map(PlayerDto::from).collect(),
            created_at: iso(session.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    pub status: Option<String>,
    pub host_id: Option<String>,
    pub limit: Option<i64>,
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsPageResponse {
    pub items: Vec<SessionSummaryDto>,
    pub next_cursor: Option<String>,
}

impl From<SessionPage> for SessionsPageResponse {
    fn from(page: SessionPage) -> Self {
        Self {
            items: page.items.iter().map(SessionSummaryDto::from).collect(),
            next_cursor: page.next_cursor,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub metric: Option<String>,
    pub limit: Option<usize>,
}

impl LeaderboardQuery {
    pub fn metric(&self) -> Result<LeaderboardMetric, crate::error::EngineError> {
        match self.metric.as_deref() {
            None | Some("win_count") => Ok(LeaderboardMetric::WinCount),
            Some("efficiency") => Ok(LeaderboardMetric::Efficiency),
            Some(other) => Err(crate::error::EngineError::validation(
                crate::error::ValidationKind::InvalidMetric,
                format!("unknown leaderboard metric: '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryDto {
    pub player_id: String,
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub efficiency: Option<f64>,
}

impl From<LeaderboardEntry> for LeaderboardEntryDto {
    fn from(e: LeaderboardEntry) -> Self {
        Self {
            player_id: e.player_id,
            name: e.name,
            wins: e.wins,
            losses: e.losses,
            draws: e.draws,
            efficiency: e.efficiency,
        }
    }
}

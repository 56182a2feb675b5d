//! Domain projections shared by the Session Engine and Query Surface: the
//! canonical `Session` shape, assembled from store rows.

use chrono::NaiveDateTime;

use crate::board::Board;
use crate::db::{MoveRow, SessionRow};
use crate::error::EngineError;
use crate::rules::GameType;

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Waiting for a second player to join.
    Waiting,
    /// Both players present, moves being exchanged.
    Active,
    /// Terminal: a winner or a draw.
    Finished,
}

impl Status {
    /// Converts to the string stored in the `sessions.status` column.
    pub fn to_db_string(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Active => "ACTIVE",
            Self::Finished => "FINISHED",
        }
    }

    /// Parses from the string stored in the `sessions.status` column.
    pub fn from_db_string(s: &str) -> Result<Self, EngineError> {
        match s {
            "WAITING" => Ok(Self::Waiting),
            "ACTIVE" => Ok(Self::Active),
            "FINISHED" => Ok(Self::Finished),
            other => Err(EngineError::internal(format!(
                "invariant violation: unknown status '{other}' in store"
            ))),
        }
    }
}

/// A player as embedded in a session's roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Player's unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional cosmetic icon.
    pub icon: Option<String>,
}

/// A single recorded move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Who made the move.
    pub player_id: String,
    /// Row placed.
    pub row: usize,
    /// Column placed.
    pub col: usize,
    /// 1-based, contiguous per session.
    pub move_no: u32,
    /// When the move was committed.
    pub created_at: NaiveDateTime,
}

impl From<MoveRow> for Move {
    fn from(row: MoveRow) -> Self {
        Self {
            player_id: row.player_id().clone(),
            row: *row.row() as usize,
            col: *row.col() as usize,
            move_no: *row.move_no() as u32,
            created_at: *row.created_at(),
        }
    }
}

/// The full session projection returned by create/join/move and by
/// get-session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session id.
    pub id: String,
    /// Which game this session plays.
    pub game_type: GameType,
    /// Optional cosmetic icon for the session itself.
    pub game_icon: Option<String>,
    /// The creator.
    pub host: Player,
    /// The second player, once joined.
    pub guest: Option<Player>,
    /// Lifecycle state.
    pub status: Status,
    /// Whose move it is; `None` unless ACTIVE.
    pub current_turn: Option<String>,
    /// Current board contents.
    pub board: Board,
    /// The winner, if any.
    pub winner: Option<String>,
    /// Whether the session ended in a draw.
    pub draw: bool,
    /// Move log, ordered by `move_no`.
    pub moves: Vec<Move>,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

impl Session {
    /// Assembles the domain projection from a store row and its moves.
    pub fn from_row(row: SessionRow, moves: Vec<MoveRow>) -> Result<Self, EngineError> {
        let game_type = GameType::from_db_string(row.game_type())?;
        let status = Status::from_db_string(row.status())?;
        let board = Board::from_json(row.board())?;

        let host = Player {
            id: row.host_id().clone(),
            name: row.host_name().clone(),
            icon: row.host_icon().clone(),
        };
        let guest = row.guest_id().clone().map(|id| Player {
            id,
            name: row
                .guest_name()
                .clone()
                .unwrap_or_else(|| "guest".to_string()),
            icon: row.guest_icon().clone(),
        });

        Ok(Self {
            id: row.id().clone(),
            game_type,
            game_icon: row.game_icon().clone(),
            host,
            guest,
            status,
            current_turn: row.current_turn().clone(),
            board,
            winner: row.winner().clone(),
            draw: *row.draw(),
            moves: moves.into_iter().map(Move::from).collect(),
            created_at: *row.created_at(),
        })
    }

    /// The roster as `[host, guest?]`.
    pub fn players(&self) -> Vec<&Player> {
        let mut players = vec![&self.host];
        if let Some(guest) = &self.guest {
            players.push(guest);
        }
        players
    }
}

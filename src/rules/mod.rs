//! Per-game board geometry, legal-move checking and win/draw detection,
//! dispatched on a closed set of tagged variants rather than runtime
//! reflection.

mod connect_four;
mod tic_tac_toe;

use crate::board::Board;
use crate::db::StoreError;

pub use connect_four::ConnectFourRules;
pub use tic_tac_toe::TicTacToeRules;

/// The game a session is playing. Immutable after session creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    /// 3x3 tic-tac-toe.
    TicTacToe,
    /// 6-row by 7-column connect four.
    ConnectFour,
}

impl GameType {
    /// Converts to the string stored in the `sessions.game_type` column.
    pub fn to_db_string(self) -> &'static str {
        match self {
            Self::TicTacToe => "tic_tac_toe",
            Self::ConnectFour => "connect_four",
        }
    }

    /// Parses from the string stored in the `sessions.game_type` column, or
    /// from a client-supplied `gameType` field.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the string doesn't name a known game.
    pub fn from_db_string(s: &str) -> Result<Self, StoreError> {
        match s {
            "tic_tac_toe" => Ok(Self::TicTacToe),
            "connect_four" => Ok(Self::ConnectFour),
            other => Err(StoreError::new(format!("unknown game_type: '{other}'"))),
        }
    }
}

/// Why a move failed rules validation. The engine maps these to its own
/// `validation` / `conflict` error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Coordinates fall outside the board.
    OutOfBounds,
    /// Target cell already holds a mark.
    CellOccupied,
    /// Coordinates violate the game's move geometry (e.g. a connect-four
    /// drop that doesn't land on the lowest empty row).
    IllegalGeometry,
}

/// Per-game rule set, dispatched on [`GameType`].
///
/// This is a closed enum rather than a trait object: the set of games is
/// fixed and known at compile time, and enum dispatch keeps the Session
/// Engine's hot path (validate → mutate → detect) free of vtable calls and
/// heap allocation.
#[derive(Debug, Clone, Copy)]
pub enum RuleSet {
    /// Tic-tac-toe rules.
    TicTacToe(TicTacToeRules),
    /// Connect-four rules.
    ConnectFour(ConnectFourRules),
}

impl RuleSet {
    /// Looks up the rule set for a game type. Initialized once, read-only,
    /// safe for concurrent use.
    pub fn for_game(game_type: GameType) -> Self {
        match game_type {
            GameType::TicTacToe => Self::TicTacToe(TicTacToeRules),
            GameType::ConnectFour => Self::ConnectFour(ConnectFourRules),
        }
    }

    /// The empty board for this game.
    pub fn initial_board(&self) -> Board {
        match self {
            Self::TicTacToe(r) => r.initial_board(),
            Self::ConnectFour(r) => r.initial_board(),
        }
    }

    /// Board dimensions as `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::TicTacToe(r) => r.dimensions(),
            Self::ConnectFour(r) => r.dimensions(),
        }
    }

    /// Validates a move and resolves it to the cell that will actually be
    /// written. For tic-tac-toe this is an identity check on `(row, col)`;
    /// for connect-four, `row` is recomputed as the lowest empty row in
    /// `col`, which subsumes verifying any caller-supplied row.
    pub fn validate_move(
        &self,
        board: &Board,
        row: usize,
        col: usize,
    ) -> Result<(usize, usize), MoveError> {
        match self {
            Self::TicTacToe(r) => r.validate_move(board, row, col),
            Self::ConnectFour(r) => r.validate_move(board, row, col),
        }
    }

    /// True if placing at `(row, col)` gives `player_id` a win. Evaluated
    /// incrementally in the neighborhood of the just-placed cell.
    pub fn check_winner(&self, board: &Board, row: usize, col: usize, player_id: &str) -> bool {
        match self {
            Self::TicTacToe(r) => r.check_winner(board, row, col, player_id),
            Self::ConnectFour(r) => r.check_winner(board, row, col, player_id),
        }
    }

    /// True if the board is full (and, by the time the engine calls this,
    /// already known to have no winner).
    pub fn check_draw(&self, board: &Board, move_count: usize) -> bool {
        let (rows, cols) = self.dimensions();
        move_count == rows * cols && board.is_full()
    }
}

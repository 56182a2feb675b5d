//! The game board: a rectangular grid of cells, each holding a player id or
//! nothing. Shape is dictated by the game type.

use serde::{Deserialize, Serialize};

use crate::db::StoreError;

/// A single square: either empty or occupied by the given player.
pub type Cell = Option<String>;

/// Rectangular grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Vec<Cell>>,
}

impl Board {
    /// Creates an empty board with the given dimensions.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![None; cols]; rows],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cells.first().map(Vec::len).unwrap_or(0)
    }

    /// Whether `(row, col)` lies within the board.
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols()
    }

    /// Reads a cell. Panics if out of bounds; callers must check
    /// [`Board::in_bounds`] first.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row][col]
    }

    /// Occupies a cell with `player_id`.
    pub fn set(&mut self, row: usize, col: usize, player_id: impl Into<String>) {
        self.cells[row][col] = Some(player_id.into());
    }

    /// Underlying rows, for iteration (win/draw detection).
    pub fn rows_iter(&self) -> impl Iterator<Item = &Vec<Cell>> {
        self.cells.iter()
    }

    /// True when every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    /// Serializes to the JSON text stored in the `sessions.board` column.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes from the JSON text stored in the `sessions.board` column.
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_has_no_occupied_cells() {
        let board = Board::empty(3, 3);
        assert_eq!(board.rows(), 3);
        assert_eq!(board.cols(), 3);
        assert!(!board.is_full());
        assert!(board.get(0, 0).is_none());
    }

    #[test]
    fn set_occupies_a_cell() {
        let mut board = Board::empty(3, 3);
        board.set(1, 1, "u1");
        assert_eq!(board.get(1, 1).as_deref(), Some("u1"));
    }

    #[test]
    fn json_round_trip_preserves_cells() {
        let mut board = Board::empty(6, 7);
        board.set(5, 3, "u1");
        board.set(4, 3, "u2");
        let json = board.to_json().expect("serialize");
        let restored = Board::from_json(&json).expect("deserialize");
        assert_eq!(board, restored);
    }

    #[test]
    fn is_full_detects_saturation() {
        let mut board = Board::empty(1, 2);
        board.set(0, 0, "u1");
        assert!(!board.is_full());
        board.set(0, 1, "u2");
        assert!(board.is_full());
    }
}

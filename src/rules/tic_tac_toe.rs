//! Tic-tac-toe: 3x3 board, three in a row wins.

use crate::board::Board;
use crate::rules::MoveError;

/// Tic-tac-toe rule set.
#[derive(Debug, Clone, Copy)]
pub struct TicTacToeRules;

const SIZE: usize = 3;

impl TicTacToeRules {
    pub(crate) fn initial_board(&self) -> Board {
        Board::empty(SIZE, SIZE)
    }

    pub(crate) fn dimensions(&self) -> (usize, usize) {
        (SIZE, SIZE)
    }

    pub(crate) fn validate_move(
        &self,
        board: &Board,
        row: usize,
        col: usize,
    ) -> Result<(usize, usize), MoveError> {
        if row >= SIZE || col >= SIZE {
            return Err(MoveError::OutOfBounds);
        }
        if board.get(row, col).is_some() {
            return Err(MoveError::CellOccupied);
        }
        Ok((row, col))
    }

    pub(crate) fn check_winner(&self, board: &Board, row: usize, col: usize, player_id: &str) -> bool {
        let is_player = |r: usize, c: usize| board.get(r, c).as_deref() == Some(player_id);

        let full_row = (0..SIZE).all(|c| is_player(row, c));
        let full_col = (0..SIZE).all(|r| is_player(r, col));
        let on_main_diag = row == col;
        let on_anti_diag = row + col == SIZE - 1;
        let main_diag = on_main_diag && (0..SIZE).all(|i| is_player(i, i));
        let anti_diag = on_anti_diag && (0..SIZE).all(|i| is_player(i, SIZE - 1 - i));

        full_row || full_col || main_diag || anti_diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, row: usize, col: usize, player: &str) {
        board.set(row, col, player);
    }

    #[test]
    fn validate_move_rejects_out_of_bounds() {
        let rules = TicTacToeRules;
        let board = rules.initial_board();
        assert_eq!(rules.validate_move(&board, 3, 0), Err(MoveError::OutOfBounds));
        assert_eq!(rules.validate_move(&board, 0, 3), Err(MoveError::OutOfBounds));
    }

    #[test]
    fn validate_move_rejects_occupied_cell() {
        let rules = TicTacToeRules;
        let mut board = rules.initial_board();
        place(&mut board, 0, 0, "u1");
        assert_eq!(rules.validate_move(&board, 0, 0), Err(MoveError::CellOccupied));
    }

    #[test]
    fn validate_move_accepts_empty_in_bounds_cell() {
        let rules = TicTacToeRules;
        let board = rules.initial_board();
        assert_eq!(rules.validate_move(&board, 1, 2), Ok((1, 2)));
    }

    #[test]
    fn detects_row_win() {
        let rules = TicTacToeRules;
        let mut board = rules.initial_board();
        place(&mut board, 0, 0, "u1");
        place(&mut board, 0, 1, "u1");
        place(&mut board, 0, 2, "u1");
        assert!(rules.check_winner(&board, 0, 2, "u1"));
    }

    #[test]
    fn detects_column_win() {
        let rules = TicTacToeRules;
        let mut board = rules.initial_board();
        place(&mut board, 0, 1, "u1");
        place(&mut board, 1, 1, "u1");
        place(&mut board, 2, 1, "u1");
        assert!(rules.check_winner(&board, 2, 1, "u1"));
    }

    #[test]
    fn detects_main_diagonal_win() {
        let rules = TicTacToeRules;
        let mut board = rules.initial_board();
        place(&mut board, 0, 0, "u1");
        place(&mut board, 1, 1, "u1");
        place(&mut board, 2, 2, "u1");
        assert!(rules.check_winner(&board, 2, 2, "u1"));
    }

    #[test]
    fn detects_anti_diagonal_win() {
        let rules = TicTacToeRules;
        let mut board = rules.initial_board();
        place(&mut board, 0, 2, "u1");
        place(&mut board, 1, 1, "u1");
        place(&mut board, 2, 0, "u1");
        assert!(rules.check_winner(&board, 2, 0, "u1"));
    }

    #[test]
    fn no_false_positive_on_incomplete_line() {
        let rules = TicTacToeRules;
        let mut board = rules.initial_board();
        place(&mut board, 0, 0, "u1");
        place(&mut board, 0, 1, "u1");
        assert!(!rules.check_winner(&board, 0, 1, "u1"));
    }
}

//! Connect four: 6 rows by 7 columns, moves are dropped into a column and
//! land on the lowest empty row. Four in a row (any direction) wins.

use crate::board::Board;
use crate::rules::MoveError;

/// Connect-four rule set.
#[derive(Debug, Clone, Copy)]
pub struct ConnectFourRules;

const ROWS: usize = 6;
const COLS: usize = 7;
const RUN_LENGTH: usize = 4;

impl ConnectFourRules {
    pub(crate) fn initial_board(&self) -> Board {
        Board::empty(ROWS, COLS)
    }

    pub(crate) fn dimensions(&self) -> (usize, usize) {
        (ROWS, COLS)
    }

    /// Connect-four moves are parameterized by column; the caller is still
    /// required to pass the row it believes the piece will land on (the
    /// lowest empty row in that column), and a stale or wrong row is
    /// rejected rather than silently corrected.
    pub(crate) fn validate_move(
        &self,
        board: &Board,
        row: usize,
        col: usize,
    ) -> Result<(usize, usize), MoveError> {
        if col >= COLS {
            return Err(MoveError::OutOfBounds);
        }
        if board.get(0, col).is_some() {
            return Err(MoveError::CellOccupied);
        }
        let drop_row = (0..ROWS)
            .rev()
            .find(|&r| board.get(r, col).is_none())
            .expect("column has an empty cell: checked above");
        if row != drop_row {
            return Err(MoveError::IllegalGeometry);
        }
        Ok((drop_row, col))
    }

    pub(crate) fn check_winner(&self, board: &Board, row: usize, col: usize, player_id: &str) -> bool {
        const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

        DIRECTIONS.iter().any(|&(dr, dc)| {
            let forward = run_length(board, row, col, player_id, dr, dc);
            let backward = run_length(board, row, col, player_id, -dr, -dc);
            1 + forward + backward >= RUN_LENGTH
        })
    }
}

/// Counts contiguous cells occupied by `player_id` starting one step past
/// `(row, col)` in direction `(dr, dc)`, not including `(row, col)` itself.
fn run_length(
    board: &Board,
    row: usize,
    col: usize,
    player_id: &str,
    dr: isize,
    dc: isize,
) -> usize {
    let mut count = 0;
    let mut r = row as isize + dr;
    let mut c = col as isize + dc;

    while r >= 0 && c >= 0 {
        let (ru, cu) = (r as usize, c as usize);
        if !board.in_bounds(ru, cu) || board.get(ru, cu).as_deref() != Some(player_id) {
            break;
        }
        count += 1;
        r += dr;
        c += dc;
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_move_rejects_column_out_of_bounds() {
        let rules = ConnectFourRules;
        let board = rules.initial_board();
        assert_eq!(rules.validate_move(&board, 0, 7), Err(MoveError::OutOfBounds));
    }

    #[test]
    fn validate_move_accepts_correct_drop_row_on_empty_column() {
        let rules = ConnectFourRules;
        let board = rules.initial_board();
        assert_eq!(rules.validate_move(&board, 5, 3), Ok((5, 3)));
    }

    #[test]
    fn validate_move_rejects_row_that_is_not_the_drop_row() {
        let rules = ConnectFourRules;
        let board = rules.initial_board();
        assert_eq!(
            rules.validate_move(&board, 0, 3),
            Err(MoveError::IllegalGeometry)
        );
    }

    #[test]
    fn validate_move_stacks_on_top_of_existing_pieces() {
        let rules = ConnectFourRules;
        let mut board = rules.initial_board();
        board.set(5, 3, "u1");
        board.set(4, 3, "u2");
        assert_eq!(rules.validate_move(&board, 3, 3), Ok((3, 3)));
    }

    #[test]
    fn validate_move_rejects_full_column() {
        let rules = ConnectFourRules;
        let mut board = rules.initial_board();
        for r in 0..ROWS {
            board.set(r, 2, "u1");
        }
        assert_eq!(rules.validate_move(&board, 0, 2), Err(MoveError::CellOccupied));
    }

    #[test]
    fn detects_vertical_win() {
        let rules = ConnectFourRules;
        let mut board = rules.initial_board();
        for r in 2..6 {
            board.set(r, 3, "u1");
        }
        assert!(rules.check_winner(&board, 2, 3, "u1"));
    }

    #[test]
    fn detects_horizontal_win() {
        let rules = ConnectFourRules;
        let mut board = rules.initial_board();
        for c in 0..4 {
            board.set(5, c, "u1");
        }
        assert!(rules.check_winner(&board, 5, 0, "u1"));
    }

    #[test]
    fn detects_diagonal_win() {
        let rules = ConnectFourRules;
        let mut board = rules.initial_board();
        board.set(5, 0, "u1");
        board.set(4, 1, "u1");
        board.set(3, 2, "u1");
        board.set(2, 3, "u1");
        assert!(rules.check_winner(&board, 2, 3, "u1"));
    }

    #[test]
    fn no_false_positive_on_three_in_a_row() {
        let rules = ConnectFourRules;
        let mut board = rules.initial_board();
        for c in 0..3 {
            board.set(5, c, "u1");
        }
        assert!(!rules.check_winner(&board, 5, 2, "u1"));
    }
}

//! Move validation between two board states.
//!
//! A client proposes a whole new board rather than a single move. The
//! proposal is accepted only when it is exactly one legal move away from
//! the current board; the move itself is then recovered from the diff.

use crate::board::{BOARD_SIZE, Board, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// A single placement: `mark` written at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Board position (0-8, row-major).
    pub index: usize,
    /// Mark that was placed.
    pub mark: Mark,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.index)
    }
}

/// Reason a proposed state is not a legal successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TransitionError {
    /// Zero or several squares differ between the two states.
    #[display("Exactly one square must change per move, {changed} changed")]
    InvalidMoveCount {
        /// Number of differing squares.
        changed: usize,
    },

    /// The changed square was already occupied.
    #[display("Square {index} is already occupied")]
    CellOverwrite {
        /// Position of the occupied square.
        index: usize,
    },

    /// The placed mark is not the one due to move.
    #[display("It is {expected}'s turn, but {placed} was placed")]
    WrongTurn {
        /// Mark due to move.
        expected: Mark,
        /// Mark that was placed.
        placed: Mark,
    },
}

impl std::error::Error for TransitionError {}

/// Checks that `new` is a legal successor of `old` and returns the move.
///
/// Checks run in order and the first failure wins:
/// 1. exactly one square differs,
/// 2. that square was empty in `old`,
/// 3. the placed mark is the one due by occupancy parity.
///
/// Win and draw status are not considered.
///
/// # Errors
///
/// Returns [`TransitionError`] describing the first rule broken.
#[instrument(skip(old, new), fields(old = %old, new = %new))]
pub fn validate_transition(old: &Board, new: &Board) -> Result<Move, TransitionError> {
    let changed: Vec<usize> = (0..BOARD_SIZE)
        .filter(|&i| old.squares()[i] != new.squares()[i])
        .collect();

    let &[index] = changed.as_slice() else {
        warn!(changed = changed.len(), "Rejected transition: move count");
        return Err(TransitionError::InvalidMoveCount {
            changed: changed.len(),
        });
    };

    match (old.squares()[index], new.squares()[index]) {
        (Square::Empty, Square::Occupied(placed)) => {
            let expected = old.to_move();
            if placed != expected {
                warn!(%expected, %placed, "Rejected transition: wrong turn");
                return Err(TransitionError::WrongTurn { expected, placed });
            }
            let mov = Move {
                index,
                mark: placed,
            };
            debug!(%mov, "Transition accepted");
            Ok(mov)
        }
        // Old square occupied: the move overwrites or clears it.
        _ => {
            warn!(index, "Rejected transition: occupied square");
            Err(TransitionError::CellOverwrite { index })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_move_x_accepted() {
        let mov = validate_transition(&Board::new(), &board("X........")).unwrap();
        assert_eq!(mov, Move { index: 0, mark: Mark::X });
    }

    #[test]
    fn test_first_move_o_rejected() {
        assert_eq!(
            validate_transition(&Board::new(), &board("O........")),
            Err(TransitionError::WrongTurn {
                expected: Mark::X,
                placed: Mark::O
            })
        );
    }

    #[test]
    fn test_no_change_rejected() {
        let b = board("X...O....");
        assert_eq!(
            validate_transition(&b, &b),
            Err(TransitionError::InvalidMoveCount { changed: 0 })
        );
    }

    #[test]
    fn test_two_moves_rejected() {
        assert_eq!(
            validate_transition(&Board::new(), &board("X...O....")),
            Err(TransitionError::InvalidMoveCount { changed: 2 })
        );
    }

    #[test]
    fn test_overwrite_rejected() {
        assert_eq!(
            validate_transition(&board("X........"), &board("O........")),
            Err(TransitionError::CellOverwrite { index: 0 })
        );
    }

    #[test]
    fn test_clearing_rejected() {
        assert_eq!(
            validate_transition(&board("X...O...."), &board("X........")),
            Err(TransitionError::CellOverwrite { index: 4 })
        );
    }

    #[test]
    fn test_o_moves_after_x() {
        let mov = validate_transition(&board("X........"), &board("X...O....")).unwrap();
        assert_eq!(mov, Move { index: 4, mark: Mark::O });

        assert_eq!(
            validate_transition(&board("X........"), &board("X...X....")),
            Err(TransitionError::WrongTurn {
                expected: Mark::O,
                placed: Mark::X
            })
        );
    }

    #[test]
    fn test_move_count_checked_before_overwrite() {
        // Overwrite plus a second change still reports the count.
        assert_eq!(
            validate_transition(&board("X........"), &board("O...X....")),
            Err(TransitionError::InvalidMoveCount { changed: 2 })
        );
    }

    #[test]
    fn test_move_on_won_board_permitted() {
        // X has the top row; the validator does not look at outcomes.
        let won = board("XXXOO....");
        let mov = validate_transition(&won, &board("XXXOOO...")).unwrap();
        assert_eq!(mov.mark, Mark::O);
    }
}

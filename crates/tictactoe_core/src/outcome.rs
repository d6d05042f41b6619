//! Win and draw detection.

use crate::board::{Board, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The eight winning lines: rows, columns, diagonals.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Classification of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves remain and nobody has three in a row.
    InProgress,
    /// A mark completed a line.
    Win(Mark),
    /// Board is full with no completed line.
    Draw,
}

impl Outcome {
    /// True for `Win` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// The winning mark, if any.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Win(mark) => Some(*mark),
            _ => None,
        }
    }
}

/// Returns the first completed line, scanning [`LINES`] in order.
#[instrument(skip(board), fields(board = %board))]
pub fn winning_line(board: &Board) -> Option<[usize; 3]> {
    LINES.into_iter().find(|&[a, b, c]| {
        let sq = board.squares()[a];
        sq != Square::Empty && sq == board.squares()[b] && sq == board.squares()[c]
    })
}

/// Evaluates a board.
///
/// A completed line wins (first match in [`LINES`] order); otherwise a
/// full board is a draw and anything else is still in progress.
#[instrument(skip(board), fields(board = %board))]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some([a, _, _]) = winning_line(board)
        && let Square::Occupied(mark) = board.squares()[a]
    {
        return Outcome::Win(mark);
    }

    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}

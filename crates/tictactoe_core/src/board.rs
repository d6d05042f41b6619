//! Core board types and the 9-character wire codec.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Number of squares on the board.
pub const BOARD_SIZE: usize = 9;

/// Symbol used for an empty square in the wire format.
pub const EMPTY_SYMBOL: char = '.';

/// Mark placed by a player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// Mark X (moves first).
    #[display("X")]
    X,
    /// Mark O (moves second).
    #[display("O")]
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Wire symbol for this mark.
    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square holding a mark.
    Occupied(Mark),
}

impl Square {
    /// Wire symbol for this square.
    pub fn symbol(self) -> char {
        match self {
            Square::Empty => EMPTY_SYMBOL,
            Square::Occupied(mark) => mark.symbol(),
        }
    }

    /// Parses a single wire symbol. Case-sensitive.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'X' => Some(Square::Occupied(Mark::X)),
            'O' => Some(Square::Occupied(Mark::O)),
            EMPTY_SYMBOL => Some(Square::Empty),
            _ => None,
        }
    }
}

/// Error parsing a board from its wire string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardParseError {
    /// The string does not hold exactly nine symbols.
    #[display("Board state must be exactly 9 symbols, got {len}")]
    InvalidLength {
        /// Number of characters received.
        len: usize,
    },

    /// A character outside `X`, `O` and `.` was found.
    #[display("Invalid symbol {symbol:?} at position {index} (expected 'X', 'O' or '.')")]
    InvalidSymbol {
        /// Position of the offending character.
        index: usize,
        /// The offending character.
        symbol: char,
    },
}

impl std::error::Error for BoardParseError {}

/// 3x3 board, squares in row-major order (0-8).
///
/// Serializes as its 9-character wire string, e.g. `"X...O...."`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Board {
    squares: [Square; BOARD_SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; BOARD_SIZE],
        }
    }

    /// Creates a board from raw squares.
    pub fn from_squares(squares: [Square; BOARD_SIZE]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given position (0-8).
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; BOARD_SIZE] {
        &self.squares
    }

    /// Checks if a square is empty. Out-of-range positions are not empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Square::Empty))
    }

    /// Returns a copy of this board with `mark` written at `index`.
    ///
    /// No rules are checked; this only builds a proposed state.
    /// Out-of-range positions leave the copy unchanged.
    pub fn with_mark(&self, index: usize, mark: Mark) -> Self {
        let mut next = *self;
        if let Some(square) = next.squares.get_mut(index) {
            *square = Square::Occupied(mark);
        }
        next
    }

    /// Number of occupied squares.
    pub fn occupied_count(&self) -> usize {
        self.squares
            .iter()
            .filter(|s| **s != Square::Empty)
            .count()
    }

    /// Mark due to move next, derived from occupancy parity.
    ///
    /// An even number of occupied squares means X moves; odd means O.
    #[instrument(skip(self), fields(board = %self))]
    pub fn to_move(&self) -> Mark {
        if self.occupied_count() % 2 == 0 {
            Mark::X
        } else {
            Mark::O
        }
    }

    /// True when no square is empty.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| *s != Square::Empty)
    }

    /// Formats the board as a 3x3 grid for terminals.
    pub fn render(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                result.push(self.squares[row * 3 + col].symbol());
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for square in &self.squares {
            write!(f, "{}", square.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != BOARD_SIZE {
            return Err(BoardParseError::InvalidLength { len });
        }

        let mut squares = [Square::Empty; BOARD_SIZE];
        for (index, symbol) in s.chars().enumerate() {
            squares[index] = Square::from_symbol(symbol)
                .ok_or(BoardParseError::InvalidSymbol { index, symbol })?;
        }
        Ok(Self { squares })
    }
}

impl TryFrom<String> for Board {
    type Error = BoardParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_all_empty() {
        let board = Board::new();
        assert_eq!(board.to_string(), ".........");
        assert_eq!(board.occupied_count(), 0);
        assert!((0..BOARD_SIZE).all(|i| board.is_empty(i)));
    }

    #[test]
    fn test_parse_row_major() {
        let board: Board = "X...O...O".parse().unwrap();
        assert_eq!(board.get(0), Some(Square::Occupied(Mark::X)));
        assert_eq!(board.get(4), Some(Square::Occupied(Mark::O)));
        assert_eq!(board.get(8), Some(Square::Occupied(Mark::O)));
        assert_eq!(board.get(1), Some(Square::Empty));
        assert_eq!(board.get(9), None);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(
            "X...".parse::<Board>(),
            Err(BoardParseError::InvalidLength { len: 4 })
        );
        assert_eq!(
            "..........".parse::<Board>(),
            Err(BoardParseError::InvalidLength { len: 10 })
        );
        assert_eq!(
            "".parse::<Board>(),
            Err(BoardParseError::InvalidLength { len: 0 })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_symbols() {
        assert_eq!(
            "x........".parse::<Board>(),
            Err(BoardParseError::InvalidSymbol {
                index: 0,
                symbol: 'x'
            })
        );
        assert_eq!(
            "XO. .....".parse::<Board>(),
            Err(BoardParseError::InvalidSymbol {
                index: 3,
                symbol: ' '
            })
        );
    }

    #[test]
    fn test_multibyte_length_counts_chars() {
        // Nine chars but more than nine bytes.
        assert!(matches!(
            "é........".parse::<Board>(),
            Err(BoardParseError::InvalidSymbol { index: 0, .. })
        ));
    }

    #[test]
    fn test_to_move_follows_parity() {
        let board = Board::new();
        assert_eq!(board.to_move(), Mark::X);
        let board = board.with_mark(4, Mark::X);
        assert_eq!(board.to_move(), Mark::O);
        let board = board.with_mark(0, Mark::O);
        assert_eq!(board.to_move(), Mark::X);
    }

    #[test]
    fn test_with_mark_leaves_original() {
        let board = Board::new();
        let next = board.with_mark(2, Mark::X);
        assert!(board.is_empty(2));
        assert_eq!(next.to_string(), "..X......");
        assert_eq!(board.with_mark(42, Mark::X), board);
    }

    #[test]
    fn test_render_grid() {
        let board: Board = "XO..X...O".parse().unwrap();
        assert_eq!(board.render(), "X|O|.\n-+-+-\n.|X|.\n-+-+-\n.|.|O");
    }

    #[test]
    fn test_serde_uses_wire_string() {
        let board: Board = "XO.......".parse().unwrap();
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "\"XO.......\"");
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
        assert!(serde_json::from_str::<Board>("\"XO\"").is_err());
    }

    #[test]
    fn test_occupied_count() {
        let board: Board = "XOXOX....".parse().unwrap();
        assert_eq!(board.occupied_count(), 5);
        assert!(!board.is_full());
    }
}

//! Pure tic-tac-toe rules.
//!
//! - [`Board`]: the 9-square state and its wire codec (`"X...O...."`)
//! - [`validate_transition`]: accepts a proposed board only when it is one
//!   legal move away from the current one
//! - [`evaluate`]: classifies a board as in progress, won or drawn
//!
//! Nothing here performs I/O; persistence and transport live in
//! `tictactoe_server`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod outcome;
mod transition;

pub use board::{BOARD_SIZE, Board, BoardParseError, EMPTY_SYMBOL, Mark, Square};
pub use outcome::{LINES, Outcome, evaluate, winning_line};
pub use transition::{Move, TransitionError, validate_transition};

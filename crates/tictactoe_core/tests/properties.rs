//! Property tests for move validation and outcome evaluation.

use proptest::prelude::*;
use strum::IntoEnumIterator;
use tictactoe_core::{
    BOARD_SIZE, Board, LINES, Mark, Outcome, Square, TransitionError, evaluate,
    validate_transition,
};

fn square() -> impl Strategy<Value = Square> {
    prop_oneof![
        Just(Square::Empty),
        Just(Square::Occupied(Mark::X)),
        Just(Square::Occupied(Mark::O)),
    ]
}

fn mark() -> impl Strategy<Value = Mark> {
    prop_oneof![Just(Mark::X), Just(Mark::O)]
}

fn any_board() -> impl Strategy<Value = Board> {
    prop::array::uniform9(square()).prop_map(Board::from_squares)
}

fn full_board() -> impl Strategy<Value = Board> {
    prop::array::uniform9(mark()).prop_map(|marks| Board::from_squares(marks.map(Square::Occupied)))
}

/// A random order in which to fill the squares.
fn move_order() -> impl Strategy<Value = Vec<usize>> {
    Just((0..BOARD_SIZE).collect::<Vec<_>>()).prop_shuffle()
}

/// Marks owning at least one completed line.
fn line_owners(board: &Board) -> Vec<Mark> {
    Mark::iter()
        .filter(|&mark| {
            LINES
                .iter()
                .any(|line| line.iter().all(|&i| board.squares()[i] == Square::Occupied(mark)))
        })
        .collect()
}

proptest! {
    /// Property: a proposal identical to the current board is never a move.
    #[test]
    fn prop_identical_state_rejected(board in any_board()) {
        prop_assert_eq!(
            validate_transition(&board, &board),
            Err(TransitionError::InvalidMoveCount { changed: 0 })
        );
    }

    /// Property: changing two or more squares is always rejected by count.
    #[test]
    fn prop_multiple_changes_rejected(old in any_board(), new in any_board()) {
        let changed = (0..BOARD_SIZE)
            .filter(|&i| old.squares()[i] != new.squares()[i])
            .count();
        prop_assume!(changed >= 2);
        prop_assert_eq!(
            validate_transition(&old, &new),
            Err(TransitionError::InvalidMoveCount { changed })
        );
    }

    /// Property: alternating X, O, X, ... on empty squares is always legal.
    #[test]
    fn prop_alternating_moves_accepted(order in move_order()) {
        let mut board = Board::new();
        let mut mark = Mark::X;
        for index in order {
            let next = board.with_mark(index, mark);
            let mov = validate_transition(&board, &next);
            prop_assert!(mov.is_ok(), "move {} by {} rejected: {:?}", index, mark, mov);
            board = next;
            mark = mark.opponent();
        }
        prop_assert!(board.is_full());
    }

    /// Property: boards reached by legal play never have two winners.
    #[test]
    fn prop_no_double_win(order in move_order()) {
        let mut board = Board::new();
        for index in order {
            let next = board.with_mark(index, board.to_move());
            prop_assert!(validate_transition(&board, &next).is_ok());
            board = next;

            prop_assert!(line_owners(&board).len() <= 1, "double win on {}", board);
            if evaluate(&board).is_terminal() {
                break;
            }
        }
    }

    /// Property: a full board with no completed line is a draw.
    #[test]
    fn prop_full_board_without_line_is_draw(board in full_board()) {
        let outcome = evaluate(&board);
        match line_owners(&board).first() {
            None => prop_assert_eq!(outcome, Outcome::Draw),
            Some(_) => prop_assert!(matches!(outcome, Outcome::Win(_))),
        }
    }

    /// Property: the wire codec is lossless.
    #[test]
    fn prop_wire_string_parses_back(board in any_board()) {
        let wire = board.to_string();
        prop_assert_eq!(wire.len(), BOARD_SIZE);
        prop_assert_eq!(wire.parse::<Board>(), Ok(board));
    }
}

#[test]
fn test_documented_examples() {
    let eval = |s: &str| evaluate(&s.parse::<Board>().unwrap());
    assert_eq!(eval("X........"), Outcome::InProgress);
    assert_eq!(eval("XXXOO...."), Outcome::Win(Mark::X));
    assert_eq!(eval("XOXOXOOXO"), Outcome::Draw);
}

#[test]
fn test_full_game_replay() {
    // X takes 4, 0, 8 and wins on the main diagonal.
    let sequence = [
        ".........",
        "....X....",
        ".O..X....",
        "XO..X....",
        "XO..X..O.",
        "XO..X..OX",
    ];
    for pair in sequence.windows(2) {
        let old: Board = pair[0].parse().unwrap();
        let new: Board = pair[1].parse().unwrap();
        validate_transition(&old, &new).unwrap();
    }
    let last: Board = sequence[5].parse().unwrap();
    assert_eq!(evaluate(&last), Outcome::Win(Mark::X));
}

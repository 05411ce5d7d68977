//! Error types for the board, the match controller and square notation.
//!
//! Rule violations raised by validation (`EmptySquare`, `WrongOwner`,
//! `NoLegalMoves`, `IllegalDestination`) and by `play_move` (`SelfCheck`)
//! leave the match untouched, so a caller can simply ask again.
//! `MissingKing` means the match was set up without a king for one side and
//! cannot be continued.

use crate::board::{Color, Position};
use crate::notation::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),

    #[error("there is already a piece on {0}")]
    Occupied(Position),

    #[error("a {rows}x{columns} board is not supported")]
    InvalidDimensions { rows: u8, columns: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("there is no piece on the chosen origin {0}")]
    EmptySquare(Position),

    #[error("the piece on {position} is {owner}, but it is {active}'s turn")]
    WrongOwner {
        position: Position,
        owner: Color,
        active: Color,
    },

    #[error("the piece on {0} has no possible moves")]
    NoLegalMoves(Position),

    #[error("the piece on {origin} cannot move to {destination}")]
    IllegalDestination {
        origin: Position,
        destination: Position,
    },

    #[error("you cannot put yourself in check")]
    SelfCheck,

    #[error("there is no {0} king on the board")]
    MissingKing(Color),

    #[error("the match is already over")]
    Finished,

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Notation(#[from] NotationError),
}

impl MatchError {
    /// True for errors that mean the match itself is broken rather than a move being refused.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MatchError::MissingKing(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("expected a square like e4, got {0:?}")]
    Length(String),

    #[error("invalid file {0:?}")]
    File(char),

    #[error("invalid rank {0:?}")]
    Rank(String),

    #[error("square {0} is not on this board")]
    OffBoard(Square),
}

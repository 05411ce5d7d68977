//! Squares written the way players write them: a file letter and a rank number.
//!
//! Rank 1 is the bottom row of the printed board, so on a board with `rows`
//! rows the rank `r` lives on row `rows - r`.

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Position};
use crate::error::NotationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub file: char,
    pub rank: u8,
}

impl Square {
    pub fn new(file: char, rank: u8) -> Self {
        Self {
            file: file.to_ascii_lowercase(),
            rank,
        }
    }

    pub fn to_position(&self, board: &Board) -> Result<Position, NotationError> {
        let column = (self.file as u32).wrapping_sub('a' as u32);
        if self.rank == 0 || self.rank > board.rows() || column >= board.columns() as u32 {
            return Err(NotationError::OffBoard(*self));
        }
        Ok(Position::new(board.rows() - self.rank, column as u8))
    }

    pub fn from_position(pos: Position, board: &Board) -> Option<Square> {
        if !board.contains(pos) {
            return None;
        }
        Some(Square::new((b'a' + pos.column) as char, board.rows() - pos.row))
    }
}

impl FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let file = match chars.next() {
            Some(c) => c.to_ascii_lowercase(),
            None => return Err(NotationError::Length(s.to_string())),
        };
        if !file.is_ascii_lowercase() {
            return Err(NotationError::File(file));
        }

        let rank = chars.as_str();
        if rank.is_empty() || rank.len() > 2 {
            return Err(NotationError::Length(s.to_string()));
        }
        let rank = rank
            .parse::<u8>()
            .map_err(|_| NotationError::Rank(rank.to_string()))?;

        Ok(Square::new(file, rank))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}

/// Parses a square and resolves it against the board in one go.
pub fn parse_position(input: &str, board: &Board) -> Result<Position, NotationError> {
    input.parse::<Square>()?.to_position(board)
}

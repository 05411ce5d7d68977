use std::fmt;
use std::str::FromStr;

use crate::board::Color;
use crate::chess_match::ChessMatch;
use crate::error::MatchError;
use crate::notation::Square;
use crate::piece::PieceKind;

/// Starting layouts for a new match on an 8x8 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Setup {
    Empty,
    /// Two rooks and a king against a rook and a king.
    #[default]
    Demo,
    Classic,
}

const DEMO: [(char, u8, PieceKind, Color); 5] = [
    ('c', 1, PieceKind::Rook, Color::White),
    ('h', 7, PieceKind::Rook, Color::White),
    ('d', 1, PieceKind::King, Color::White),
    ('b', 8, PieceKind::Rook, Color::Black),
    ('a', 8, PieceKind::King, Color::Black),
];

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Setup {
    fn layout(&self) -> Vec<(char, u8, PieceKind, Color)> {
        match self {
            Setup::Empty => Vec::new(),
            Setup::Demo => DEMO.to_vec(),
            Setup::Classic => {
                let mut layout = Vec::with_capacity(32);
                for (file, kind) in ('a'..='h').zip(BACK_RANK) {
                    layout.push((file, 1, kind, Color::White));
                    layout.push((file, 2, PieceKind::Pawn, Color::White));
                    layout.push((file, 7, PieceKind::Pawn, Color::Black));
                    layout.push((file, 8, kind, Color::Black));
                }
                layout
            }
        }
    }

    pub fn apply(&self, chess_match: &mut ChessMatch) -> Result<(), MatchError> {
        for (file, rank, kind, color) in self.layout() {
            let pos = Square::new(file, rank).to_position(chess_match.board())?;
            chess_match.place_new_piece(kind, color, pos)?;
        }
        Ok(())
    }
}

impl FromStr for Setup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(Setup::Empty),
            "demo" => Ok(Setup::Demo),
            "classic" => Ok(Setup::Classic),
            other => Err(format!("unknown setup {other:?}, expected empty, demo or classic")),
        }
    }
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Setup::Empty => write!(f, "empty"),
            Setup::Demo => write!(f, "demo"),
            Setup::Classic => write!(f, "classic"),
        }
    }
}

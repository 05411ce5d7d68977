use std::fmt;

use crate::error::BoardError;
use crate::piece::PieceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// A board cell, zero-based. Row 0 is the top row as printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u8,
    pub column: u8,
}

impl Position {
    pub const fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }

    /// Shifts the position, returning `None` when either coordinate would go negative.
    /// The upper bound is the board's business.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row as i16 + dr as i16;
        let column = self.column as i16 + dc as i16;
        if row < 0 || column < 0 || row > u8::MAX as i16 || column > u8::MAX as i16 {
            return None;
        }
        Some(Position::new(row as u8, column as u8))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Grid of piece handles. The pieces themselves live in the match's registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: u8,
    columns: u8,
    cells: Vec<Option<PieceId>>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            rows: 8,
            columns: 8,
            cells: vec![None; 64],
        }
    }
}

impl Board {
    pub fn new(rows: u8, columns: u8) -> Result<Self, BoardError> {
        let cells = rows as usize * columns as usize;
        // Move targets are kept in a single u64.
        if rows == 0 || columns == 0 || cells > 64 {
            return Err(BoardError::InvalidDimensions { rows, columns });
        }
        Ok(Self {
            rows,
            columns,
            cells: vec![None; cells],
        })
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.column < self.columns
    }

    pub fn check_bounds(&self, pos: Position) -> Result<(), BoardError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds(pos))
        }
    }

    /// Row-major index of a cell. Callers must check bounds first.
    pub fn index(&self, pos: Position) -> usize {
        pos.row as usize * self.columns as usize + pos.column as usize
    }

    pub fn piece_at(&self, pos: Position) -> Option<PieceId> {
        if !self.contains(pos) {
            return None;
        }
        self.cells[self.index(pos)]
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.piece_at(pos).is_some()
    }

    pub fn place(&mut self, id: PieceId, pos: Position) -> Result<(), BoardError> {
        self.check_bounds(pos)?;
        let index = self.index(pos);
        if self.cells[index].is_some() {
            return Err(BoardError::Occupied(pos));
        }
        self.cells[index] = Some(id);
        Ok(())
    }

    pub fn remove(&mut self, pos: Position) -> Option<PieceId> {
        if !self.contains(pos) {
            return None;
        }
        let index = self.index(pos);
        self.cells[index].take()
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |column| Position::new(row, column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_opposite() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }

    #[test]
    fn test_dimensions() {
        assert!(Board::new(8, 8).is_ok());
        assert!(Board::new(4, 5).is_ok());
        assert_eq!(
            Board::new(9, 8),
            Err(BoardError::InvalidDimensions { rows: 9, columns: 8 })
        );
        assert!(Board::new(0, 3).is_err());
        assert_eq!(Board::default(), Board::new(8, 8).unwrap());
    }

    #[test]
    fn test_place_and_remove() {
        let mut board = Board::default();
        let pos = Position::new(3, 4);

        board.place(PieceId(7), pos).unwrap();
        assert_eq!(board.piece_at(pos), Some(PieceId(7)));
        assert_eq!(board.place(PieceId(8), pos), Err(BoardError::Occupied(pos)));

        assert_eq!(board.remove(pos), Some(PieceId(7)));
        assert_eq!(board.remove(pos), None);
        assert!(!board.is_occupied(pos));
    }

    #[test]
    fn test_bounds() {
        let mut board = Board::new(3, 3).unwrap();
        let outside = Position::new(3, 0);
        assert!(!board.contains(outside));
        assert_eq!(board.place(PieceId(0), outside), Err(BoardError::OutOfBounds(outside)));
        assert_eq!(board.piece_at(outside), None);
        assert_eq!(board.remove(outside), None);
    }

    #[test]
    fn test_offset() {
        let pos = Position::new(0, 2);
        assert_eq!(pos.offset(1, -2), Some(Position::new(1, 0)));
        assert_eq!(pos.offset(-1, 0), None);
        assert_eq!(pos.offset(0, -3), None);
    }

    #[test]
    fn test_positions_row_major() {
        let board = Board::new(2, 3).unwrap();
        let cells: Vec<_> = board.positions().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Position::new(0, 0));
        assert_eq!(cells[3], Position::new(1, 0));
        assert!(cells.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(board.index(Position::new(1, 2)), 5);
    }
}

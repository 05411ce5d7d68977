use crate::board::{Board, Color, Position};
use crate::movegen::{self, MoveSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    pub fn symbol(&self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn => 'P',
        }
    }
}

/// Handle of a piece inside its match's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub color: Color,
    /// Mirrors the board; `None` while the piece is off the board.
    pub position: Option<Position>,
    pub move_count: u32,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceKind, color: Color) -> Self {
        Self {
            id,
            kind,
            color,
            position: None,
            move_count: 0,
        }
    }

    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    /// Uppercase for White, lowercase for Black.
    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.symbol(),
            Color::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }

    pub fn increment_move_count(&mut self) {
        self.move_count += 1;
    }

    pub fn decrement_move_count(&mut self) {
        debug_assert!(self.move_count > 0, "undo without a matching move");
        self.move_count = self.move_count.saturating_sub(1);
    }

    pub fn pseudo_legal_moves(&self, board: &Board, registry: &PieceRegistry) -> MoveSet {
        movegen::pseudo_legal_moves(self, board, registry)
    }

    pub fn has_any_move(&self, board: &Board, registry: &PieceRegistry) -> bool {
        !self.pseudo_legal_moves(board, registry).is_empty()
    }

    pub fn can_move_to(&self, destination: Position, board: &Board, registry: &PieceRegistry) -> bool {
        self.pseudo_legal_moves(board, registry).contains(destination)
    }
}

/// Every piece ever placed in a match, captured or not. Ids are indices and never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceRegistry {
    pieces: Vec<Piece>,
}

impl PieceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: PieceKind, color: Color) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece::new(id, kind, color));
        id
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.0)
    }

    pub fn color_of(&self, id: PieceId) -> Option<Color> {
        self.get(id).map(|piece| piece.color)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        let mut registry = PieceRegistry::new();
        let king = registry.insert(PieceKind::King, Color::White);
        let knight = registry.insert(PieceKind::Knight, Color::Black);

        assert_eq!(registry.get(king).unwrap().symbol(), 'K');
        assert_eq!(registry.get(knight).unwrap().symbol(), 'n');
        assert!(registry.get(king).unwrap().is_king());
        assert!(!registry.get(knight).unwrap().is_king());
    }

    #[test]
    fn test_registry_ids_are_indices() {
        let mut registry = PieceRegistry::new();
        assert!(registry.is_empty());
        let a = registry.insert(PieceKind::Rook, Color::White);
        let b = registry.insert(PieceKind::Rook, Color::Black);

        assert_eq!(a, PieceId(0));
        assert_eq!(b, PieceId(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.color_of(b), Some(Color::Black));
        assert_eq!(registry.color_of(PieceId(5)), None);
        assert_eq!(registry.get(a).unwrap().position, None);
    }

    #[test]
    fn test_move_count_inverse() {
        let mut piece = Piece::new(PieceId(0), PieceKind::Pawn, Color::White);
        piece.increment_move_count();
        piece.increment_move_count();
        piece.decrement_move_count();
        assert_eq!(piece.move_count, 1);
        piece.decrement_move_count();
        assert_eq!(piece.move_count, 0);
    }
}

use crate::board::{Board, Color, Position};
use crate::piece::{Piece, PieceKind, PieceRegistry};

const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

/// Set of destination cells, one bit per cell in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSet {
    bits: u64,
    columns: u8,
}

impl MoveSet {
    pub fn empty(board: &Board) -> Self {
        Self {
            bits: 0,
            columns: board.columns(),
        }
    }

    fn bit(&self, pos: Position) -> Option<u64> {
        if pos.column >= self.columns {
            return None;
        }
        let index = pos.row as u32 * self.columns as u32 + pos.column as u32;
        if index >= 64 {
            return None;
        }
        Some(1u64 << index)
    }

    pub fn insert(&mut self, pos: Position) {
        if let Some(mask) = self.bit(pos) {
            self.bits |= mask;
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.bit(pos).map_or(false, |mask| self.bits & mask != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Destinations in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Position> {
        let columns = self.columns as u32;
        let mut bits = self.bits;
        std::iter::from_fn(move || {
            if bits == 0 || columns == 0 {
                return None;
            }
            let index = bits.trailing_zeros();
            bits &= bits - 1;
            Some(Position::new((index / columns) as u8, (index % columns) as u8))
        })
    }
}

/// What a piece finds when it looks at a cell.
enum Target {
    Empty,
    Friend,
    Enemy,
}

fn target(board: &Board, registry: &PieceRegistry, pos: Position, mover: Color) -> Target {
    match board.piece_at(pos).and_then(|id| registry.color_of(id)) {
        None => Target::Empty,
        Some(color) if color == mover => Target::Friend,
        Some(_) => Target::Enemy,
    }
}

fn step(board: &Board, from: Position, dr: i8, dc: i8) -> Option<Position> {
    from.offset(dr, dc).filter(|pos| board.contains(*pos))
}

fn slide(
    moves: &mut MoveSet,
    board: &Board,
    registry: &PieceRegistry,
    from: Position,
    mover: Color,
    directions: &[(i8, i8)],
) {
    for &(dr, dc) in directions {
        let mut current = from;
        while let Some(next) = step(board, current, dr, dc) {
            match target(board, registry, next, mover) {
                Target::Empty => moves.insert(next),
                Target::Enemy => {
                    moves.insert(next);
                    break;
                }
                Target::Friend => break,
            }
            current = next;
        }
    }
}

fn leap(
    moves: &mut MoveSet,
    board: &Board,
    registry: &PieceRegistry,
    from: Position,
    mover: Color,
    offsets: &[(i8, i8)],
) {
    for &(dr, dc) in offsets {
        if let Some(to) = step(board, from, dr, dc) {
            if !matches!(target(board, registry, to, mover), Target::Friend) {
                moves.insert(to);
            }
        }
    }
}

fn pawn(moves: &mut MoveSet, board: &Board, registry: &PieceRegistry, piece: &Piece, from: Position) {
    // White starts on the bottom rows and moves up the printed board.
    let forward: i8 = match piece.color {
        Color::White => -1,
        Color::Black => 1,
    };

    if let Some(one) = step(board, from, forward, 0) {
        if !board.is_occupied(one) {
            moves.insert(one);
            if piece.move_count == 0 {
                if let Some(two) = step(board, one, forward, 0) {
                    if !board.is_occupied(two) {
                        moves.insert(two);
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        if let Some(to) = step(board, from, forward, dc) {
            if matches!(target(board, registry, to, piece.color), Target::Enemy) {
                moves.insert(to);
            }
        }
    }
}

/// Cells the piece could move to by its movement pattern alone, ignoring self-check.
pub fn pseudo_legal_moves(piece: &Piece, board: &Board, registry: &PieceRegistry) -> MoveSet {
    let mut moves = MoveSet::empty(board);
    let Some(from) = piece.position else {
        return moves;
    };

    match piece.kind {
        PieceKind::Rook => slide(&mut moves, board, registry, from, piece.color, &ORTHOGONALS),
        PieceKind::Bishop => slide(&mut moves, board, registry, from, piece.color, &DIAGONALS),
        PieceKind::Queen => {
            slide(&mut moves, board, registry, from, piece.color, &ORTHOGONALS);
            slide(&mut moves, board, registry, from, piece.color, &DIAGONALS);
        }
        PieceKind::King => leap(&mut moves, board, registry, from, piece.color, &KING_STEPS),
        PieceKind::Knight => leap(&mut moves, board, registry, from, piece.color, &KNIGHT_JUMPS),
        PieceKind::Pawn => pawn(&mut moves, board, registry, piece, from),
    }
    moves
}

//! The match controller: turn bookkeeping, move execution and undo, and the
//! check and checkmate decisions.
//!
//! Every rule question is answered by trying the move on the real board and
//! undoing it afterwards, so `execute_move` and `undo_move` must always be
//! used as a pair with the captured piece the first one returned.

use std::collections::BTreeSet;

use tracing::{debug, info, trace, warn};

use crate::board::{Board, Color, Position};
use crate::error::{BoardError, MatchError};
use crate::movegen::MoveSet;
use crate::piece::{Piece, PieceId, PieceKind, PieceRegistry};
use crate::setup::Setup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessMatch {
    board: Board,
    pieces: PieceRegistry,
    captured: BTreeSet<PieceId>,
    turn: u32,
    active_color: Color,
    terminated: bool,
    in_check: bool,
}

impl Default for ChessMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessMatch {
    /// An empty 8x8 match with White to move.
    pub fn new() -> Self {
        Self::with_board(Board::default())
    }

    pub fn with_board(board: Board) -> Self {
        Self {
            board,
            pieces: PieceRegistry::new(),
            captured: BTreeSet::new(),
            turn: 1,
            active_color: Color::White,
            terminated: false,
            in_check: false,
        }
    }

    pub fn empty(rows: u8, columns: u8) -> Result<Self, MatchError> {
        Ok(Self::with_board(Board::new(rows, columns)?))
    }

    pub fn with_setup(setup: Setup) -> Result<Self, MatchError> {
        let mut chess_match = Self::new();
        setup.apply(&mut chess_match)?;
        Ok(chess_match)
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Whether the side to move was left in check by the last committed move.
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    /// The side that delivered checkmate, once the match is over.
    pub fn winner(&self) -> Option<Color> {
        self.terminated.then_some(self.active_color)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pieces(&self) -> &PieceRegistry {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.board.piece_at(pos).and_then(|id| self.pieces.get(id))
    }

    /// Puts a brand new piece on the board and registers it with the match.
    pub fn place_new_piece(&mut self, kind: PieceKind, color: Color, pos: Position) -> Result<PieceId, MatchError> {
        self.board.check_bounds(pos)?;
        if self.board.is_occupied(pos) {
            return Err(BoardError::Occupied(pos).into());
        }
        let id = self.pieces.insert(kind, color);
        self.put(id, pos)?;
        debug!(?kind, %color, %pos, "piece placed");
        Ok(id)
    }

    fn take(&mut self, pos: Position) -> Option<PieceId> {
        let id = self.board.remove(pos)?;
        if let Some(piece) = self.pieces.get_mut(id) {
            piece.position = None;
        }
        Some(id)
    }

    fn put(&mut self, id: PieceId, pos: Position) -> Result<(), BoardError> {
        self.board.place(id, pos)?;
        if let Some(piece) = self.pieces.get_mut(id) {
            piece.position = Some(pos);
        }
        Ok(())
    }

    /// Moves the piece on `origin` to `destination`, capturing whatever stood there.
    ///
    /// Does not touch the turn, the active color or the check flag. Returns the
    /// captured piece, which must be handed back to [`ChessMatch::undo_move`].
    pub fn execute_move(&mut self, origin: Position, destination: Position) -> Result<Option<PieceId>, MatchError> {
        self.board.check_bounds(destination)?;
        let id = self.take(origin).ok_or(MatchError::EmptySquare(origin))?;
        if let Some(piece) = self.pieces.get_mut(id) {
            piece.increment_move_count();
        }
        let captured = self.take(destination);
        self.put(id, destination)?;
        if let Some(captured) = captured {
            self.captured.insert(captured);
        }
        trace!(%origin, %destination, ?captured, "executed");
        Ok(captured)
    }

    /// Reverts a move made by [`ChessMatch::execute_move`].
    pub fn undo_move(
        &mut self,
        origin: Position,
        destination: Position,
        captured: Option<PieceId>,
    ) -> Result<(), MatchError> {
        let id = self.take(destination).ok_or(MatchError::EmptySquare(destination))?;
        if let Some(piece) = self.pieces.get_mut(id) {
            piece.decrement_move_count();
        }
        if let Some(captured) = captured {
            self.put(captured, destination)?;
            self.captured.remove(&captured);
        }
        self.put(id, origin)?;
        trace!(%origin, %destination, ?captured, "undone");
        Ok(())
    }

    /// Plays one move for the side to move.
    ///
    /// Either the move is committed (check flag updated, then the match ends
    /// on checkmate or the turn passes), or an error is returned and the match
    /// is exactly as it was before the call.
    pub fn play_move(&mut self, origin: Position, destination: Position) -> Result<(), MatchError> {
        if self.terminated {
            return Err(MatchError::Finished);
        }
        self.board.check_bounds(origin)?;
        self.board.check_bounds(destination)?;
        if !self.board.is_occupied(origin) {
            return Err(MatchError::EmptySquare(origin));
        }

        let mover = self.active_color;
        let opponent = mover.opposite();
        let captured = self.execute_move(origin, destination)?;

        let (opponent_in_check, checkmate) = match self.assess(mover, opponent) {
            Ok(Some(outcome)) => outcome,
            Ok(None) => {
                self.undo_move(origin, destination, captured)?;
                warn!(%mover, %origin, %destination, "move rejected, it leaves the mover in check");
                return Err(MatchError::SelfCheck);
            }
            Err(err) => {
                self.undo_move(origin, destination, captured)?;
                return Err(err);
            }
        };

        self.in_check = opponent_in_check;
        info!(turn = self.turn, %mover, %origin, %destination, ?captured, "move committed");
        if checkmate {
            self.terminated = true;
            info!(turn = self.turn, winner = %mover, "checkmate");
        } else {
            if opponent_in_check {
                info!(turn = self.turn, side = %opponent, "check");
            }
            self.turn += 1;
            self.active_color = opponent;
        }
        Ok(())
    }

    /// `None` when the mover is in check, otherwise whether the opponent is in check and mated.
    fn assess(&mut self, mover: Color, opponent: Color) -> Result<Option<(bool, bool)>, MatchError> {
        if self.is_in_check(mover)? {
            return Ok(None);
        }
        let in_check = self.is_in_check(opponent)?;
        let checkmate = in_check && !self.has_escape(opponent)?;
        Ok(Some((in_check, checkmate)))
    }

    pub fn validate_origin(&self, pos: Position) -> Result<(), MatchError> {
        let piece = self.piece_at(pos).ok_or(MatchError::EmptySquare(pos))?;
        if piece.color != self.active_color {
            debug!(%pos, owner = %piece.color, "origin belongs to the opponent");
            return Err(MatchError::WrongOwner {
                position: pos,
                owner: piece.color,
                active: self.active_color,
            });
        }
        if !piece.has_any_move(&self.board, &self.pieces) {
            debug!(%pos, "origin piece is blocked");
            return Err(MatchError::NoLegalMoves(pos));
        }
        Ok(())
    }

    pub fn validate_destination(&self, origin: Position, destination: Position) -> Result<(), MatchError> {
        let piece = self.piece_at(origin).ok_or(MatchError::EmptySquare(origin))?;
        if !piece.can_move_to(destination, &self.board, &self.pieces) {
            debug!(%origin, %destination, "destination refused");
            return Err(MatchError::IllegalDestination { origin, destination });
        }
        Ok(())
    }

    /// Pseudo-legal destinations of the piece on `origin`.
    pub fn possible_moves(&self, origin: Position) -> Result<MoveSet, MatchError> {
        let piece = self.piece_at(origin).ok_or(MatchError::EmptySquare(origin))?;
        Ok(piece.pseudo_legal_moves(&self.board, &self.pieces))
    }

    /// Pieces of `color` still on the board.
    pub fn in_play_by_color(&self, color: Color) -> Vec<&Piece> {
        self.pieces
            .iter()
            .filter(|piece| piece.color == color && !self.captured.contains(&piece.id))
            .collect()
    }

    /// Pieces of `color` taken off the board by the opponent.
    pub fn captured_by_color(&self, color: Color) -> Vec<&Piece> {
        self.captured
            .iter()
            .filter_map(|id| self.pieces.get(*id))
            .filter(|piece| piece.color == color)
            .collect()
    }

    fn king_position(&self, color: Color) -> Result<Position, MatchError> {
        self.in_play_by_color(color)
            .into_iter()
            .find(|piece| piece.is_king())
            .and_then(|king| king.position)
            .ok_or(MatchError::MissingKing(color))
    }

    pub fn is_in_check(&self, color: Color) -> Result<bool, MatchError> {
        let king = self.king_position(color)?;
        Ok(self
            .in_play_by_color(color.opposite())
            .into_iter()
            .any(|piece| piece.can_move_to(king, &self.board, &self.pieces)))
    }

    pub fn is_checkmate(&mut self, color: Color) -> Result<bool, MatchError> {
        if !self.is_in_check(color)? {
            return Ok(false);
        }
        Ok(!self.has_escape(color)?)
    }

    /// Move sets of every piece of `color`, computed once before any trial move.
    fn candidates(&self, color: Color) -> Vec<(Position, MoveSet)> {
        self.in_play_by_color(color)
            .into_iter()
            .filter_map(|piece| {
                piece
                    .position
                    .map(|pos| (pos, piece.pseudo_legal_moves(&self.board, &self.pieces)))
            })
            .collect()
    }

    /// Tries one move and reports whether it leaves `color` out of check.
    fn survives(&mut self, color: Color, origin: Position, destination: Position) -> Result<bool, MatchError> {
        let captured = self.execute_move(origin, destination)?;
        let in_check = self.is_in_check(color);
        self.undo_move(origin, destination, captured)?;
        Ok(!in_check?)
    }

    fn has_escape(&mut self, color: Color) -> Result<bool, MatchError> {
        for (origin, moves) in self.candidates(color) {
            for destination in moves.iter() {
                if self.survives(color, origin, destination)? {
                    trace!(%color, %origin, %destination, "escape found");
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Every move of the side to move that does not leave it in check.
    pub fn legal_moves(&mut self) -> Result<Vec<(Position, Position)>, MatchError> {
        let color = self.active_color;
        let mut moves = Vec::new();
        for (origin, destinations) in self.candidates(color) {
            for destination in destinations.iter() {
                if self.survives(color, origin, destination)? {
                    moves.push((origin, destination));
                }
            }
        }
        Ok(moves)
    }
}

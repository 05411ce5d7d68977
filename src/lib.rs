pub mod board;
pub mod chess_match;
pub mod console;
pub mod error;
pub mod movegen;
pub mod notation;
pub mod piece;
pub mod setup;

pub use board::{Board, Color, Position};
pub use chess_match::ChessMatch;
pub use error::{BoardError, MatchError, NotationError};
pub use movegen::MoveSet;
pub use piece::{Piece, PieceId, PieceKind};
pub use setup::Setup;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_position;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn at(chess_match: &ChessMatch, square: &str) -> Position {
        parse_position(square, chess_match.board()).unwrap()
    }

    fn ids(pieces: Vec<&Piece>) -> Vec<PieceId> {
        pieces.into_iter().map(|piece| piece.id).collect()
    }

    /// Every pseudo-legal move of the side to move, legal or not.
    fn pseudo_legal(chess_match: &ChessMatch) -> Vec<(Position, Position)> {
        let color = chess_match.active_color();
        let mut moves = Vec::new();
        for piece in chess_match.in_play_by_color(color) {
            let Some(origin) = piece.position else { continue };
            for destination in chess_match.possible_moves(origin).unwrap().iter() {
                moves.push((origin, destination));
            }
        }
        moves
    }

    #[test]
    fn test_demo_rook_to_h8_is_shielded() {
        let mut m = ChessMatch::with_setup(Setup::Demo).unwrap();
        let (h7, h8) = (at(&m, "h7"), at(&m, "h8"));

        m.validate_origin(h7).unwrap();
        m.validate_destination(h7, h8).unwrap();
        m.play_move(h7, h8).unwrap();

        // The black rook on b8 stands between the rook and the king.
        assert!(!m.in_check());
        assert!(!m.is_terminated());
        assert_eq!(m.turn(), 2);
        assert_eq!(m.active_color(), Color::Black);
    }

    #[test]
    fn test_demo_check_with_escape() {
        let mut m = ChessMatch::with_setup(Setup::Demo).unwrap();
        let rook = m.piece_at(at(&m, "h7")).unwrap().id;

        m.play_move(at(&m, "h7"), at(&m, "a7")).unwrap();
        assert!(m.in_check());
        assert!(!m.is_terminated());
        assert_eq!(m.is_checkmate(Color::Black), Ok(false));
        assert_eq!(m.active_color(), Color::Black);

        m.play_move(at(&m, "a8"), at(&m, "a7")).unwrap();
        assert!(!m.in_check());
        assert_eq!(m.turn(), 3);
        assert_eq!(ids(m.captured_by_color(Color::White)), vec![rook]);
        assert!(!ids(m.in_play_by_color(Color::White)).contains(&rook));
        assert_eq!(m.in_play_by_color(Color::White).len(), 2);
        assert_eq!(m.piece(rook).unwrap().position, None);
    }

    #[test]
    fn test_demo_mate_in_one() {
        let mut m = ChessMatch::with_setup(Setup::Demo).unwrap();
        m.play_move(at(&m, "c1"), at(&m, "a1")).unwrap();

        assert!(m.is_terminated());
        assert!(m.in_check());
        assert_eq!(m.winner(), Some(Color::White));
        assert_eq!(m.turn(), 1);
        assert_eq!(m.active_color(), Color::White);
        assert_eq!(m.is_checkmate(Color::Black), Ok(true));
    }

    #[test]
    fn test_exposing_own_king_is_rejected() {
        let mut m = ChessMatch::new();
        for (kind, color, square) in [
            (PieceKind::King, Color::White, "e1"),
            (PieceKind::Rook, Color::White, "d1"),
            (PieceKind::Rook, Color::Black, "a1"),
            (PieceKind::King, Color::Black, "h8"),
        ] {
            let pos = at(&m, square);
            m.place_new_piece(kind, color, pos).unwrap();
        }
        let before = m.clone();
        let white = ids(m.in_play_by_color(Color::White));
        let black = ids(m.in_play_by_color(Color::Black));

        let (d1, d5) = (at(&m, "d1"), at(&m, "d5"));
        // The validators only look at the rook's own pattern.
        m.validate_origin(d1).unwrap();
        m.validate_destination(d1, d5).unwrap();
        assert_eq!(m.play_move(d1, d5), Err(MatchError::SelfCheck));

        assert_eq!(m, before);
        assert_eq!(ids(m.in_play_by_color(Color::White)), white);
        assert_eq!(ids(m.in_play_by_color(Color::Black)), black);

        // Taking the attacker is fine.
        m.play_move(d1, at(&m, "a1")).unwrap();
        assert_eq!(m.captured_by_color(Color::Black).len(), 1);
        assert_eq!(m.turn(), 2);
    }

    #[test]
    fn test_origin_validation() {
        let m = ChessMatch::with_setup(Setup::Demo).unwrap();
        let e4 = at(&m, "e4");
        assert_eq!(m.validate_origin(e4), Err(MatchError::EmptySquare(e4)));
        assert!(matches!(
            m.validate_origin(at(&m, "b8")),
            Err(MatchError::WrongOwner { owner: Color::Black, active: Color::White, .. })
        ));
    }

    #[test]
    fn test_execute_undo_is_exact_for_every_move() {
        let mut m = ChessMatch::with_setup(Setup::Classic).unwrap();
        m.play_move(at(&m, "e2"), at(&m, "e4")).unwrap();
        m.play_move(at(&m, "d7"), at(&m, "d5")).unwrap();

        let before = m.clone();
        let moves = pseudo_legal(&m);
        assert!(moves.contains(&(at(&m, "e4"), at(&m, "d5"))));
        for (origin, destination) in moves {
            let captured = m.execute_move(origin, destination).unwrap();
            m.undo_move(origin, destination, captured).unwrap();
            assert_eq!(m, before);
        }
    }

    #[test]
    fn test_random_playouts() {
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..4 {
            let mut m = ChessMatch::with_setup(Setup::Classic).unwrap();
            for _ in 0..80 {
                let moves = pseudo_legal(&m);
                let Some(&(origin, destination)) = moves.choose(&mut rng) else { break };
                let before = m.clone();
                let mover = m.active_color();
                let target = m.piece_at(destination).map(|piece| piece.id);

                match m.play_move(origin, destination) {
                    Err(MatchError::SelfCheck) => {
                        assert_eq!(m, before);
                        continue;
                    }
                    Err(err) => panic!("unexpected error {err}"),
                    Ok(()) => {}
                }

                assert_eq!(m.is_in_check(mover), Ok(false));
                if let Some(victim) = target {
                    let opponent = mover.opposite();
                    assert!(ids(m.captured_by_color(opponent)).contains(&victim));
                    assert!(!ids(m.in_play_by_color(opponent)).contains(&victim));
                }
                if m.is_terminated() {
                    assert_eq!(m.turn(), before.turn());
                    assert_eq!(m.active_color(), mover);
                    assert_eq!(m.is_checkmate(mover.opposite()), Ok(true));
                    break;
                }

                assert_eq!(m.turn(), before.turn() + 1);
                assert_eq!(m.active_color(), mover.opposite());
                assert_eq!(m.in_check(), m.is_in_check(m.active_color()).unwrap());
                let legal = m.legal_moves().unwrap();
                if m.in_check() {
                    // Not mated, so some move must escape.
                    assert!(!legal.is_empty());
                }
                if legal.is_empty() {
                    break;
                }
            }
        }
    }
}

//! Turns a drag-and-drop gesture into a candidate position.

use shakmaty::{Role, Square};

use crate::error::Rejected;
use crate::position::Position;

/// A proposed move as the board reports it: two squares and the piece a
/// pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Role,
}

impl CandidateMove {
    /// Pawns reaching the last rank always become queens.
    pub fn queen_promoting(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: Role::Queen,
        }
    }
}

/// Validate `from -> to` against `position` and return the position it
/// would lead to. Nothing is committed; the caller decides what to do with
/// the candidate.
pub fn try_move(position: &Position, from: Square, to: Square) -> Result<Position, Rejected> {
    position.play(&CandidateMove::queen_promoting(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IllegalMove;
    use crate::transcript::Transcript;
    use shakmaty::Color;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_legal_move_adds_exactly_one_ply() {
        let start = Position::initial();
        for (from, to) in [("e2", "e4"), ("g1", "f3"), ("b2", "b3"), ("b1", "a3")] {
            let next = try_move(&start, sq(from), sq(to)).unwrap();
            assert!(next.follows(&start), "{from}{to}");
            assert_eq!(next.turn(), Color::Black);
        }
    }

    #[test]
    fn test_rejects_empty_square() {
        let err = try_move(&Position::initial(), sq("e4"), sq("e5")).unwrap_err();
        assert_eq!(err, IllegalMove::EmptySquare(sq("e4")));
    }

    #[test]
    fn test_rejects_wrong_side() {
        let err = try_move(&Position::initial(), sq("e7"), sq("e5")).unwrap_err();
        assert_eq!(
            err,
            IllegalMove::WrongSide {
                square: sq("e7"),
                owner: Color::Black,
                turn: Color::White,
            }
        );
    }

    #[test]
    fn test_rejects_blocked_geometry() {
        let err = try_move(&Position::initial(), sq("f1"), sq("c4")).unwrap_err();
        assert_eq!(
            err,
            IllegalMove::NotLegal {
                from: sq("f1"),
                to: sq("c4")
            }
        );
    }

    #[test]
    fn test_rejects_move_leaving_king_in_check() {
        // Black is in check; a pawn move that ignores it is refused.
        let pos = Position::from_transcript(&Transcript::from("1. e4 d5 2. Bb5+")).unwrap();
        let err = try_move(&pos, sq("a7"), sq("a6")).unwrap_err();
        assert!(matches!(err, IllegalMove::NotLegal { .. }));
        assert!(try_move(&pos, sq("c7"), sq("c6")).is_ok());
    }

    #[test]
    fn test_rejects_after_checkmate() {
        let mated = Position::from_transcript(&Transcript::from("1. f3 e5 2. g4 Qh4#")).unwrap();
        let err = try_move(&mated, sq("a2"), sq("a3")).unwrap_err();
        assert_eq!(err, IllegalMove::GameOver);
    }
}

//! Terminal-state detection.

use shakmaty::{Color, Position as _};

use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

/// Result of the game so far. Derived from a [`Position`], never stored on
/// its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    None,
    /// `winner` delivered mate; the side to move is the loser.
    Checkmate { winner: Color },
    Draw(DrawReason),
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::None)
    }

    /// Message for the board's status line.
    pub fn text(&self) -> Option<String> {
        match self {
            Outcome::None => None,
            Outcome::Checkmate { winner } => Some(format!(
                "Checkmate! {} wins.",
                match winner {
                    Color::White => "White",
                    Color::Black => "Black",
                }
            )),
            Outcome::Draw(reason) => Some(
                match reason {
                    DrawReason::Stalemate => "Draw by stalemate.",
                    DrawReason::InsufficientMaterial => "Draw by insufficient material.",
                    DrawReason::FiftyMoveRule => "Draw by the fifty-move rule.",
                    DrawReason::ThreefoldRepetition => "Draw by threefold repetition.",
                }
                .to_string(),
            ),
        }
    }
}

pub fn evaluate(position: &Position) -> Outcome {
    let board = position.board();

    if board.is_checkmate() {
        return Outcome::Checkmate {
            winner: !board.turn(),
        };
    }
    if board.is_stalemate() {
        return Outcome::Draw(DrawReason::Stalemate);
    }
    if board.is_insufficient_material() {
        return Outcome::Draw(DrawReason::InsufficientMaterial);
    }
    if board.halfmoves() >= 100 {
        return Outcome::Draw(DrawReason::FiftyMoveRule);
    }
    if position.repetitions() >= 3 {
        return Outcome::Draw(DrawReason::ThreefoldRepetition);
    }

    Outcome::None
}

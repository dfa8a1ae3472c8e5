//! Error types for position transitions and transcript parsing.

use shakmaty::{Color, Square};
use thiserror::Error;

/// A single move was refused by the rules. The position it was tried
/// against is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("the game is already over")]
    GameOver,

    #[error("there is no piece on {0}")]
    EmptySquare(Square),

    #[error("the piece on {square} belongs to {owner:?} but {turn:?} is to move")]
    WrongSide {
        square: Square,
        owner: Color,
        turn: Color,
    },

    #[error("{from}{to} is not a legal move")]
    NotLegal { from: Square, to: Square },

    #[error("the position changed before the move was committed")]
    Superseded,
}

/// What the board surface reports back for a refused gesture.
pub type Rejected = IllegalMove;

/// A transcript could not be replayed from the initial position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedTranscript {
    #[error("unreadable token {token:?} at ply {ply}")]
    UnreadableToken { ply: usize, token: String },

    #[error("illegal move {san} at ply {ply}")]
    IllegalPly { ply: usize, san: String },

    #[error("move {san} at ply {ply} was played after the game ended")]
    PlayAfterGameOver { ply: usize, san: String },

    #[error("transcript does not continue the current game by one ply")]
    NotAContinuation,
}

//! Client error types

use chess_core::{IllegalMove, MalformedTranscript};
use thiserror::Error;

/// The prediction service could not produce a reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictError {
    #[error("Request error: {0}")]
    Transport(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Engine refused the request: {0}")]
    Refused(String),

    #[error("Reply carried no moves")]
    MissingMoves,

    #[error("Unreadable reply: {0}")]
    Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Engine move failed: {0}")]
    NetworkFailure(#[from] PredictError),

    #[error("Engine sent an unusable transcript: {0}")]
    MalformedReply(#[from] MalformedTranscript),

    #[error("Engine reply no longer matches the board")]
    StaleReply,

    #[error("An engine move is already being calculated")]
    AlreadyPending,
}

/// Why a drop gesture left the board unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropRejected {
    #[error("Waiting for the engine's move")]
    Busy,

    #[error(transparent)]
    Illegal(#[from] IllegalMove),
}

//! Local chess state for the checkmate board: the position model, move
//! validation, transcripts and game outcome.

pub mod applier;
pub mod error;
pub mod model;
pub mod outcome;
pub mod position;
pub mod transcript;

pub use applier::{try_move, CandidateMove};
pub use error::{IllegalMove, MalformedTranscript, Rejected};
pub use model::PositionModel;
pub use outcome::{evaluate, DrawReason, Outcome};
pub use position::Position;
pub use transcript::Transcript;

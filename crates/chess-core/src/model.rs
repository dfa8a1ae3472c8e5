//! Owner of the current position.

use std::sync::Arc;

use tracing::debug;

use crate::applier::CandidateMove;
use crate::error::{IllegalMove, MalformedTranscript};
use crate::position::Position;
use crate::transcript::Transcript;

/// Holds the one authoritative [`Position`] and swaps it wholesale on every
/// accepted transition. Readers get cheap `Arc` snapshots that never change
/// underneath them.
#[derive(Debug, Clone)]
pub struct PositionModel {
    current: Arc<Position>,
    generation: u64,
}

impl Default for PositionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionModel {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Position::initial()),
            generation: 0,
        }
    }

    pub fn current(&self) -> Arc<Position> {
        Arc::clone(&self.current)
    }

    /// Bumped every time the current position is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn replace(&mut self, next: Position) -> Arc<Position> {
        self.current = Arc::new(next);
        self.generation += 1;
        debug!(
            generation = self.generation,
            plies = self.current.ply_count(),
            "position replaced"
        );
        self.current()
    }

    pub fn apply_move(&mut self, mv: &CandidateMove) -> Result<Arc<Position>, IllegalMove> {
        let next = self.current.play(mv)?;
        Ok(self.replace(next))
    }

    /// Commit a candidate built by [`try_move`](crate::applier::try_move).
    /// The candidate must continue the current position by exactly one ply.
    pub fn commit(&mut self, candidate: Position) -> Result<Arc<Position>, IllegalMove> {
        if !candidate.follows(&self.current) {
            return Err(IllegalMove::Superseded);
        }
        Ok(self.replace(candidate))
    }

    /// Replace the game with the one a transcript describes.
    pub fn apply_transcript(
        &mut self,
        transcript: &Transcript,
    ) -> Result<Arc<Position>, MalformedTranscript> {
        let next = Position::from_transcript(transcript)?;
        Ok(self.replace(next))
    }

    /// Like [`apply_transcript`](Self::apply_transcript), but only accepts a
    /// transcript that replays the current game and adds exactly one ply.
    pub fn continue_with(
        &mut self,
        transcript: &Transcript,
    ) -> Result<Arc<Position>, MalformedTranscript> {
        let next = Position::from_transcript(transcript)?;
        if !next.follows(&self.current) {
            return Err(MalformedTranscript::NotAContinuation);
        }
        Ok(self.replace(next))
    }

    /// Take back the last `count` plies. Does nothing when fewer exist.
    pub fn undo_last_ply(&mut self, count: usize) -> Arc<Position> {
        if count == 0 || count > self.current.ply_count() {
            return self.current();
        }
        let next = self.current.without_last(count);
        self.replace(next)
    }

    pub fn reset(&mut self) -> Arc<Position> {
        self.replace(Position::initial())
    }
}

//! Engine move synchronizer.
//!
//! One request may be in flight at a time. Each request carries a ticket
//! naming the position it was issued against; a reply whose ticket is no
//! longer the one in flight, or whose position has since been replaced, is
//! discarded as stale.

use std::sync::Arc;

use chess_core::{Position, PositionModel, Transcript};
use tracing::{debug, info, warn};

use crate::clients::predict::MovePredictor;
use crate::error::{PredictError, SyncError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
    generation: u64,
}

impl Ticket {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// An outbound engine request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    ticket: Ticket,
    input_moves: Transcript,
}

impl SyncRequest {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// The transcript to send, without move numbers.
    pub fn input_moves(&self) -> &Transcript {
        &self.input_moves
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    Pending(Ticket),
}

/// Puts the synchronizer back to `Idle` if the request future is dropped
/// before it resolves.
struct AbandonOnDrop<'a> {
    state: Option<&'a mut SyncState>,
}

impl AbandonOnDrop<'_> {
    fn disarm(mut self) {
        self.state = None;
    }
}

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            *state = SyncState::Idle;
        }
    }
}

#[derive(Debug, Default)]
pub struct EngineSync {
    state: SyncState,
    issued: u64,
}

impl EngineSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SyncState::Pending(_))
    }

    /// Idle -> Pending. Returns `None` (and stays idle) when the game is
    /// already over.
    pub fn begin(&mut self, model: &PositionModel) -> Result<Option<SyncRequest>, SyncError> {
        if self.is_pending() {
            return Err(SyncError::AlreadyPending);
        }

        let position = model.current();
        if position.is_terminal() {
            return Ok(None);
        }

        self.issued += 1;
        let ticket = Ticket {
            id: self.issued,
            generation: model.generation(),
        };
        let input_moves = position.transcript().bare();
        debug!(ticket = ticket.id, input_moves = %input_moves, "engine request issued");

        self.state = SyncState::Pending(ticket);
        Ok(Some(SyncRequest {
            ticket,
            input_moves,
        }))
    }

    /// Pending -> Reconciled | Failed -> Idle.
    ///
    /// The model is only touched when the reply is current and replays the
    /// sent game plus exactly one ply.
    pub fn finish(
        &mut self,
        model: &mut PositionModel,
        request: &SyncRequest,
        reply: Result<Transcript, PredictError>,
    ) -> Result<Arc<Position>, SyncError> {
        if self.state != SyncState::Pending(request.ticket) {
            debug!(ticket = request.ticket.id, "reply for a request no longer in flight");
            return Err(SyncError::StaleReply);
        }
        self.state = SyncState::Idle;

        if model.generation() != request.ticket.generation {
            debug!(
                ticket = request.ticket.id,
                issued_at = request.ticket.generation,
                current = model.generation(),
                "reply for a replaced position"
            );
            return Err(SyncError::StaleReply);
        }

        let transcript = reply.inspect_err(|e| {
            warn!(ticket = request.ticket.id, error = %e, "engine request failed");
        })?;

        let position = model.continue_with(&transcript).inspect_err(|e| {
            warn!(ticket = request.ticket.id, reply = %transcript, error = %e, "engine reply rejected");
        })?;

        info!(
            ticket = request.ticket.id,
            plies = position.ply_count(),
            last = ?position.sans().last().map(|san| san.to_string()),
            "engine move reconciled"
        );
        Ok(position)
    }

    /// Send `request` and reconcile the reply.
    pub async fn exchange<P: MovePredictor>(
        &mut self,
        model: &mut PositionModel,
        request: SyncRequest,
        predictor: &P,
    ) -> Result<Arc<Position>, SyncError> {
        let guard = AbandonOnDrop {
            state: Some(&mut self.state),
        };
        let reply = predictor.predict(&request.input_moves).await;
        guard.disarm();

        self.finish(model, &request, reply)
    }

    /// A whole cycle: begin, send, reconcile. `Ok(None)` when the game was
    /// already over and nothing was sent.
    pub async fn run<P: MovePredictor>(
        &mut self,
        model: &mut PositionModel,
        predictor: &P,
    ) -> Result<Option<Arc<Position>>, SyncError> {
        let Some(request) = self.begin(model)? else {
            return Ok(None);
        };
        self.exchange(model, request, predictor).await.map(Some)
    }

    /// Drop whatever is in flight; its reply will be treated as stale.
    pub fn abandon(&mut self) {
        if let SyncState::Pending(ticket) = self.state {
            debug!(ticket = ticket.id, "engine request abandoned");
        }
        self.state = SyncState::Idle;
    }
}

//! The boundary between the game state and whatever draws the board.

use std::sync::Arc;

use chess_core::{applier, evaluate, Outcome, Position, PositionModel, Transcript};
use serde::Serialize;
use shakmaty::{Color, Square};
use tracing::{debug, info, warn};

use crate::clients::predict::MovePredictor;
use crate::error::{DropRejected, PredictError, SyncError};
use crate::sync::{EngineSync, SyncRequest};

/// The human always plays White; the engine answers as Black.
const HUMAN: Color = Color::White;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// FEN of the position to draw.
    pub position: String,
    pub board_width: u32,
    /// An engine move is being calculated; drops will be refused.
    pub loading: bool,
    pub outcome: Option<String>,
    /// Transient message about the last failed engine request.
    pub notice: Option<String>,
    pub transcript: String,
}

pub struct BoardSurface<P> {
    model: PositionModel,
    sync: EngineSync,
    outcome: Outcome,
    notice: Option<String>,
    predictor: P,
    board_width: u32,
}

impl<P: MovePredictor> BoardSurface<P> {
    pub fn new(predictor: P, board_width: u32) -> Self {
        Self {
            model: PositionModel::new(),
            sync: EngineSync::new(),
            outcome: Outcome::None,
            notice: None,
            predictor,
            board_width,
        }
    }

    pub fn position(&self) -> Arc<Position> {
        self.model.current()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_loading(&self) -> bool {
        self.sync.is_pending()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn view(&self) -> BoardView {
        let position = self.model.current();
        BoardView {
            position: position.fen(),
            board_width: self.board_width,
            loading: self.is_loading(),
            outcome: self.outcome.text(),
            notice: self.notice.clone(),
            transcript: position.transcript().to_string(),
        }
    }

    /// Apply a drop gesture locally. On success the human ply is committed
    /// and, unless the game just ended, an engine request is returned for
    /// the caller to send and hand back to [`complete`](Self::complete).
    pub fn drop_piece(
        &mut self,
        from: Square,
        to: Square,
    ) -> Result<Option<SyncRequest>, DropRejected> {
        if self.sync.is_pending() {
            return Err(DropRejected::Busy);
        }

        let candidate = applier::try_move(&self.model.current(), from, to).inspect_err(|e| {
            debug!(%from, %to, reason = %e, "drop rejected");
        })?;
        let committed = self.model.commit(candidate)?;

        info!(
            ply = committed.ply_count(),
            san = ?committed.sans().last().map(|san| san.to_string()),
            "human move committed"
        );
        self.notice = None;
        self.outcome = evaluate(&committed);

        if self.outcome.is_over() {
            return Ok(None);
        }
        self.sync.begin(&self.model).map_err(|_| DropRejected::Busy)
    }

    /// Feed back the reply to a request from [`drop_piece`](Self::drop_piece)
    /// or [`retry`](Self::retry).
    pub fn complete(
        &mut self,
        request: &SyncRequest,
        reply: Result<Transcript, PredictError>,
    ) -> Result<Arc<Position>, SyncError> {
        let result = self.sync.finish(&mut self.model, request, reply);
        self.absorb(result)
    }

    fn absorb(
        &mut self,
        result: Result<Arc<Position>, SyncError>,
    ) -> Result<Arc<Position>, SyncError> {
        match result {
            Ok(position) => {
                self.outcome = evaluate(&position);
                if let Some(text) = self.outcome.text() {
                    info!(outcome = %text, "game over");
                }
                Ok(position)
            }
            Err(SyncError::StaleReply) => Err(SyncError::StaleReply),
            Err(e) => {
                warn!(error = %e, "engine move failed");
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Drop gesture plus the engine round-trip. Returns whether the board
    /// accepted the gesture; engine failures only show up as the notice.
    pub async fn on_drop(&mut self, from: Square, to: Square) -> bool {
        match self.drop_piece(from, to) {
            Ok(Some(request)) => {
                self.send(request).await;
                true
            }
            Ok(None) => true,
            Err(_) => false,
        }
    }

    async fn send(&mut self, request: SyncRequest) {
        let result = self
            .sync
            .exchange(&mut self.model, request, &self.predictor)
            .await;
        let _ = self.absorb(result);
    }

    /// Ask the engine again after a failed request. Only possible while the
    /// engine is to move and nothing is in flight.
    pub fn retry(&mut self) -> Option<SyncRequest> {
        let position = self.model.current();
        if self.sync.is_pending() || position.turn() == HUMAN || self.outcome.is_over() {
            return None;
        }
        self.notice = None;
        self.sync.begin(&self.model).ok().flatten()
    }

    pub async fn on_retry(&mut self) -> bool {
        match self.retry() {
            Some(request) => {
                self.send(request).await;
                true
            }
            None => false,
        }
    }

    /// Take back the human's last move and the engine's reply to it.
    pub fn undo(&mut self) -> Arc<Position> {
        self.sync.abandon();
        self.outcome = Outcome::None;
        self.notice = None;
        self.model.undo_last_ply(2)
    }

    pub fn reset(&mut self) -> Arc<Position> {
        self.sync.abandon();
        self.outcome = Outcome::None;
        self.notice = None;
        self.model.reset()
    }
}

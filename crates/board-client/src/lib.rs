//! Client side of the checkmate board: keeps the local game in step with the
//! remote move-prediction service.

pub mod clients;
pub mod config;
pub mod error;
pub mod surface;
pub mod sync;

pub use clients::predict::{HttpPredictor, MovePredictor};
pub use config::Config;
pub use error::{DropRejected, PredictError, SyncError};
pub use surface::{BoardSurface, BoardView};
pub use sync::{EngineSync, SyncRequest, SyncState};

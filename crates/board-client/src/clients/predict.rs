use std::future::Future;
use std::time::Duration;

use chess_core::Transcript;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::PredictError;

/// Something that answers a bare-move transcript with the game continued
/// by the engine's reply.
pub trait MovePredictor {
    fn predict(
        &self,
        input_moves: &Transcript,
    ) -> impl Future<Output = Result<Transcript, PredictError>> + Send;
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    input_moves: &'a Transcript,
}

#[derive(Deserialize)]
struct PredictResponse {
    success: Option<bool>,
    moves: Option<Transcript>,
    message: Option<String>,
}

/// Client for the `/predict` endpoint of the move-prediction service.
#[derive(Clone)]
pub struct HttpPredictor {
    client: Client,
    url: String,
}

impl HttpPredictor {
    pub fn new(config: &Config) -> Result<Self, PredictError> {
        let client = Client::builder()
            .user_agent("CheckmateBoard/1.0")
            .timeout(Duration::from_secs(config.predict_timeout_secs))
            .build()
            .map_err(|e| PredictError::Transport(format!("Client build error: {e}")))?;

        Ok(Self {
            client,
            url: config.predict_url(),
        })
    }
}

impl MovePredictor for HttpPredictor {
    async fn predict(&self, input_moves: &Transcript) -> Result<Transcript, PredictError> {
        debug!(url = %self.url, input_moves = %input_moves, "POST predict");

        let resp = self
            .client
            .post(&self.url)
            .json(&PredictRequest { input_moves })
            .send()
            .await
            .map_err(|e| PredictError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PredictError::Status(resp.status().as_u16()));
        }

        let body: PredictResponse = resp
            .json()
            .await
            .map_err(|e| PredictError::Decode(e.to_string()))?;

        // The service reports its own failures as 200 + success=false.
        if body.success == Some(false) {
            return Err(PredictError::Refused(
                body.message.unwrap_or_else(|| "no reason given".to_string()),
            ));
        }

        body.moves.ok_or(PredictError::MissingMoves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let moves = Transcript::from("e4 e5 Nf3");
        let body = serde_json::to_value(PredictRequest {
            input_moves: &moves,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "input_moves": "e4 e5 Nf3" }));
    }

    #[test]
    fn test_response_without_success_flag() {
        let body: PredictResponse = serde_json::from_str(r#"{"moves": "1. e4 e5"}"#).unwrap();
        assert_eq!(body.success, None);
        assert_eq!(body.moves, Some(Transcript::from("1. e4 e5")));
    }

    #[test]
    fn test_refusal_body() {
        let body: PredictResponse =
            serde_json::from_str(r#"{"success": false, "message": "Illegal move."}"#).unwrap();
        assert_eq!(body.success, Some(false));
        assert!(body.moves.is_none());
        assert_eq!(body.message.as_deref(), Some("Illegal move."));
    }
}

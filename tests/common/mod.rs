use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use board_client::{Config, HttpPredictor};
use chess_core::{Position, Transcript};
use serde_json::{json, Value};
use shakmaty::Position as _;

/// What the mock `/predict` endpoint does with each request.
#[derive(Clone)]
pub enum Script {
    /// Answer with the queued (status, body) pairs in order.
    Canned(Arc<Mutex<VecDeque<(u16, Value)>>>),
    /// Replay the moves and append the first legal reply.
    FirstLegalMove,
}

#[derive(Clone)]
pub struct MockService {
    pub script: Script,
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl MockService {
    pub fn received_moves(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|body| body["input_moves"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

fn first_legal_reply(input_moves: &str) -> (u16, Value) {
    let Ok(position) = Position::from_transcript(&Transcript::from(input_moves)) else {
        return (200, json!({ "success": false, "message": "Illegal move." }));
    };
    let Some(mv) = position.board().legal_moves().first().cloned() else {
        return (200, json!({ "success": false, "message": "Illegal move." }));
    };

    let san = shakmaty::san::San::from_move(position.board(), mv);
    let moves = format!("{} {}", position.transcript(), san);
    (200, json!({ "success": true, "moves": moves.trim() }))
}

async fn predict(State(mock): State<MockService>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let input_moves = body["input_moves"].as_str().unwrap_or_default().to_string();
    mock.received.lock().unwrap().push(body);

    let (status, reply) = match &mock.script {
        Script::Canned(queue) => queue.lock().unwrap().pop_front().unwrap_or((
            200,
            json!({ "success": false, "message": "Unhandled error." }),
        )),
        Script::FirstLegalMove => first_legal_reply(&input_moves),
    };
    (StatusCode::from_u16(status).unwrap(), Json(reply))
}

/// Start a mock prediction service on an ephemeral port.
pub async fn spawn_service(script: Script) -> (MockService, Config) {
    let mock = MockService {
        script,
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/predict", post(predict))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = Config {
        backend_url: format!("http://{addr}"),
        predict_timeout_secs: 5,
        ..Config::default()
    };
    (mock, config)
}

pub async fn canned(replies: Vec<(u16, Value)>) -> (MockService, HttpPredictor) {
    let (mock, config) = spawn_service(Script::Canned(Arc::new(Mutex::new(replies.into())))).await;
    (mock, HttpPredictor::new(&config).unwrap())
}

/// A predictor pointed at a port nothing listens on.
pub async fn unreachable() -> HttpPredictor {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        backend_url: format!("http://{addr}"),
        predict_timeout_secs: 5,
        ..Config::default()
    };
    HttpPredictor::new(&config).unwrap()
}

//! Terminal board: type moves, the engine answers through the
//! prediction service.

use board_client::{BoardSurface, Config, HttpPredictor, MovePredictor, PredictError, SyncRequest};
use chess_core::{Position, Transcript};
use shakmaty::{File, Position as _, Rank, Square};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Drop(Square, Square),
    Undo,
    Moves,
    Reset,
    Retry,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "\\b" | "undo" => return Command::Undo,
        "\\m" | "moves" => return Command::Moves,
        "reset" => return Command::Reset,
        "retry" => return Command::Retry,
        "help" | "?" => return Command::Help,
        "quit" | "exit" => return Command::Quit,
        _ => {}
    }

    let squares: String = line
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if squares.len() == 4 && squares.is_ascii() {
        if let (Ok(from), Ok(to)) = (squares[..2].parse(), squares[2..].parse()) {
            return Command::Drop(from, to);
        }
    }
    Command::Unknown(line.to_string())
}

const HELP: &str = "Moves: e2e4 or e2 e4. Commands: \\b (undo), \\m (moves), reset, retry, quit";

fn render_board(position: &Position) -> String {
    let board = position.board().board();
    let mut out = String::new();
    for rank in (0..8u32).rev() {
        out.push_str(&format!("{} ", rank + 1));
        for file in 0..8u32 {
            let sq = Square::from_coords(File::new(file), Rank::new(rank));
            out.push(board.piece_at(sq).map_or('.', |piece| piece.char()));
            out.push(' ');
        }
        out.push('\n');
    }
    out.push_str("  a b c d e f g h\n");
    out
}

fn render<P: MovePredictor>(surface: &BoardSurface<P>) {
    let view = surface.view();
    println!("\n{}", render_board(&surface.position()));
    if !view.transcript.is_empty() {
        println!("{}", view.transcript);
    }
    if view.loading {
        println!("Calculating move...");
    }
    if let Some(notice) = &view.notice {
        println!("! {notice}");
    }
    if let Some(outcome) = &view.outcome {
        println!("{outcome}");
    }
}

type InFlight = (SyncRequest, JoinHandle<Result<Transcript, PredictError>>);

fn spawn_request(predictor: &HttpPredictor, request: SyncRequest) -> InFlight {
    let predictor = predictor.clone();
    let input_moves = request.input_moves().clone();
    let handle = tokio::spawn(async move { predictor.predict(&input_moves).await });
    (request, handle)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so they don't interleave with the board
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    info!(backend_url = %config.backend_url, "Starting checkmate board");

    let predictor = HttpPredictor::new(&config)?;
    let mut surface = BoardSurface::new(predictor.clone(), config.board_width);
    let mut in_flight: Option<InFlight> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    render(&surface);

    loop {
        let engine_reply = async {
            match in_flight.as_mut() {
                Some((_, handle)) => handle.await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            joined = engine_reply => {
                let Some((request, _)) = in_flight.take() else { continue };
                let reply = joined.unwrap_or_else(|e| {
                    Err(PredictError::Transport(format!("engine task failed: {e}")))
                });
                // Stale and failed replies are already reflected in the view.
                let _ = surface.complete(&request, reply);
                render(&surface);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Command::Drop(from, to) => match surface.drop_piece(from, to) {
                        Ok(request) => {
                            if let Some(request) = request {
                                in_flight = Some(spawn_request(&predictor, request));
                            }
                            render(&surface);
                        }
                        Err(e) => println!("Not applied: {e}"),
                    },
                    Command::Undo => {
                        surface.undo();
                        render(&surface);
                    }
                    Command::Reset => {
                        surface.reset();
                        render(&surface);
                    }
                    Command::Retry => match surface.retry() {
                        Some(request) => {
                            in_flight = Some(spawn_request(&predictor, request));
                            render(&surface);
                        }
                        None => println!("Nothing to retry"),
                    },
                    Command::Moves => println!("Moves so far: {}", surface.position().transcript()),
                    Command::Help => println!("{HELP}"),
                    Command::Quit => break,
                    Command::Unknown(text) if text.is_empty() => {}
                    Command::Unknown(text) => println!("Unrecognised input {text:?}. {HELP}"),
                }
            }
        }
    }

    if let Some((_, handle)) = in_flight.take() {
        warn!("Quitting with an engine request still in flight");
        handle.abort();
    }
    println!("--- Final board ---");
    println!("{}", surface.position().transcript());
    Ok(())
}

//! The authoritative game position and its pure transitions.

use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus, Suffix};
use shakmaty::{Chess, Color, EnPassantMode, File, Move, Position as _, Role, Square};

use crate::applier::CandidateMove;
use crate::error::{IllegalMove, MalformedTranscript};
use crate::outcome::{self, Outcome};
use crate::transcript::Transcript;

/// A legal chess position together with the plies that led to it from the
/// standard starting position.
///
/// Values are never mutated once handed out: every transition returns a new
/// `Position`. Two positions compare equal when they were reached by the
/// same sequence of moves.
#[derive(Debug, Clone)]
pub struct Position {
    board: Chess,
    moves: Vec<Move>,
    sans: Vec<SanPlus>,
    // One key per position reached, starting with the initial one.
    keys: Vec<String>,
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.moves == other.moves
    }
}

impl Eq for Position {}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

/// Placement, side to move, castling rights and en-passant square: the
/// part of a FEN that decides whether two positions repeat.
fn repetition_key(board: &Chess) -> String {
    Fen::from_position(board, EnPassantMode::Legal)
        .to_string()
        .split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Where the king lands when castling with `rook`.
fn castle_target(king: Square, rook: Square) -> Square {
    let file = if rook.file() > king.file() { File::G } else { File::C };
    Square::from_coords(file, king.rank())
}

fn resolves_to(mv: &Move, from: Square, to: Square, promotion: Role) -> bool {
    match mv {
        Move::Normal { from: f, to: t, promotion: p, .. } => {
            *f == from && *t == to && p.map_or(true, |role| role == promotion)
        }
        Move::EnPassant { from: f, to: t } => *f == from && *t == to,
        Move::Castle { king, rook } => {
            *king == from && (*rook == to || castle_target(*king, *rook) == to)
        }
        _ => false,
    }
}

impl Position {
    pub fn initial() -> Self {
        let board = Chess::default();
        let key = repetition_key(&board);
        Self {
            board,
            moves: Vec::new(),
            sans: Vec::new(),
            keys: vec![key],
        }
    }

    /// A position set up directly rather than played from the start.
    #[cfg(test)]
    pub(crate) fn from_board(board: Chess) -> Self {
        let key = repetition_key(&board);
        Self {
            board,
            moves: Vec::new(),
            sans: Vec::new(),
            keys: vec![key],
        }
    }

    pub fn board(&self) -> &Chess {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.board.turn()
    }

    /// Plies played since the initial position.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn sans(&self) -> &[SanPlus] {
        &self.sans
    }

    pub fn transcript(&self) -> Transcript {
        Transcript::from_sans(&self.sans)
    }

    /// FEN of the current position, the string handed to board renderers.
    pub fn fen(&self) -> String {
        Fen::from_position(&self.board, EnPassantMode::Legal).to_string()
    }

    /// How many times the current position has occurred, this one included.
    pub fn repetitions(&self) -> usize {
        match self.keys.last() {
            Some(current) => self.keys.iter().filter(|key| *key == current).count(),
            None => 0,
        }
    }

    pub fn outcome(&self) -> Outcome {
        outcome::evaluate(self)
    }

    /// Checkmate or draw: no further plies may be played.
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_over()
    }

    /// `true` when `self` continues `earlier` by exactly one ply.
    pub fn follows(&self, earlier: &Position) -> bool {
        self.moves.len() == earlier.moves.len() + 1 && self.moves.starts_with(&earlier.moves)
    }

    /// Resolve a from/to gesture to the legal move it denotes.
    pub fn resolve(&self, candidate: &CandidateMove) -> Result<Move, IllegalMove> {
        if self.is_terminal() {
            return Err(IllegalMove::GameOver);
        }

        let piece = self
            .board
            .board()
            .piece_at(candidate.from)
            .ok_or(IllegalMove::EmptySquare(candidate.from))?;

        if piece.color != self.turn() {
            return Err(IllegalMove::WrongSide {
                square: candidate.from,
                owner: piece.color,
                turn: self.turn(),
            });
        }

        self.board
            .legal_moves()
            .iter()
            .find(|mv| resolves_to(mv, candidate.from, candidate.to, candidate.promotion))
            .cloned()
            .ok_or(IllegalMove::NotLegal {
                from: candidate.from,
                to: candidate.to,
            })
    }

    /// The position after `candidate`, or the reason it was refused.
    pub fn play(&self, candidate: &CandidateMove) -> Result<Position, IllegalMove> {
        let mv = self.resolve(candidate)?;
        Ok(self.after(mv))
    }

    /// Append a move already known to be legal here.
    fn after(&self, mv: Move) -> Position {
        let san = San::from_move(&self.board, mv.clone());
        let mut board = self.board.clone();
        board.play_unchecked(mv.clone());

        let suffix = if board.is_checkmate() {
            Some(Suffix::Checkmate)
        } else if board.is_check() {
            Some(Suffix::Check)
        } else {
            None
        };

        let mut next = self.clone();
        next.keys.push(repetition_key(&board));
        next.board = board;
        next.moves.push(mv);
        next.sans.push(SanPlus { san, suffix });
        next
    }

    /// Replay a transcript from the initial position.
    pub fn from_transcript(transcript: &Transcript) -> Result<Position, MalformedTranscript> {
        let mut position = Position::initial();

        for (ply, token) in transcript.move_tokens().into_iter().enumerate() {
            let san_plus: SanPlus = token
                .parse()
                .map_err(|_| MalformedTranscript::UnreadableToken {
                    ply: ply + 1,
                    token: token.clone(),
                })?;

            if position.is_terminal() {
                return Err(MalformedTranscript::PlayAfterGameOver {
                    ply: ply + 1,
                    san: token,
                });
            }

            let mv = san_plus
                .san
                .to_move(&position.board)
                .map_err(|_| MalformedTranscript::IllegalPly {
                    ply: ply + 1,
                    san: token.clone(),
                })?;

            position = position.after(mv);
        }

        Ok(position)
    }

    /// This position with the last `count` plies taken back, or an
    /// unchanged copy when fewer than `count` plies exist.
    pub fn without_last(&self, count: usize) -> Position {
        if count == 0 || count > self.moves.len() {
            return self.clone();
        }

        let keep = self.moves.len() - count;
        let mut board = Chess::default();
        for mv in &self.moves[..keep] {
            board.play_unchecked(mv.clone());
        }

        Position {
            board,
            moves: self.moves[..keep].to_vec(),
            sans: self.sans[..keep].to_vec(),
            keys: self.keys[..=keep].to_vec(),
        }
    }
}

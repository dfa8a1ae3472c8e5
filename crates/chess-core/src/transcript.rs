//! Movetext transcripts exchanged with the prediction service.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use shakmaty::san::SanPlus;

/// Ordered SAN movetext, e.g. `1. e4 e5 2. Nf3`.
///
/// A transcript is derived from a [`Position`](crate::position::Position)
/// and never treated as the source of truth; replaying it is the job of
/// [`Position::from_transcript`](crate::position::Position::from_transcript).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(String);

fn move_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d+\.+\s*").expect("move number pattern"))
}

fn annotation_re() -> &'static Regex {
    // Header tags, brace comments, variations.
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[[^\]]*\]|\{[^}]*\}|\([^)]*\)").expect("annotation pattern")
    })
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

/// Tokens like `<bos>` / `<eos>` leak through from the language model
/// behind the prediction service.
fn is_control_token(token: &str) -> bool {
    token.starts_with('<') && token.ends_with('>')
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Number plies as `1. e4 e5 2. Nf3`.
    pub fn from_sans(sans: &[SanPlus]) -> Self {
        let mut text = String::new();
        for (ply, san) in sans.iter().enumerate() {
            if !text.is_empty() {
                text.push(' ');
            }
            if ply % 2 == 0 {
                text.push_str(&format!("{}. ", ply / 2 + 1));
            }
            text.push_str(&san.to_string());
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The same movetext with move-number annotations (`12. `, `12... `)
    /// removed and whitespace collapsed. This is what the prediction
    /// service expects as `input_moves`.
    pub fn bare(&self) -> Transcript {
        let stripped = move_number_re().replace_all(&self.0, "");
        Self(stripped.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    /// SAN tokens in play order. Headers, comments, variations, move
    /// numbers, result markers and model control tokens are skipped; every
    /// other token is returned as-is for the caller to parse.
    pub fn move_tokens(&self) -> Vec<String> {
        let no_annotations = annotation_re().replace_all(&self.0, " ");
        let no_numbers = move_number_re().replace_all(&no_annotations, " ");

        no_numbers
            .split_whitespace()
            .filter(|token| !is_result_token(token) && !is_control_token(token))
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Transcript {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Transcript {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sans(moves: &[&str]) -> Vec<SanPlus> {
        moves.iter().map(|m| m.parse().unwrap()).collect()
    }

    #[test]
    fn test_from_sans_numbers_white_plies() {
        let t = Transcript::from_sans(&sans(&["e4", "e5", "Nf3"]));
        assert_eq!(t.as_str(), "1. e4 e5 2. Nf3");
        assert_eq!(Transcript::from_sans(&[]).as_str(), "");
    }

    #[test]
    fn test_bare_strips_move_numbers() {
        assert_eq!(Transcript::from("1. e4").bare().as_str(), "e4");
        assert_eq!(
            Transcript::from("1. e4 e5 2. Nf3 Nc6 12. Bb5").bare().as_str(),
            "e4 e5 Nf3 Nc6 Bb5"
        );
        assert_eq!(Transcript::from("3... Nf6 4. O-O").bare().as_str(), "Nf6 O-O");
        assert_eq!(Transcript::from("e4 e5").bare().as_str(), "e4 e5");
    }

    #[test]
    fn test_bare_keeps_check_suffixes_and_ranks() {
        assert_eq!(
            Transcript::from("1. f3 e5 2. g4 Qh4#").bare().as_str(),
            "f3 e5 g4 Qh4#"
        );
    }

    #[test]
    fn test_move_tokens_skip_noise() {
        let t = Transcript::from(
            "[Event \"x\"] <bos> 1. e4 {best by test} e5 (1... c5) 2.Nf3 <eos> 1-0",
        );
        assert_eq!(t.move_tokens(), vec!["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_serde_is_transparent() {
        let t = Transcript::from("1. e4 e5");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"1. e4 e5\"");
        let back: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

fn default_time_control() -> String {
    "unknown".to_string()
}

/// One game as returned by a Chess.com monthly archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGameRecord {
    #[serde(default)]
    pub pgn: Option<String>,
    #[serde(default)]
    pub rated: bool,
    #[serde(default = "default_time_control")]
    pub time_control: String,
    #[serde(default)]
    pub url: String,
    /// Archive page the record came from; filled in by the fetcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    White,
    Black,
}

impl PlayerColor {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerColor::White => "white",
            PlayerColor::Black => "black",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PgnHeaders {
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub date: Option<String>,
}

impl Default for PgnHeaders {
    fn default() -> Self {
        Self {
            white: "Unknown".to_string(),
            black: "Unknown".to_string(),
            result: "*".to_string(),
            date: None,
        }
    }
}

/// A single half-move replayed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEntry {
    pub number: usize, // 1-indexed half-move number
    #[serde(rename = "move")]
    pub notation: String, // SAN with check/mate suffix
    pub color: PlayerColor,
    /// Piece symbol of the moving piece, uppercase for white.
    pub piece: Option<char>,
    pub is_capture: bool,
    pub is_check: bool,
    /// FEN of the position after the move.
    pub fen: String,
}

impl MoveEntry {
    /// Notation without the `+`/`#` suffix.
    pub fn bare_notation(&self) -> &str {
        self.notation.trim_end_matches(['+', '#'])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedGame {
    pub headers: PgnHeaders,
    pub moves: Vec<MoveEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_defaults() {
        let raw: RawGameRecord =
            serde_json::from_str(r#"{"url": "https://www.chess.com/game/live/1"}"#).unwrap();
        assert_eq!(raw.pgn, None);
        assert!(!raw.rated);
        assert_eq!(raw.time_control, "unknown");
        assert_eq!(raw.archive_url, None);
    }

    #[test]
    fn test_raw_record_ignores_extra_fields() {
        let raw: RawGameRecord = serde_json::from_str(
            r#"{"pgn": "1. e4 *", "rated": true, "time_control": "180+2", "url": "u", "tcn": "mC", "rules": "chess"}"#,
        )
        .unwrap();
        assert!(raw.rated);
        assert_eq!(raw.time_control, "180+2");
    }

    #[test]
    fn test_bare_notation() {
        let entry = MoveEntry {
            number: 5,
            notation: "Bb5+".to_string(),
            color: PlayerColor::White,
            piece: Some('B'),
            is_capture: false,
            is_check: true,
            fen: String::new(),
        };
        assert_eq!(entry.bare_notation(), "Bb5");
    }
}

//! Per-game classification: player side, result, opening, duration and a
//! heuristic quality score.

use std::collections::HashSet;

use chess_core::game_data::{MoveEntry, ParsedGame, PlayerColor, RawGameRecord};
use chess_core::openings::{self, CATALOG, OTHER_OPENING, UNDETERMINED};
use serde::{Deserialize, Serialize};

/// Half-moves inspected when naming the opening.
pub const OPENING_WINDOW: usize = 6;

/// Moves kept on a classified game.
pub const MAX_STORED_MOVES: usize = 50;

/// Characters of PGN text kept on a classified game.
pub const MAX_STORED_PGN_CHARS: usize = 1000;

const QUALITY_BASE: f64 = 5.0;
const DIVERSITY_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
    Incomplete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedGame {
    pub white_player: String,
    pub black_player: String,
    pub opponent: String,
    pub player_color: PlayerColor,
    pub result: String,
    pub player_result: GameResult,
    pub date: Option<String>,
    pub time_control: String,
    pub rated: bool,
    pub url: String,
    /// Display name of the detected opening.
    pub opening: String,
    /// Catalog key the game is grouped under in opening statistics.
    pub opening_key: String,
    pub moves: Vec<MoveEntry>,
    pub total_moves: usize,
    /// Estimated duration in minutes.
    pub game_duration: u32,
    pub game_quality: f64,
    pub pgn: String,
}

/// Classify one game from the target player's perspective.
///
/// Returns `None` when the game has no moves or the player sits on neither side.
pub fn classify(
    raw: &RawGameRecord,
    parsed: &ParsedGame,
    target_username: &str,
) -> Option<ClassifiedGame> {
    if parsed.moves.is_empty() {
        return None;
    }

    let headers = &parsed.headers;
    let username_lower = target_username.to_lowercase();
    let player_color = if headers.white.to_lowercase() == username_lower {
        PlayerColor::White
    } else if headers.black.to_lowercase() == username_lower {
        PlayerColor::Black
    } else {
        return None;
    };

    let opponent = match player_color {
        PlayerColor::White => headers.black.clone(),
        PlayerColor::Black => headers.white.clone(),
    };

    let moves = &parsed.moves;

    Some(ClassifiedGame {
        white_player: headers.white.clone(),
        black_player: headers.black.clone(),
        opponent,
        player_color,
        result: headers.result.clone(),
        player_result: player_result(&headers.result, player_color),
        date: headers.date.clone(),
        time_control: raw.time_control.clone(),
        rated: raw.rated,
        url: raw.url.clone(),
        opening: detect_opening(moves),
        opening_key: opening_key(moves),
        moves: moves.iter().take(MAX_STORED_MOVES).cloned().collect(),
        total_moves: moves.len(),
        game_duration: estimate_duration(moves.len()),
        game_quality: score_quality(moves),
        pgn: raw
            .pgn
            .as_deref()
            .map(|p| p.chars().take(MAX_STORED_PGN_CHARS).collect())
            .unwrap_or_default(),
    })
}

/// Name the opening from the first six half-moves.
///
/// Priority: catalog sequence anywhere in the window, then the two-move
/// pattern table, then the first-move default, then the generic sentinel.
/// Catalog keys match whole moves only, so "f4" never matches inside "Bf4".
pub fn detect_opening(moves: &[MoveEntry]) -> String {
    if moves.len() < 2 {
        return UNDETERMINED.to_string();
    }

    let window: Vec<&str> = moves
        .iter()
        .take(OPENING_WINDOW)
        .map(MoveEntry::bare_notation)
        .collect();

    for entry in CATALOG {
        let key: Vec<&str> = entry.key.split(' ').collect();
        if window.windows(key.len()).any(|w| w == key.as_slice()) {
            return entry.name.to_string();
        }
    }

    let (first, second) = (window[0], window[1]);
    openings::two_move_pattern(first, second)
        .or_else(|| openings::first_move_default(first))
        .unwrap_or(OTHER_OPENING)
        .to_string()
}

/// Catalog key used to group a game in opening statistics.
pub fn opening_key(moves: &[MoveEntry]) -> String {
    if moves.len() < 2 {
        return UNDETERMINED.to_string();
    }

    let first = moves[0].bare_notation();
    let second = moves[1].bare_notation();

    let exact = format!("{first} {second}");
    if openings::catalog_entry(&exact).is_some() {
        return exact;
    }

    // Catalog line opened by the same move whose text contains the reply
    if let Some(entry) = CATALOG
        .iter()
        .find(|e| e.key.split(' ').next() == Some(first) && e.key.contains(second))
    {
        return entry.key.to_string();
    }

    openings::first_move_group(first)
        .unwrap_or(OTHER_OPENING)
        .to_string()
}

/// Estimated wall-clock minutes for a game of `move_count` half-moves.
pub fn estimate_duration(move_count: usize) -> u32 {
    let moves = move_count as u64;
    let seconds_per_move = match move_count {
        0..=19 => 25,
        20..=39 => 45,
        40..=59 => 60,
        _ => 75,
    };

    let thinking_time = (moves * 10).min(600);
    let total_seconds = moves * seconds_per_move + thinking_time;
    (total_seconds / 60).max(1) as u32
}

/// Heuristic game quality in [0, 10], rounded to one decimal.
pub fn score_quality(moves: &[MoveEntry]) -> f64 {
    let mut score = QUALITY_BASE;

    let count = moves.len();
    if (25..=60).contains(&count) {
        score += 1.0;
    } else if count < 15 {
        score -= 1.5;
    } else if count > 80 {
        score -= 0.5;
    }

    let pieces: HashSet<char> = moves
        .iter()
        .take(DIVERSITY_WINDOW)
        .filter_map(|m| m.piece)
        .collect();
    if pieces.len() >= 4 {
        score += 0.5;
    }

    let captures = moves.iter().filter(|m| m.is_capture).count();
    let checks = moves.iter().filter(|m| m.is_check).count();
    if captures >= 3 {
        score += 0.3;
    }
    if checks >= 2 {
        score += 0.2;
    }

    ((score.clamp(0.0, 10.0)) * 10.0).round() / 10.0
}

/// Map a PGN result string onto the player's perspective.
pub fn player_result(raw_result: &str, color: PlayerColor) -> GameResult {
    match (raw_result, color) {
        ("1/2-1/2", _) => GameResult::Draw,
        ("1-0", PlayerColor::White) | ("0-1", PlayerColor::Black) => GameResult::Win,
        ("1-0", PlayerColor::Black) | ("0-1", PlayerColor::White) => GameResult::Loss,
        _ => GameResult::Incomplete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::pgn::parse_game;

    fn entry(notation: &str, piece: char, capture: bool, check: bool) -> MoveEntry {
        MoveEntry {
            number: 0,
            notation: notation.to_string(),
            color: PlayerColor::White,
            piece: Some(piece),
            is_capture: capture,
            is_check: check,
            fen: String::new(),
        }
    }

    fn line(notations: &[&str]) -> Vec<MoveEntry> {
        notations.iter().map(|n| entry(n, 'P', false, false)).collect()
    }

    #[test]
    fn test_estimate_duration_bands() {
        assert_eq!(estimate_duration(0), 1);
        assert_eq!(estimate_duration(1), 1); // 25 + 10 = 35s
        assert_eq!(estimate_duration(10), 5); // 250 + 100 = 350s
        assert_eq!(estimate_duration(19), 11); // 475 + 190 = 665s
        assert_eq!(estimate_duration(20), 18); // 900 + 200 = 1100s
        assert_eq!(estimate_duration(40), 46); // 2400 + 400 = 2800s
        assert_eq!(estimate_duration(60), 85); // 4500 + 600 = 5100s
        assert_eq!(estimate_duration(100), 135); // 7500 + 600 = 8100s
    }

    #[test]
    fn test_score_quality_rules() {
        // 30 moves, one piece kind, nothing else: 5.0 + 1.0
        let moves: Vec<MoveEntry> = (0..30).map(|_| entry("e4", 'P', false, false)).collect();
        assert_eq!(score_quality(&moves), 6.0);

        // Short game: 5.0 - 1.5
        let moves: Vec<MoveEntry> = (0..10).map(|_| entry("e4", 'P', false, false)).collect();
        assert_eq!(score_quality(&moves), 3.5);

        // Very long game: 5.0 - 0.5
        let moves: Vec<MoveEntry> = (0..90).map(|_| entry("e4", 'P', false, false)).collect();
        assert_eq!(score_quality(&moves), 4.5);

        // Diversity, captures and checks on a 30 move game
        let mut moves: Vec<MoveEntry> = ['P', 'p', 'N', 'n']
            .iter()
            .map(|&c| entry("x", c, true, true))
            .collect();
        moves.extend((0..26).map(|_| entry("e4", 'P', false, false)));
        assert_eq!(score_quality(&moves), 7.0);
    }

    #[test]
    fn test_score_quality_diversity_window() {
        // Distinct pieces only after move 20 do not count
        let mut moves: Vec<MoveEntry> = (0..20).map(|_| entry("e4", 'P', false, false)).collect();
        moves.extend(['N', 'B', 'R', 'Q'].iter().map(|&c| entry("x", c, false, false)));
        moves.extend((0..6).map(|_| entry("e4", 'P', false, false)));
        assert_eq!(moves.len(), 30);
        assert_eq!(score_quality(&moves), 6.0);
    }

    #[test]
    fn test_score_quality_empty() {
        assert_eq!(score_quality(&[]), 3.5);
    }

    #[test]
    fn test_player_result() {
        assert_eq!(player_result("1/2-1/2", PlayerColor::White), GameResult::Draw);
        assert_eq!(player_result("1-0", PlayerColor::White), GameResult::Win);
        assert_eq!(player_result("1-0", PlayerColor::Black), GameResult::Loss);
        assert_eq!(player_result("0-1", PlayerColor::Black), GameResult::Win);
        assert_eq!(player_result("0-1", PlayerColor::White), GameResult::Loss);
        assert_eq!(player_result("*", PlayerColor::White), GameResult::Incomplete);
    }

    #[test]
    fn test_detect_opening_priority() {
        assert_eq!(detect_opening(&line(&["e4"])), UNDETERMINED);
        assert_eq!(detect_opening(&line(&["e4", "c5", "Nf3"])), "Sicilian Defense");
        // Catalog match later in the window beats the two-move pattern
        assert_eq!(detect_opening(&line(&["Nf3", "Nf6", "c4"])), "English Opening");
        // Two-move pattern
        assert_eq!(detect_opening(&line(&["e4", "Nc6", "d4"])), "Nimzowitsch Defense");
        // First-move default
        assert_eq!(detect_opening(&line(&["b3", "e5", "Bb2"])), "Larsen's Opening");
        // Nothing matches
        assert_eq!(detect_opening(&line(&["a3", "a6", "h3"])), OTHER_OPENING);
    }

    #[test]
    fn test_detect_opening_whole_tokens_only() {
        // "Bc4" must not match the "c4" catalog key
        assert_eq!(
            detect_opening(&line(&["Nc3", "Nc6", "Bc4"])),
            "Van Geet Opening"
        );
        // a bishop on f4 is not Bird's Opening
        assert_eq!(
            detect_opening(&line(&["d4", "e6", "Bf4"])),
            "Queen's Pawn Opening"
        );
    }

    #[test]
    fn test_detect_opening_ignores_later_moves() {
        let a = line(&["d4", "Nf6", "Bf4", "e6", "e3", "b6", "Nd2"]);
        let b = line(&["d4", "Nf6", "Bf4", "e6", "e3", "b6", "h4", "h5"]);
        assert_eq!(detect_opening(&a), detect_opening(&b));
    }

    #[test]
    fn test_opening_key() {
        assert_eq!(opening_key(&line(&["e4", "c5"])), "e4 c5");
        assert_eq!(opening_key(&line(&["e4", "Nc6"])), "e4 e5");
        assert_eq!(opening_key(&line(&["c4", "e5"])), "c4");
        assert_eq!(opening_key(&line(&["d4", "f6"])), "d4 Nf6");
        assert_eq!(opening_key(&line(&["Nf3", "Nf6"])), "Nf3 d5");
        assert_eq!(opening_key(&line(&["b3", "e5"])), OTHER_OPENING);
        assert_eq!(opening_key(&line(&["b3"])), UNDETERMINED);
    }

    #[test]
    fn test_classify_from_pgn() {
        let pgn = r#"[White "Magnus"]
[Black "SomeOne"]
[Result "0-1"]
[Date "2024.03.09"]

1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6 0-1"#;
        let raw = RawGameRecord {
            pgn: Some(pgn.to_string()),
            rated: true,
            time_control: "600".to_string(),
            url: "https://www.chess.com/game/live/1".to_string(),
            archive_url: None,
        };
        let parsed = parse_game(raw.pgn.as_deref()).unwrap();
        let game = classify(&raw, &parsed, "someone").unwrap();

        assert_eq!(game.player_color, PlayerColor::Black);
        assert_eq!(game.opponent, "Magnus");
        assert_eq!(game.player_result, GameResult::Win);
        assert_eq!(game.opening, "Sicilian Defense");
        assert_eq!(game.opening_key, "e4 c5");
        assert_eq!(game.total_moves, 10);
        assert_eq!(game.game_duration, estimate_duration(10));
        assert!(game.rated);

        assert!(classify(&raw, &parsed, "nobody").is_none());
    }

    #[test]
    fn test_classify_truncates_moves_and_pgn() {
        let mut movetext = String::new();
        for i in 0..100 {
            let (w, b) = if i % 2 == 0 { ("Nf3", "Nf6") } else { ("Ng1", "Ng8") };
            movetext.push_str(&format!("{}. {} {} ", i + 1, w, b));
        }
        let pgn = format!(
            "[White \"x\"]\n[Black \"y\"]\n[Result \"1/2-1/2\"]\n\n{}1/2-1/2",
            movetext
        );
        let raw = RawGameRecord {
            pgn: Some(pgn),
            rated: false,
            time_control: "180".to_string(),
            url: String::new(),
            archive_url: None,
        };
        let parsed = parse_game(raw.pgn.as_deref()).unwrap();
        let game = classify(&raw, &parsed, "X").unwrap();

        assert_eq!(game.total_moves, 200);
        assert_eq!(game.moves.len(), MAX_STORED_MOVES);
        assert_eq!(game.pgn.chars().count(), MAX_STORED_PGN_CHARS);
        assert_eq!(game.player_result, GameResult::Draw);
    }
}

//! Integration tests: PGN text through parsing, classification and aggregation.

mod common;

use chess_core::game_data::PlayerColor;
use chess_core::pgn::parse_game;
use game_stats::aggregate::{normalize_time_control, TrendAnalysis};
use game_stats::classifier::{classify, ClassifiedGame, GameResult};
use game_stats::{advanced_analysis, basic_stats};
use insights_service::report::ExportSummary;

/// Game of exactly `half_moves` plies, shuffling knights.
fn shuffle_moves(half_moves: usize) -> String {
    const CYCLE: [&str; 4] = ["Nf3", "Nf6", "Ng1", "Ng8"];
    let mut text = String::new();
    for ply in 0..half_moves {
        if ply % 2 == 0 {
            text.push_str(&format!("{}. ", ply / 2 + 1));
        }
        text.push_str(CYCLE[ply % 4]);
        text.push(' ');
    }
    text
}

fn classified(white: &str, black: &str, result: &str, half_moves: usize) -> ClassifiedGame {
    let pgn = common::pgn(white, black, result, "2024.05.01", &shuffle_moves(half_moves));
    let raw = common::record(&pgn, "https://www.chess.com/game/live/1");
    let parsed = parse_game(raw.pgn.as_deref()).unwrap();
    classify(&raw, &parsed, "X").unwrap()
}

fn four_game_scenario() -> Vec<ClassifiedGame> {
    vec![
        classified("X", "a", "1-0", 30),
        classified("x", "b", "0-1", 15),
        classified("c", "X", "0-1", 45),
        classified("d", "X", "1/2-1/2", 60),
    ]
}

#[test]
fn test_four_game_summary() {
    let games = four_game_scenario();
    assert_eq!(games[0].player_color, PlayerColor::White);
    assert_eq!(games[1].player_result, GameResult::Loss);
    assert_eq!(games[2].player_result, GameResult::Win);
    assert_eq!(games[3].player_result, GameResult::Draw);
    assert_eq!(games[3].total_moves, 60);

    let stats = basic_stats(&games);
    assert_eq!(stats.total_games, 4);
    assert_eq!(stats.wins, 2);
    assert_eq!(stats.losses, 1);
    assert_eq!(stats.draws, 1);
    assert_eq!(stats.win_rate, 50.0);
}

#[test]
fn test_export_summary_matches_basic_stats() {
    let games = four_game_scenario();
    let summary = ExportSummary::of(&games);
    assert_eq!(summary.win_rate, basic_stats(&games).win_rate);
    assert_eq!(summary.total_losses, 1);
    assert_eq!(summary.total_draws, 1);

    let thirds = ExportSummary::of(&games[..3]);
    assert_eq!(thirds.win_rate, 33.3);
}

#[test]
fn test_color_counts_cover_every_game() {
    let mut games = four_game_scenario();
    games.push(classified("X", "e", "*", 10));

    let stats = advanced_analysis(&games);
    let white = stats.performance_by_color.white.results;
    let black = stats.performance_by_color.black.results;
    assert_eq!((white.total() + black.total()) as usize, games.len());
    assert_eq!(white.incomplete, 1);
}

#[test]
fn test_advanced_analysis_over_real_games() {
    let games = four_game_scenario();
    let stats = advanced_analysis(&games);

    // all four games open with Nf3 Nf6
    assert_eq!(games[0].opening, "Symmetrical Reti");
    assert_eq!(games[0].opening_key, "Nf3 d5");
    assert_eq!(stats.openings_analysis.as_white["Nf3 d5"].count, 2);
    assert_eq!(stats.openings_analysis.as_black["Nf3 d5"].count, 2);
    assert_eq!(stats.openings_analysis.total_openings_count, 1);

    assert_eq!(stats.time_control_analysis.len(), 1);
    assert_eq!(stats.time_control_analysis["Rapid"].games, 4);
    assert_eq!(stats.monthly_stats["2024-05"].games, 4);
    assert!(matches!(stats.trend_analysis, TrendAnalysis::InsufficientData { .. }));
    assert_eq!(stats.opponent_analysis.total_opponents, 4);
    assert!(stats.game_quality_analysis.is_some());
}

#[test]
fn test_time_control_scenarios() {
    assert_eq!(normalize_time_control("180"), "Blitz");
    assert_eq!(normalize_time_control("10+0"), "Rapid");
    assert_eq!(normalize_time_control("unknown_tc"), "unknown_tc");
}

#[test]
fn test_analysis_serializes_to_json() {
    let stats = advanced_analysis(&four_game_scenario());
    let value = serde_json::to_value(&stats).unwrap();
    assert_eq!(value["trend_analysis"]["status"], "insufficient_data");
    assert_eq!(value["performance_by_color"]["preferred_color"], "black");
    assert_eq!(value["openings_analysis"]["as_white"]["Nf3 d5"]["wins"], 1);
}

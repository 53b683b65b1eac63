//! Rule-based strengths, weaknesses and recommendations.

use std::collections::HashSet;

use chess_core::game_data::PlayerColor;
use serde::{Deserialize, Serialize};

use super::{percentage, round1};
use crate::classifier::{ClassifiedGame, GameResult};

pub const MAX_STRENGTHS: usize = 8;
pub const MAX_WEAKNESSES: usize = 8;
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Upper bounds (exclusive) of the short and medium game-length buckets.
const SHORT_GAME_MOVES: usize = 25;
const LONG_GAME_MOVES: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthBucket {
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameLengthAnalysis {
    pub short: LengthBucket,
    pub medium: LengthBucket,
    pub long: LengthBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub avg_game_quality: f64,
    pub white_performance: f64,
    pub black_performance: f64,
    pub opening_diversity: usize,
    pub rated_games_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthsWeaknesses {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub game_length_analysis: Option<GameLengthAnalysis>,
    pub detailed_analysis: Option<DetailedAnalysis>,
}

/// Unrounded bucket state; thresholds compare against the exact rate.
#[derive(Default)]
struct Bucket {
    games: u32,
    wins: u32,
}

impl Bucket {
    fn record(&mut self, game: &ClassifiedGame) {
        self.games += 1;
        if game.player_result == GameResult::Win {
            self.wins += 1;
        }
    }

    fn win_rate(&self) -> f64 {
        percentage(self.wins, self.games)
    }

    fn summary(&self) -> LengthBucket {
        LengthBucket {
            games: self.games,
            wins: self.wins,
            win_rate: round1(self.win_rate()),
        }
    }
}

fn insufficient_data() -> StrengthsWeaknesses {
    StrengthsWeaknesses {
        strengths: vec!["Not enough data to analyze".to_string()],
        weaknesses: vec!["More games are needed for an accurate analysis".to_string()],
        recommendations: vec!["Play more games to get a complete analysis".to_string()],
        game_length_analysis: None,
        detailed_analysis: None,
    }
}

pub fn identify_strengths_weaknesses(games: &[ClassifiedGame]) -> StrengthsWeaknesses {
    if games.is_empty() {
        return insufficient_data();
    }

    let mut short = Bucket::default();
    let mut medium = Bucket::default();
    let mut long = Bucket::default();
    let mut white = Bucket::default();
    let mut black = Bucket::default();
    let mut quality_sum = 0.0;
    let mut rated = 0;
    let mut openings: HashSet<&str> = HashSet::new();

    for game in games {
        match game.total_moves {
            n if n < SHORT_GAME_MOVES => short.record(game),
            n if n < LONG_GAME_MOVES => medium.record(game),
            _ => long.record(game),
        }
        match game.player_color {
            PlayerColor::White => white.record(game),
            PlayerColor::Black => black.record(game),
        }
        quality_sum += game.game_quality;
        if game.rated {
            rated += 1;
        }
        openings.insert(game.opening.as_str());
    }

    let mut strengths: Vec<&str> = Vec::new();
    let mut weaknesses: Vec<&str> = Vec::new();
    let mut recommendations: Vec<&str> = Vec::new();

    if short.win_rate() > 65.0 && short.games >= 3 {
        strengths.push("Excellent at quick tactics and short games");
        recommendations.push("Keep sharpening your tactical skills");
    }
    if medium.win_rate() > 60.0 && medium.games >= 5 {
        strengths.push("Strong performance in medium-length games");
        recommendations.push("Focus on improving middlegame planning");
    }
    if long.win_rate() > 55.0 && long.games >= 3 {
        strengths.push("Very capable in endgames");
        recommendations.push("Deepen your knowledge of complex endgames");
    }

    let white_rate = white.win_rate();
    if white_rate > 60.0 {
        strengths.push("Excellent results with the white pieces");
    } else if white_rate < 45.0 {
        weaknesses.push("Openings with the white pieces need work");
        recommendations.push("Study the main e4 and d4 openings");
    }

    let black_rate = black.win_rate();
    if black_rate > 50.0 {
        strengths.push("Solid, reliable defense with the black pieces");
    } else if black_rate < 35.0 {
        weaknesses.push("Defensive play with the black pieces needs work");
        recommendations.push("Learn solid defenses such as the French and the Caro-Kann");
    }

    let avg_quality = quality_sum / games.len() as f64;
    if avg_quality >= 7.0 {
        strengths.push("High overall game quality");
    } else if avg_quality <= 4.0 {
        weaknesses.push("Decision quality during games needs improvement");
        recommendations.push("Review your games and analyze the mistakes");
    }

    if strengths.is_empty() {
        strengths.push("Developing player with good potential");
    }
    if weaknesses.is_empty() {
        weaknesses.push("Fairly balanced performance in most areas");
    }
    if recommendations.is_empty() {
        recommendations.push("Keep playing and training regularly");
    }

    let owned = |list: Vec<&str>, cap: usize| -> Vec<String> {
        list.into_iter().take(cap).map(str::to_string).collect()
    };

    StrengthsWeaknesses {
        strengths: owned(strengths, MAX_STRENGTHS),
        weaknesses: owned(weaknesses, MAX_WEAKNESSES),
        recommendations: owned(recommendations, MAX_RECOMMENDATIONS),
        game_length_analysis: Some(GameLengthAnalysis {
            short: short.summary(),
            medium: medium.summary(),
            long: long.summary(),
        }),
        detailed_analysis: Some(DetailedAnalysis {
            avg_game_quality: round1(avg_quality),
            white_performance: round1(white_rate),
            black_performance: round1(black_rate),
            opening_diversity: openings.len(),
            rated_games_ratio: percentage(rated, games.len() as u32),
        }),
    }
}

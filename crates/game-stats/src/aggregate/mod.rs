//! Aggregate statistics over a collection of classified games.
//!
//! Every aggregate follows the same shape: a typed accumulator starting from
//! its zero value, a `record` fold over the games, and a finalize pass that
//! derives rates and averages.

pub mod color;
pub mod insights;
pub mod monthly;
pub mod openings;
pub mod opponents;
pub mod quality;
pub mod time_control;
pub mod trends;

use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifiedGame, GameResult};

pub use color::{analyze_by_color, ColorAnalysis, ColorStat};
pub use insights::{identify_strengths_weaknesses, StrengthsWeaknesses};
pub use monthly::{calculate_monthly_stats, month_key, MonthStat};
pub use openings::{analyze_openings, OpeningStat, OpeningsAnalysis, RankedOpening};
pub use opponents::{analyze_opponents, OpponentAnalysis, OpponentStat};
pub use quality::{analyze_game_quality, QualityAnalysis};
pub use time_control::{analyze_time_controls, normalize_time_control, TimeControlStat};
pub use trends::{analyze_trends, Confidence, TrendAnalysis, TrendLabel};

/// Win/loss/draw/incomplete counts shared by every accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub incomplete: u32,
}

impl ResultTally {
    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::Incomplete => self.incomplete += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws + self.incomplete
    }
}

/// Everything the advanced analysis computes over a player's games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedStats {
    pub openings_analysis: OpeningsAnalysis,
    pub performance_by_color: ColorAnalysis,
    pub time_control_analysis: std::collections::BTreeMap<String, TimeControlStat>,
    pub strengths_and_weaknesses: StrengthsWeaknesses,
    pub trend_analysis: TrendAnalysis,
    pub monthly_stats: std::collections::BTreeMap<String, MonthStat>,
    pub game_quality_analysis: Option<QualityAnalysis>,
    pub opponent_analysis: OpponentAnalysis,
}

/// Run every aggregate over `games`.
pub fn advanced_analysis(games: &[ClassifiedGame]) -> AdvancedStats {
    tracing::debug!(games = games.len(), "Running advanced aggregation");

    AdvancedStats {
        openings_analysis: analyze_openings(games),
        performance_by_color: analyze_by_color(games),
        time_control_analysis: analyze_time_controls(games),
        strengths_and_weaknesses: identify_strengths_weaknesses(games),
        trend_analysis: analyze_trends(games),
        monthly_stats: calculate_monthly_stats(games),
        game_quality_analysis: analyze_game_quality(games),
        opponent_analysis: analyze_opponents(games),
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole` as a percentage, 0 for an empty whole.
pub(crate) fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub(crate) fn average(total: f64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

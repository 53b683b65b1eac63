use serde::{Deserialize, Serialize};

use super::{percentage, round1};
use crate::classifier::{ClassifiedGame, GameResult};

/// Fewer games than this cannot show a trend.
pub const MIN_TREND_GAMES: usize = 5;

const MISSING_DATE: &str = "1900.01.01";
const NEUTRAL_WIN_RATE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    LargeImprovement,
    Improvement,
    SlightImprovement,
    Stable,
    SlightDecline,
    Decline,
    LargeDecline,
}

impl TrendLabel {
    /// Label for a change in win rate, in percentage points.
    pub fn from_delta(delta: f64) -> Self {
        if delta > 15.0 {
            TrendLabel::LargeImprovement
        } else if delta > 10.0 {
            TrendLabel::Improvement
        } else if delta > 5.0 {
            TrendLabel::SlightImprovement
        } else if delta > -5.0 {
            TrendLabel::Stable
        } else if delta > -10.0 {
            TrendLabel::SlightDecline
        } else if delta > -15.0 {
            TrendLabel::Decline
        } else {
            TrendLabel::LargeDecline
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TrendLabel::LargeImprovement => "Strong improvement",
            TrendLabel::Improvement => "Clear improvement",
            TrendLabel::SlightImprovement => "Slight improvement",
            TrendLabel::Stable => "Stable",
            TrendLabel::SlightDecline => "Slight decline",
            TrendLabel::Decline => "Clear decline",
            TrendLabel::LargeDecline => "Strong decline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn for_sample(games: usize) -> Self {
        match games {
            20.. => Confidence::High,
            10..=19 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendAnalysis {
    InsufficientData {
        message: String,
    },
    Trend {
        trend: TrendLabel,
        recent_win_rate: f64,
        older_win_rate: f64,
        improvement: f64,
        recent_games_count: usize,
        older_games_count: usize,
        confidence: Confidence,
    },
}

fn win_rate(games: &[&ClassifiedGame]) -> f64 {
    let wins = games
        .iter()
        .filter(|g| g.player_result == GameResult::Win)
        .count();
    percentage(wins as u32, games.len() as u32)
}

/// Compare the win rate of the most recent games against the earlier ones.
pub fn analyze_trends(games: &[ClassifiedGame]) -> TrendAnalysis {
    if games.len() < MIN_TREND_GAMES {
        return TrendAnalysis::InsufficientData {
            message: format!(
                "At least {MIN_TREND_GAMES} games are needed to analyze the trend"
            ),
        };
    }

    let mut sorted: Vec<&ClassifiedGame> = games.iter().collect();
    sorted.sort_by(|a, b| {
        let a = a.date.as_deref().unwrap_or(MISSING_DATE);
        let b = b.date.as_deref().unwrap_or(MISSING_DATE);
        a.cmp(b)
    });

    let total = sorted.len();
    let recent_len = MIN_TREND_GAMES.max(total / 2);
    let (older, recent) = sorted.split_at(total - recent_len);

    let recent_rate = win_rate(recent);
    let older_rate = if older.is_empty() {
        NEUTRAL_WIN_RATE
    } else {
        win_rate(older)
    };
    let delta = recent_rate - older_rate;

    TrendAnalysis::Trend {
        trend: TrendLabel::from_delta(delta),
        recent_win_rate: round1(recent_rate),
        older_win_rate: round1(older_rate),
        improvement: round1(delta),
        recent_games_count: recent.len(),
        older_games_count: older.len(),
        confidence: Confidence::for_sample(total),
    }
}

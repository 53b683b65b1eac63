//! Result shapes handed to the presentation layer.

use chrono::{DateTime, Utc};
use game_stats::aggregate::{ColorAnalysis, RankedOpening, TrendAnalysis};
use game_stats::{basic_stats, AdvancedStats, BasicStats, ClassifiedGame};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ANALYSIS_VERSION: &str = "3.1";

/// Games included in the advanced analysis preview.
pub const PREVIEW_GAMES: usize = 5;
/// Strengths and weaknesses included in the preview.
pub const PREVIEW_INSIGHTS: usize = 3;

/// Full output of an advanced analysis run, persisted whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub username: String,
    pub player_info: Value,
    pub player_stats: Option<Value>,
    pub games: Vec<ClassifiedGame>,
    pub advanced_stats: AdvancedStats,
    pub total_analyzed: usize,
    pub analysis_timestamp: DateTime<Utc>,
    pub analysis_version: String,
}

/// Public profile fields shown by the player search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub username: String,
    pub name: String,
    pub title: String,
    pub followers: u64,
    pub country: String,
    pub joined: Option<i64>,
    pub avatar: String,
    pub is_streamer: bool,
    pub status: String,
}

impl PlayerSummary {
    pub fn from_profile(requested: &str, profile: &Value) -> Self {
        let text = |key: &str| {
            profile
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            username: profile
                .get("username")
                .and_then(Value::as_str)
                .unwrap_or(requested)
                .to_string(),
            name: text("name"),
            title: text("title"),
            followers: profile.get("followers").and_then(Value::as_u64).unwrap_or(0),
            country: text("country"),
            joined: profile.get("joined").and_then(Value::as_i64),
            avatar: text("avatar"),
            is_streamer: profile
                .get("is_streamer")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            status: profile
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("basic")
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicAnalysis {
    pub username: String,
    pub player_info: Value,
    pub games: Vec<ClassifiedGame>,
    pub stats: BasicStats,
}

/// Handle to a stored advanced analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRef {
    pub analysis_id: String,
    pub username: String,
    pub total_analyzed: usize,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPreview {
    pub games: Vec<ClassifiedGame>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub trend: TrendAnalysis,
}

impl AnalysisPreview {
    pub fn of(result: &AnalysisResult) -> Self {
        let insights = &result.advanced_stats.strengths_and_weaknesses;
        let first = |list: &[String]| list.iter().take(PREVIEW_INSIGHTS).cloned().collect();
        Self {
            games: result.games.iter().take(PREVIEW_GAMES).cloned().collect(),
            strengths: first(&insights.strengths),
            weaknesses: first(&insights.weaknesses),
            trend: result.advanced_stats.trend_analysis.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedAnalysisResponse {
    pub analysis: AnalysisRef,
    pub preview: AnalysisPreview,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub win_rate: f64,
    pub total_wins: u32,
    pub total_losses: u32,
    pub total_draws: u32,
}

impl ExportSummary {
    pub fn of(games: &[ClassifiedGame]) -> Self {
        let stats = basic_stats(games);
        Self {
            win_rate: stats.win_rate,
            total_wins: stats.wins,
            total_losses: stats.losses,
            total_draws: stats.draws,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningsSummary {
    pub total_openings: usize,
    pub best_as_white: Option<RankedOpening>,
    pub best_as_black: Option<RankedOpening>,
}

/// Condensed, shareable form of a stored analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
    pub player: String,
    pub analysis_date: DateTime<Utc>,
    pub total_games: usize,
    pub export_version: String,
    pub summary: ExportSummary,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub performance_by_color: ColorAnalysis,
    pub trends: TrendAnalysis,
    pub openings_summary: OpeningsSummary,
    pub filename_suggestion: String,
}

impl ExportReport {
    pub fn of(result: &AnalysisResult, now: DateTime<Utc>) -> Self {
        let stats = &result.advanced_stats;
        let insights = &stats.strengths_and_weaknesses;
        Self {
            player: result.username.clone(),
            analysis_date: now,
            total_games: result.total_analyzed,
            export_version: ANALYSIS_VERSION.to_string(),
            summary: ExportSummary::of(&result.games),
            strengths: insights.strengths.clone(),
            weaknesses: insights.weaknesses.clone(),
            recommendations: insights.recommendations.clone(),
            performance_by_color: stats.performance_by_color.clone(),
            trends: stats.trend_analysis.clone(),
            openings_summary: OpeningsSummary {
                total_openings: stats.openings_analysis.total_openings_count,
                best_as_white: stats.openings_analysis.best_as_white.clone(),
                best_as_black: stats.openings_analysis.best_as_black.clone(),
            },
            filename_suggestion: format!(
                "chess-analysis-{}-{}.json",
                result.username,
                now.format("%Y%m%d")
            ),
        }
    }
}

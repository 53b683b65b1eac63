//! The analysis operations exposed to callers: player search, basic and
//! advanced analysis, and access to stored results.

use chrono::{DateTime, Utc};
use game_stats::{advanced_analysis, basic_stats, ClassifiedGame};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::clients::ChessDataSource;
use crate::error::AnalysisError;
use crate::fetcher::ArchiveFetcher;
use crate::report::{
    AdvancedAnalysisResponse, AnalysisPreview, AnalysisRef, AnalysisResult, BasicAnalysis,
    ExportReport, PlayerSummary, ANALYSIS_VERSION,
};
use crate::store::{AnalysisStore, StoreInfo};

pub const MIN_USERNAME_LEN: usize = 3;

/// Trimmed username, or the reason it cannot be used.
pub fn validate_username(raw: &str) -> Result<String, AnalysisError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AnalysisError::UsernameRequired);
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AnalysisError::UsernameTooShort);
    }
    Ok(username.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub analysis_id: Option<String>,
    pub has_advanced_analysis: bool,
    pub advanced_analysis_username: Option<String>,
    pub advanced_analysis_games: usize,
    pub analysis_expires_at: Option<DateTime<Utc>>,
    pub storage_files: usize,
    pub storage_size_mb: f64,
    pub timestamp: DateTime<Utc>,
}

pub struct InsightsService<S> {
    source: S,
    fetcher: ArchiveFetcher,
    store: AnalysisStore,
}

impl<S: ChessDataSource> InsightsService<S> {
    pub fn new(source: S, fetcher: ArchiveFetcher, store: AnalysisStore) -> Self {
        Self {
            source,
            fetcher,
            store,
        }
    }

    pub fn store(&self) -> &AnalysisStore {
        &self.store
    }

    /// Profile lookup; source failures read as "not found".
    async fn profile(&self, username: &str) -> Option<Value> {
        match self.source.player_profile(username).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(username = %username, "Player lookup failed: {e}");
                None
            }
        }
    }

    async fn games(
        &self,
        username: &str,
        max_games: usize,
    ) -> Result<Vec<ClassifiedGame>, AnalysisError> {
        let games = match self
            .fetcher
            .fetch_recent_games(&self.source, username, max_games)
            .await
        {
            Ok(games) => games,
            Err(e) => {
                warn!(username = %username, "Game fetch failed: {e}");
                Vec::new()
            }
        };

        if games.is_empty() {
            return Err(AnalysisError::NoGamesFound);
        }
        Ok(games)
    }

    pub async fn player_search(&self, username: &str) -> Result<PlayerSummary, AnalysisError> {
        let username = validate_username(username)?;
        let profile = self
            .profile(&username)
            .await
            .ok_or_else(|| AnalysisError::PlayerNotFound(username.clone()))?;
        Ok(PlayerSummary::from_profile(&username, &profile))
    }

    pub async fn basic_analysis(
        &self,
        username: &str,
        max_games: usize,
    ) -> Result<BasicAnalysis, AnalysisError> {
        let username = validate_username(username)?;
        info!(username = %username, max_games, "Starting basic analysis");

        let player_info = self
            .profile(&username)
            .await
            .ok_or_else(|| AnalysisError::PlayerNotFound(username.clone()))?;
        let games = self.games(&username, max_games).await?;
        let stats = basic_stats(&games);

        info!(username = %username, games = games.len(), "Basic analysis complete");
        Ok(BasicAnalysis {
            username,
            player_info,
            games,
            stats,
        })
    }

    /// Run the full analysis, store it and return a handle plus a preview.
    pub async fn advanced_analysis(
        &self,
        username: &str,
        max_games: usize,
    ) -> Result<AdvancedAnalysisResponse, AnalysisError> {
        let username = validate_username(username)?;
        info!(username = %username, max_games, "Starting advanced analysis");

        let player_info = self
            .profile(&username)
            .await
            .ok_or_else(|| AnalysisError::PlayerNotFound(username.clone()))?;

        let player_stats = match self.source.player_stats(&username).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(username = %username, "Player stats unavailable: {e}");
                None
            }
        };

        let games = self.games(&username, max_games).await?;
        info!(username = %username, games = games.len(), "Aggregating games");

        let result = AnalysisResult {
            advanced_stats: advanced_analysis(&games),
            total_analyzed: games.len(),
            username,
            player_info,
            player_stats,
            games,
            analysis_timestamp: Utc::now(),
            analysis_version: ANALYSIS_VERSION.to_string(),
        };

        let stored = self.store.save(&result).map_err(AnalysisError::SaveFailed)?;
        info!(analysis_id = %stored.analysis_id, "Advanced analysis complete");

        Ok(AdvancedAnalysisResponse {
            analysis: AnalysisRef {
                analysis_id: stored.analysis_id,
                username: result.username.clone(),
                total_analyzed: result.total_analyzed,
                created_at: stored.created_at,
                expires_at: stored.expires_at,
            },
            preview: AnalysisPreview::of(&result),
        })
    }

    pub fn load(&self, analysis_id: &str) -> Result<AnalysisResult, AnalysisError> {
        self.store
            .load(analysis_id)
            .map(|entry| entry.analysis)
            .ok_or(AnalysisError::AnalysisNotFound)
    }

    pub fn export(&self, analysis_id: &str) -> Result<ExportReport, AnalysisError> {
        let result = self.load(analysis_id)?;
        Ok(ExportReport::of(&result, Utc::now()))
    }

    /// State of the store and, if given, of one stored analysis.
    pub fn status(&self, analysis_id: Option<&str>) -> StatusReport {
        let entry = analysis_id.and_then(|id| self.store.load(id));
        let info = self.store.info().unwrap_or_else(|e| {
            warn!("Failed to read store info: {e}");
            StoreInfo::default()
        });

        StatusReport {
            analysis_id: analysis_id.map(str::to_string),
            has_advanced_analysis: entry.is_some(),
            advanced_analysis_username: entry.as_ref().map(|e| e.analysis.username.clone()),
            advanced_analysis_games: entry.as_ref().map_or(0, |e| e.analysis.total_analyzed),
            analysis_expires_at: entry.as_ref().map(|e| e.expires_at),
            storage_files: info.entry_count,
            storage_size_mb: info.size_mb(),
            timestamp: Utc::now(),
        }
    }
}

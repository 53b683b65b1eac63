//! Walks a player's monthly archives newest-first and classifies games until
//! enough have been collected.

use std::time::Duration;

use chess_core::game_data::RawGameRecord;
use chess_core::pgn::parse_game;
use game_stats::classifier::{classify, ClassifiedGame};
use tracing::{debug, info, warn};

use crate::clients::ChessDataSource;
use crate::config::Config;
use crate::error::FetchError;

#[derive(Clone, Debug)]
pub struct ArchiveFetcher {
    page_delay: Duration,
    max_pages: usize,
}

impl ArchiveFetcher {
    pub fn new(page_delay: Duration, max_pages: usize) -> Self {
        Self {
            page_delay,
            max_pages,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.page_delay, config.max_archive_pages)
    }

    /// Collect up to `max_games` classified games for `username`.
    ///
    /// Only a missing or unreadable archive index fails the fetch. Pages that
    /// cannot be retrieved and games that cannot be parsed are skipped.
    pub async fn fetch_recent_games<S: ChessDataSource>(
        &self,
        source: &S,
        username: &str,
        max_games: usize,
    ) -> Result<Vec<ClassifiedGame>, FetchError> {
        let archives = source
            .archive_index(username)
            .await
            .map_err(FetchError::IndexUnavailable)?;

        if archives.is_empty() {
            return Err(FetchError::NoArchives);
        }

        let pages = archives.len().min(self.max_pages);
        info!(username, archives = archives.len(), pages, "Fetching recent archives");

        let mut games = Vec::new();
        for (i, archive_url) in archives.iter().rev().take(self.max_pages).enumerate() {
            if games.len() >= max_games {
                break;
            }

            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            debug!(page = i + 1, pages, archive = %archive_url, "Fetching archive page");
            let records = match source.archive_page(archive_url).await {
                Ok(records) => records,
                Err(e) => {
                    warn!(archive = %archive_url, "Skipping archive page: {e}");
                    continue;
                }
            };

            for raw in records.iter().rev() {
                if games.len() >= max_games {
                    break;
                }
                if let Some(game) = classify_record(raw, username) {
                    games.push(game);
                    if games.len() % 5 == 0 {
                        debug!(processed = games.len(), max_games, "Classification progress");
                    }
                }
            }
        }

        info!(username, games = games.len(), "Finished fetching games");
        Ok(games)
    }
}

/// Parse and classify one record, logging why it was dropped.
pub fn classify_record(raw: &RawGameRecord, username: &str) -> Option<ClassifiedGame> {
    let parsed = match parse_game(raw.pgn.as_deref()) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(url = %raw.url, "Skipping game: {e}");
            return None;
        }
    };

    let game = classify(raw, &parsed, username);
    if game.is_none() {
        debug!(url = %raw.url, "Skipping game without moves or without the player");
    }
    game
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use chess_core::game_data::RawGameRecord;
use insights_service::error::SourceError;
use insights_service::ChessDataSource;
use serde_json::{json, Value};

/// Generate a unique suffix based on timestamp + random bits to avoid collisions.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}_{}", std::process::id(), ts % 1_000_000_000)
}

/// Fresh, empty directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}_{}", unique_suffix()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// PGN for a short game between `white` and `black`.
pub fn pgn(white: &str, black: &str, result: &str, date: &str, moves: &str) -> String {
    format!(
        "[Event \"Live Chess\"]\n[White \"{white}\"]\n[Black \"{black}\"]\n[Result \"{result}\"]\n[Date \"{date}\"]\n\n{moves} {result}"
    )
}

pub fn record(pgn: &str, url: &str) -> RawGameRecord {
    RawGameRecord {
        pgn: Some(pgn.to_string()),
        rated: true,
        time_control: "600".to_string(),
        url: url.to_string(),
        archive_url: None,
    }
}

/// A won game for `player` as white.
pub fn white_win(player: &str, n: usize) -> RawGameRecord {
    record(
        &pgn(player, "opponent", "1-0", "2024.05.01", "1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7#"),
        &format!("https://www.chess.com/game/live/{n}"),
    )
}

pub fn archive_url(month: usize) -> String {
    format!("https://api.test/pub/player/tester/games/2024/{month:02}")
}

/// In-memory data source. Pages missing from `pages` fail with a status error.
#[derive(Default)]
pub struct FakeSource {
    pub profile: Option<Value>,
    pub index: Option<Vec<String>>,
    pub pages: HashMap<String, Vec<RawGameRecord>>,
    pub requested_pages: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_pages(pages: Vec<(String, Vec<RawGameRecord>)>) -> Self {
        Self {
            profile: Some(json!({"username": "tester", "followers": 3})),
            index: Some(pages.iter().map(|(url, _)| url.clone()).collect()),
            pages: pages.into_iter().collect(),
            requested_pages: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested_pages.lock().unwrap().clone()
    }
}

impl ChessDataSource for FakeSource {
    async fn player_profile(&self, _username: &str) -> Result<Option<Value>, SourceError> {
        Ok(self.profile.clone())
    }

    async fn player_stats(&self, _username: &str) -> Result<Option<Value>, SourceError> {
        Err(SourceError::Timeout("stats".to_string()))
    }

    async fn archive_index(&self, _username: &str) -> Result<Vec<String>, SourceError> {
        self.index.clone().ok_or(SourceError::Status {
            status: 500,
            url: "index".to_string(),
        })
    }

    async fn archive_page(&self, archive_url: &str) -> Result<Vec<RawGameRecord>, SourceError> {
        self.requested_pages
            .lock()
            .unwrap()
            .push(archive_url.to_string());
        self.pages
            .get(archive_url)
            .cloned()
            .ok_or(SourceError::Status {
                status: 503,
                url: archive_url.to_string(),
            })
    }
}

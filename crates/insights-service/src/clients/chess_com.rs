use chess_core::game_data::RawGameRecord;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::ChessDataSource;
use crate::config::Config;
use crate::error::SourceError;

#[derive(Deserialize)]
struct ArchiveIndex {
    #[serde(default)]
    archives: Vec<String>,
}

#[derive(Deserialize)]
struct ArchivePage {
    #[serde(default)]
    games: Vec<Value>,
}

/// Client for the Chess.com public API.
pub struct ChessComClient {
    client: Client,
    base_url: String,
}

impl ChessComClient {
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn player_url(&self, username: &str, suffix: &str) -> String {
        format!("{}/player/{}{}", self.base_url, username.to_lowercase(), suffix)
    }

    /// GET `url` and decode the body; a 404 is `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, SourceError> {
        let resp = self.client.get(url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            return Err(SourceError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| SourceError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

impl ChessDataSource for ChessComClient {
    async fn player_profile(&self, username: &str) -> Result<Option<Value>, SourceError> {
        self.get_json(&self.player_url(username, "")).await
    }

    async fn player_stats(&self, username: &str) -> Result<Option<Value>, SourceError> {
        self.get_json(&self.player_url(username, "/stats")).await
    }

    async fn archive_index(&self, username: &str) -> Result<Vec<String>, SourceError> {
        let index: Option<ArchiveIndex> = self
            .get_json(&self.player_url(username, "/games/archives"))
            .await?;
        Ok(index.map(|i| i.archives).unwrap_or_default())
    }

    async fn archive_page(&self, archive_url: &str) -> Result<Vec<RawGameRecord>, SourceError> {
        let Some(page) = self.get_json::<ArchivePage>(archive_url).await? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(page.games.len());
        for game in page.games {
            match serde_json::from_value::<RawGameRecord>(game) {
                Ok(mut record) => {
                    record.archive_url = Some(archive_url.to_string());
                    records.push(record);
                }
                Err(e) => tracing::warn!(archive = archive_url, "Skipping malformed game record: {e}"),
            }
        }
        Ok(records)
    }
}

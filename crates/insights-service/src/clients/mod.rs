pub mod chess_com;

use chess_core::game_data::RawGameRecord;
use serde_json::Value;

use crate::error::SourceError;

/// Read access to a remote game database.
///
/// `Ok(None)` means the resource does not exist; errors mean it could not be
/// retrieved.
#[allow(async_fn_in_trait)]
pub trait ChessDataSource {
    async fn player_profile(&self, username: &str) -> Result<Option<Value>, SourceError>;

    async fn player_stats(&self, username: &str) -> Result<Option<Value>, SourceError>;

    /// Monthly archive URLs, oldest first.
    async fn archive_index(&self, username: &str) -> Result<Vec<String>, SourceError>;

    async fn archive_page(&self, archive_url: &str) -> Result<Vec<RawGameRecord>, SourceError>;
}

//! Error types for fetching, caching and running analyses

use thiserror::Error;

/// A remote call that could not produce usable data.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout(e.to_string())
        } else {
            SourceError::Transport(e.to_string())
        }
    }
}

/// Failure of a whole archive fetch. Individual page and game failures are
/// skipped and never surface here.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("archive index unavailable: {0}")]
    IndexUnavailable(#[source] SourceError),

    #[error("player has no game archives")]
    NoArchives,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid analysis id: {0:?}")]
    InvalidId(String),
}

/// User-facing failures of the analysis operations.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Please enter a username")]
    UsernameRequired,

    #[error("Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("Player \"{0}\" not found. Check the spelling.")]
    PlayerNotFound(String),

    #[error("No games found for this player")]
    NoGamesFound,

    #[error("Failed to save analysis results")]
    SaveFailed(#[source] StoreError),

    #[error("Analysis not found or expired. Run the advanced analysis again.")]
    AnalysisNotFound,
}

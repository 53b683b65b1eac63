use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.chess.com/pub";
pub const DEFAULT_USER_AGENT: &str = "ChessInsights/3.1";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the Chess.com public API, without trailing slash
    pub api_base: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Pause before each archive page request
    pub page_delay: Duration,
    pub max_archive_pages: usize,
    pub store_dir: PathBuf,
    pub store_ttl: Duration,
    pub sweep_interval: Duration,
    pub basic_max_games: usize,
    pub advanced_max_games: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(20),
            page_delay: Duration::from_millis(500),
            max_archive_pages: 6,
            store_dir: PathBuf::from("temp_analysis"),
            store_ttl: Duration::from_secs(4 * 60 * 60),
            sweep_interval: Duration::from_secs(60 * 60),
            basic_max_games: 20,
            advanced_max_games: 50,
        }
    }
}

fn parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Read configuration from the environment, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: env::var("CHESS_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            user_agent: env::var("CHESS_API_USER_AGENT").unwrap_or(defaults.user_agent),
            request_timeout: parsed("REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            page_delay: parsed("PAGE_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.page_delay),
            max_archive_pages: parsed("MAX_ARCHIVE_PAGES").unwrap_or(defaults.max_archive_pages),
            store_dir: env::var("STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            store_ttl: parsed("STORE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.store_ttl),
            sweep_interval: parsed("SWEEP_INTERVAL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            basic_max_games: parsed("BASIC_MAX_GAMES").unwrap_or(defaults.basic_max_games),
            advanced_max_games: parsed("ADVANCED_MAX_GAMES").unwrap_or(defaults.advanced_max_games),
        }
    }
}

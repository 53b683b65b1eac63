//! Fetching, caching and serving player game analyses.

pub mod clients;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod report;
pub mod service;
pub mod store;
pub mod sweeper;

pub use clients::chess_com::ChessComClient;
pub use clients::ChessDataSource;
pub use config::Config;
pub use fetcher::ArchiveFetcher;
pub use service::InsightsService;
pub use store::AnalysisStore;

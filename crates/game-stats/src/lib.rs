//! Per-game classification and the statistics computed over a player's
//! classified games.

pub mod aggregate;
pub mod classifier;
pub mod summary;

pub use aggregate::{advanced_analysis, AdvancedStats};
pub use classifier::{classify, ClassifiedGame, GameResult};
pub use summary::{basic_stats, BasicStats};

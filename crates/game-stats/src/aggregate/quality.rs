use serde::{Deserialize, Serialize};

use super::round1;
use crate::classifier::ClassifiedGame;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityDistribution {
    pub excellent: u32,
    pub good: u32,
    pub average: u32,
    pub poor: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAnalysis {
    pub average_quality: f64,
    pub high_quality_games: u32,
    pub low_quality_games: u32,
    pub quality_distribution: QualityDistribution,
}

/// `None` for an empty collection.
pub fn analyze_game_quality(games: &[ClassifiedGame]) -> Option<QualityAnalysis> {
    if games.is_empty() {
        return None;
    }

    let mut sum = 0.0;
    let mut high = 0;
    let mut low = 0;
    let mut dist = QualityDistribution::default();

    for q in games.iter().map(|g| g.game_quality) {
        sum += q;
        if q >= 7.0 {
            high += 1;
        }
        if q <= 4.0 {
            low += 1;
            dist.poor += 1;
        } else if q >= 8.0 {
            dist.excellent += 1;
        } else if q >= 6.0 {
            dist.good += 1;
        } else {
            dist.average += 1;
        }
    }

    Some(QualityAnalysis {
        average_quality: round1(sum / games.len() as f64),
        high_quality_games: high,
        low_quality_games: low,
        quality_distribution: dist,
    })
}

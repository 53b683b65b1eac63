use std::cmp::Ordering;
use std::collections::BTreeMap;

use chess_core::game_data::PlayerColor;
use chess_core::openings::{self, OpeningInfo};
use serde::{Deserialize, Serialize};

use super::{average, percentage, round1, ResultTally};
use crate::classifier::ClassifiedGame;

/// Openings played fewer times than this are not ranked.
pub const MIN_RANKED_GAMES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningStat {
    pub info: OpeningInfo,
    pub count: u32,
    #[serde(flatten)]
    pub results: ResultTally,
    pub total_moves: u64,
    pub quality_sum: f64,
    pub win_rate: f64,
    pub avg_moves: f64,
    pub avg_quality: f64,
}

impl OpeningStat {
    pub fn new(info: OpeningInfo) -> Self {
        Self {
            info,
            count: 0,
            results: ResultTally::default(),
            total_moves: 0,
            quality_sum: 0.0,
            win_rate: 0.0,
            avg_moves: 0.0,
            avg_quality: 0.0,
        }
    }

    pub fn record(&mut self, game: &ClassifiedGame) {
        self.count += 1;
        self.results.record(game.player_result);
        self.total_moves += game.total_moves as u64;
        self.quality_sum += game.game_quality;
    }

    pub fn finalize(&mut self) {
        self.win_rate = round1(percentage(self.results.wins, self.count));
        self.avg_moves = round1(average(self.total_moves as f64, self.count));
        self.avg_quality = round1(average(self.quality_sum, self.count));
    }
}

/// An opening key together with its statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOpening {
    pub key: String,
    pub stat: OpeningStat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningsAnalysis {
    pub as_white: BTreeMap<String, OpeningStat>,
    pub as_black: BTreeMap<String, OpeningStat>,
    pub best_as_white: Option<RankedOpening>,
    pub worst_as_white: Option<RankedOpening>,
    pub best_as_black: Option<RankedOpening>,
    pub worst_as_black: Option<RankedOpening>,
    pub total_openings_count: usize,
    pub diversity_score: f64,
}

/// Orders openings by win rate, then average quality.
fn compare_performance(a: &OpeningStat, b: &OpeningStat) -> Ordering {
    a.win_rate
        .total_cmp(&b.win_rate)
        .then(a.avg_quality.total_cmp(&b.avg_quality))
}

/// Best and worst openings among those played at least twice.
///
/// Ties keep the earlier key.
fn best_and_worst(
    stats: &BTreeMap<String, OpeningStat>,
) -> (Option<RankedOpening>, Option<RankedOpening>) {
    let mut best: Option<(&String, &OpeningStat)> = None;
    let mut worst: Option<(&String, &OpeningStat)> = None;

    for (key, stat) in stats.iter().filter(|(_, s)| s.count >= MIN_RANKED_GAMES) {
        if best.is_none_or(|(_, b)| compare_performance(stat, b) == Ordering::Greater) {
            best = Some((key, stat));
        }
        if worst.is_none_or(|(_, w)| compare_performance(stat, w) == Ordering::Less) {
            worst = Some((key, stat));
        }
    }

    let ranked = |entry: Option<(&String, &OpeningStat)>| {
        entry.map(|(key, stat)| RankedOpening {
            key: key.clone(),
            stat: stat.clone(),
        })
    };
    (ranked(best), ranked(worst))
}

/// Distinct openings per game, averaged over both colors and scaled to 10.
fn diversity_score(
    as_white: &BTreeMap<String, OpeningStat>,
    as_black: &BTreeMap<String, OpeningStat>,
) -> f64 {
    let games = |m: &BTreeMap<String, OpeningStat>| m.values().map(|s| s.count).sum::<u32>();
    let (white_games, black_games) = (games(as_white), games(as_black));
    if white_games == 0 && black_games == 0 {
        return 0.0;
    }

    let white = as_white.len() as f64 / white_games.max(1) as f64 * 10.0;
    let black = as_black.len() as f64 / black_games.max(1) as f64 * 10.0;
    round1((white + black) / 2.0)
}

pub fn analyze_openings(games: &[ClassifiedGame]) -> OpeningsAnalysis {
    let mut as_white: BTreeMap<String, OpeningStat> = BTreeMap::new();
    let mut as_black: BTreeMap<String, OpeningStat> = BTreeMap::new();

    for game in games {
        let target = match game.player_color {
            PlayerColor::White => &mut as_white,
            PlayerColor::Black => &mut as_black,
        };
        target
            .entry(game.opening_key.clone())
            .or_insert_with(|| OpeningStat::new(openings::lookup(&game.opening_key, &game.opening)))
            .record(game);
    }

    for stat in as_white.values_mut().chain(as_black.values_mut()) {
        stat.finalize();
    }

    let (best_as_white, worst_as_white) = best_and_worst(&as_white);
    let (best_as_black, worst_as_black) = best_and_worst(&as_black);

    let total_openings_count = as_white
        .keys()
        .chain(as_black.keys().filter(|k| !as_white.contains_key(*k)))
        .count();

    OpeningsAnalysis {
        diversity_score: diversity_score(&as_white, &as_black),
        best_as_white,
        worst_as_white,
        best_as_black,
        worst_as_black,
        total_openings_count,
        as_white,
        as_black,
    }
}

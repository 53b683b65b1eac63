use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{average, percentage, round1, ResultTally};
use crate::classifier::ClassifiedGame;

/// Opponents listed in the analysis, in order of first appearance.
pub const MAX_LISTED_OPPONENTS: usize = 20;

/// Opponents met fewer times than this are not ranked.
pub const MIN_FREQUENT_GAMES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentStat {
    pub opponent: String,
    pub games: u32,
    #[serde(flatten)]
    pub results: ResultTally,
    pub total_moves: u64,
    pub win_rate: f64,
    pub avg_game_length: f64,
}

impl OpponentStat {
    fn new(opponent: &str) -> Self {
        Self {
            opponent: opponent.to_string(),
            games: 0,
            results: ResultTally::default(),
            total_moves: 0,
            win_rate: 0.0,
            avg_game_length: 0.0,
        }
    }

    pub fn record(&mut self, game: &ClassifiedGame) {
        self.games += 1;
        self.results.record(game.player_result);
        self.total_moves += game.total_moves as u64;
    }

    pub fn finalize(&mut self) {
        self.win_rate = round1(percentage(self.results.wins, self.games));
        self.avg_game_length = round1(average(self.total_moves as f64, self.games));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentAnalysis {
    pub total_opponents: usize,
    pub frequent_opponents: usize,
    pub toughest_opponent: Option<OpponentStat>,
    pub easiest_opponent: Option<OpponentStat>,
    pub opponent_stats: Vec<OpponentStat>,
}

pub fn analyze_opponents(games: &[ClassifiedGame]) -> OpponentAnalysis {
    let mut stats: Vec<OpponentStat> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for game in games {
        let slot = *index.entry(game.opponent.as_str()).or_insert_with(|| {
            stats.push(OpponentStat::new(&game.opponent));
            stats.len() - 1
        });
        stats[slot].record(game);
    }
    for stat in &mut stats {
        stat.finalize();
    }

    let mut toughest: Option<&OpponentStat> = None;
    let mut easiest: Option<&OpponentStat> = None;
    let mut frequent_opponents = 0;
    for stat in stats.iter().filter(|s| s.games >= MIN_FREQUENT_GAMES) {
        frequent_opponents += 1;
        if toughest.is_none_or(|t| stat.win_rate < t.win_rate) {
            toughest = Some(stat);
        }
        if easiest.is_none_or(|e| stat.win_rate > e.win_rate) {
            easiest = Some(stat);
        }
    }

    OpponentAnalysis {
        total_opponents: stats.len(),
        frequent_opponents,
        toughest_opponent: toughest.cloned(),
        easiest_opponent: easiest.cloned(),
        opponent_stats: stats.into_iter().take(MAX_LISTED_OPPONENTS).collect(),
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{average, percentage, round1, ResultTally};
use crate::classifier::ClassifiedGame;

pub const BULLET: &str = "Bullet";
pub const BLITZ: &str = "Blitz";
pub const RAPID: &str = "Rapid";
pub const DAILY: &str = "Daily";

/// Category tokens, tested in order. Numeric tokens only match where they
/// are not part of a longer number.
const CATEGORIES: &[(&str, &[&str])] = &[
    (BULLET, &["bullet", "60", "1+0"]),
    (BLITZ, &["blitz", "180", "3+0", "5+0"]),
    (RAPID, &["rapid", "600", "10+0", "15+"]),
    (DAILY, &["daily", "correspondence"]),
];

fn contains_token(haystack: &str, token: &str) -> bool {
    let numeric = token.starts_with(|c: char| c.is_ascii_digit());
    haystack.match_indices(token).any(|(start, _)| {
        if !numeric {
            return true;
        }
        let end = start + token.len();
        let digit_before = haystack[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit());
        let digit_after = !token.ends_with('+')
            && haystack[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit());
        !digit_before && !digit_after
    })
}

/// Map a raw time-control string onto Bullet/Blitz/Rapid/Daily.
///
/// Strings matching no category are returned unchanged.
pub fn normalize_time_control(time_control: &str) -> String {
    let lower = time_control.to_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|t| contains_token(&lower, t)))
        .map(|(name, _)| (*name).to_string())
        .unwrap_or_else(|| time_control.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeControlStat {
    pub games: u32,
    #[serde(flatten)]
    pub results: ResultTally,
    pub total_moves: u64,
    pub win_rate: f64,
    pub avg_moves: f64,
}

impl TimeControlStat {
    pub fn record(&mut self, game: &ClassifiedGame) {
        self.games += 1;
        self.results.record(game.player_result);
        self.total_moves += game.total_moves as u64;
    }

    pub fn finalize(&mut self) {
        self.win_rate = round1(percentage(self.results.wins, self.games));
        self.avg_moves = round1(average(self.total_moves as f64, self.games));
    }
}

pub fn analyze_time_controls(games: &[ClassifiedGame]) -> BTreeMap<String, TimeControlStat> {
    let mut stats: BTreeMap<String, TimeControlStat> = BTreeMap::new();
    for game in games {
        stats
            .entry(normalize_time_control(&game.time_control))
            .or_default()
            .record(game);
    }
    for stat in stats.values_mut() {
        stat.finalize();
    }
    stats
}

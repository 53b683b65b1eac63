use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{average, percentage, round1, ResultTally};
use crate::classifier::ClassifiedGame;

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})\.(\d{1,2})(?:\.|$)").expect("valid date regex"));

/// "YYYY-MM" bucket for a PGN date such as "2024.5.17".
///
/// Unknown dates ("????.??.??") and anything not starting with a numeric
/// year and month yield `None`.
pub fn month_key(date: &str) -> Option<String> {
    let caps = DATE_PREFIX.captures(date.trim())?;
    Some(format!("{}-{:0>2}", &caps[1], &caps[2]))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthStat {
    pub games: u32,
    #[serde(flatten)]
    pub results: ResultTally,
    pub win_rate: f64,
    pub avg_moves: f64,
    pub avg_quality: f64,
    pub rated_percentage: f64,
    pub top_opening: Option<String>,
    pub opening_diversity: usize,
}

/// Fold state for one month. Opening counts keep first-seen order so the
/// most played opening resolves ties to the earliest game.
#[derive(Default)]
struct MonthAccumulator {
    games: u32,
    results: ResultTally,
    total_moves: u64,
    quality_sum: f64,
    rated_games: u32,
    openings: Vec<(String, u32)>,
}

impl MonthAccumulator {
    fn record(&mut self, game: &ClassifiedGame) {
        self.games += 1;
        self.results.record(game.player_result);
        self.total_moves += game.total_moves as u64;
        self.quality_sum += game.game_quality;
        if game.rated {
            self.rated_games += 1;
        }
        match self.openings.iter_mut().find(|(name, _)| *name == game.opening) {
            Some((_, count)) => *count += 1,
            None => self.openings.push((game.opening.clone(), 1)),
        }
    }

    fn finalize(self) -> MonthStat {
        let mut top: Option<&(String, u32)> = None;
        for entry in &self.openings {
            if top.is_none_or(|t| entry.1 > t.1) {
                top = Some(entry);
            }
        }

        MonthStat {
            games: self.games,
            results: self.results,
            win_rate: round1(percentage(self.results.wins, self.games)),
            avg_moves: round1(average(self.total_moves as f64, self.games)),
            avg_quality: round1(average(self.quality_sum, self.games)),
            rated_percentage: round1(percentage(self.rated_games, self.games)),
            top_opening: top.map(|(name, _)| name.clone()),
            opening_diversity: self.openings.len(),
        }
    }
}

pub fn calculate_monthly_stats(games: &[ClassifiedGame]) -> BTreeMap<String, MonthStat> {
    let mut months: BTreeMap<String, MonthAccumulator> = BTreeMap::new();

    for game in games {
        let Some(key) = game.date.as_deref().and_then(month_key) else {
            tracing::debug!(url = %game.url, date = ?game.date, "Skipping game without usable date");
            continue;
        };
        months.entry(key).or_default().record(game);
    }

    months
        .into_iter()
        .map(|(month, acc)| (month, acc.finalize()))
        .collect()
}

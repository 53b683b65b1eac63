use chess_core::game_data::PlayerColor;
use serde::{Deserialize, Serialize};

use super::{average, percentage, round1, ResultTally};
use crate::classifier::ClassifiedGame;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorStat {
    pub games: u32,
    #[serde(flatten)]
    pub results: ResultTally,
    pub total_moves: u64,
    pub win_rate: f64,
    pub avg_moves: f64,
}

impl ColorStat {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAnalysis {
    pub white: ColorStat,
    pub black: ColorStat,
    /// White only when its win rate is strictly higher.
    pub preferred_color: PlayerColor,
    pub color_balance: f64,
}

pub fn analyze_by_color(games: &[ClassifiedGame]) -> ColorAnalysis {
    let mut white = ColorStat::default();
    let mut black = ColorStat::default();

    for game in games {
        match game.player_color {
            PlayerColor::White => white.record(game),
            PlayerColor::Black => black.record(game),
        }
    }
    white.finalize();
    black.finalize();

    let preferred_color = if white.win_rate > black.win_rate {
        PlayerColor::White
    } else {
        PlayerColor::Black
    };
    let color_balance = round1((white.win_rate - black.win_rate).abs());

    ColorAnalysis {
        white,
        black,
        preferred_color,
        color_balance,
    }
}

use chess_core::game_data::PlayerColor;
use serde::{Deserialize, Serialize};

use crate::aggregate::{average, percentage, round1, ResultTally};
use crate::classifier::{ClassifiedGame, GameResult};

/// Headline numbers shown by the basic analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub total_games: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub avg_moves: f64,
    /// Estimated playing time in hours.
    pub total_time: f64,
    pub avg_quality: f64,
    pub win_rate: f64,
    pub white_win_rate: f64,
    pub black_win_rate: f64,
}

pub fn basic_stats(games: &[ClassifiedGame]) -> BasicStats {
    let mut tally = ResultTally::default();
    let mut total_moves = 0u64;
    let mut total_minutes = 0u64;
    let mut quality_sum = 0.0;
    let (mut white_games, mut white_wins) = (0u32, 0u32);
    let (mut black_games, mut black_wins) = (0u32, 0u32);

    for game in games {
        tally.record(game.player_result);
        total_moves += game.total_moves as u64;
        total_minutes += u64::from(game.game_duration);
        quality_sum += game.game_quality;

        let won = u32::from(game.player_result == GameResult::Win);
        match game.player_color {
            PlayerColor::White => {
                white_games += 1;
                white_wins += won;
            }
            PlayerColor::Black => {
                black_games += 1;
                black_wins += won;
            }
        }
    }

    let total = games.len() as u32;
    BasicStats {
        total_games: total,
        wins: tally.wins,
        losses: tally.losses,
        draws: tally.draws,
        avg_moves: round1(average(total_moves as f64, total)),
        total_time: round1(total_minutes as f64 / 60.0),
        avg_quality: round1(average(quality_sum, total)),
        win_rate: round1(percentage(tally.wins, total)),
        white_win_rate: round1(percentage(white_wins, white_games)),
        black_win_rate: round1(percentage(black_wins, black_games)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::game;

    #[test]
    fn test_four_game_scenario() {
        let mut games = vec![
            game(PlayerColor::White, GameResult::Win, 30),
            game(PlayerColor::White, GameResult::Loss, 15),
            game(PlayerColor::Black, GameResult::Win, 45),
            game(PlayerColor::Black, GameResult::Draw, 60),
        ];
        for g in &mut games {
            g.game_duration = 45;
        }

        let stats = basic_stats(&games);
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.win_rate, 50.0);
        assert_eq!(stats.avg_moves, 37.5);
        assert_eq!(stats.total_time, 3.0);
        assert_eq!(stats.white_win_rate, 50.0);
        assert_eq!(stats.black_win_rate, 50.0);
    }

    #[test]
    fn test_incomplete_is_not_a_draw() {
        let stats = basic_stats(&[game(PlayerColor::White, GameResult::Incomplete, 10)]);
        assert_eq!(stats.draws, 0);
        assert_eq!(stats.win_rate, 0.0);
    }

    #[test]
    fn test_empty() {
        let stats = basic_stats(&[]);
        assert_eq!(stats.total_games, 0);
        assert_eq!(stats.avg_moves, 0.0);
        assert_eq!(serde_json::to_value(&stats).unwrap()["win_rate"], 0.0);
    }
}

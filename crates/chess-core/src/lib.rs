//! Game records, PGN replay and the opening catalog shared by the
//! statistics and service crates.

pub mod game_data;
pub mod openings;
pub mod pgn;

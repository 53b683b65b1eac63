//! PGN parsing: replays the main line on a board and records every half-move.

use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{fen::Fen, san::San, Chess, Color, EnPassantMode, Position};

use crate::game_data::{MoveEntry, ParsedGame, PgnHeaders, PlayerColor};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PgnError {
    #[error("no notation text")]
    MissingText,

    #[error("no game found in notation text")]
    NoGame,

    #[error("unplayable move {san:?} at ply {ply}")]
    IllegalMove { ply: usize, san: String },

    #[error("non-standard starting position")]
    UnsupportedSetup,

    #[error("failed to read notation: {0}")]
    Read(String),
}

/// Tags collected during header parsing.
#[derive(Default)]
struct HeaderState {
    headers: PgnHeaders,
    tag_count: usize,
    setup: bool,
    fen: Option<String>,
}

/// State during movetext parsing.
struct Replay {
    headers: PgnHeaders,
    tag_count: usize,
    pos: Chess,
    moves: Vec<MoveEntry>,
}

/// Visitor that replays a single game and records each move.
struct MoveRecorder;

impl Visitor for MoveRecorder {
    type Tags = HeaderState;
    type Movetext = Replay;
    type Output = Result<ParsedGame, PgnError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(HeaderState::default())
    }

    fn tag(
        &mut self,
        tags: &mut HeaderState,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let value = value.decode_utf8_lossy().into_owned();
        tags.tag_count += 1;
        match name {
            b"White" => tags.headers.white = value,
            b"Black" => tags.headers.black = value,
            b"Result" => tags.headers.result = value,
            b"Date" => tags.headers.date = Some(value),
            b"SetUp" => tags.setup = value == "1",
            b"FEN" => tags.fen = Some(value),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: HeaderState) -> ControlFlow<Self::Output, Replay> {
        // Only games from the standard starting position are replayed
        if tags.setup {
            if let Some(ref fen) = tags.fen {
                if fen != STANDARD_START_FEN {
                    return ControlFlow::Break(Err(PgnError::UnsupportedSetup));
                }
            }
        }

        ControlFlow::Continue(Replay {
            headers: tags.headers,
            tag_count: tags.tag_count,
            pos: Chess::default(),
            moves: Vec::new(),
        })
    }

    fn begin_variation(&mut self, _: &mut Replay) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, replay: &mut Replay, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        let ply = replay.moves.len() + 1;

        let mv = match san_plus.san.to_move(&replay.pos) {
            Ok(m) => m,
            Err(_) => {
                return ControlFlow::Break(Err(PgnError::IllegalMove {
                    ply,
                    san: san_plus.to_string(),
                }))
            }
        };

        let color = replay.pos.turn();
        let san = San::from_move(&replay.pos, mv.clone());
        let role_char = mv.role().char();
        let piece = if color == Color::White {
            role_char.to_ascii_uppercase()
        } else {
            role_char
        };
        let is_capture = mv.is_capture();

        replay.pos.play_unchecked(mv);

        let mut notation = san.to_string();
        if replay.pos.is_checkmate() {
            notation.push('#');
        } else if replay.pos.is_check() {
            notation.push('+');
        }

        replay.moves.push(MoveEntry {
            number: ply,
            notation,
            color: if color == Color::White {
                PlayerColor::White
            } else {
                PlayerColor::Black
            },
            piece: Some(piece),
            is_capture,
            is_check: replay.pos.is_check(),
            fen: Fen::from_position(&replay.pos, EnPassantMode::Legal).to_string(),
        });

        ControlFlow::Continue(())
    }

    fn end_game(&mut self, replay: Replay) -> Self::Output {
        if replay.tag_count == 0 && replay.moves.is_empty() {
            return Err(PgnError::NoGame);
        }

        Ok(ParsedGame {
            headers: replay.headers,
            moves: replay.moves,
        })
    }
}

/// Parse the first game in a PGN string.
///
/// A game with headers but no moves parses to an empty move list. Anything
/// that cannot be replayed on the board is a `PgnError`.
pub fn parse_game(pgn: Option<&str>) -> Result<ParsedGame, PgnError> {
    let text = match pgn {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(PgnError::MissingText),
    };

    let mut reader = Reader::new(text.as_bytes());
    match reader.read_game(&mut MoveRecorder) {
        Ok(Some(result)) => result,
        Ok(None) => Err(PgnError::NoGame),
        Err(e) => Err(PgnError::Read(e.to_string())),
    }
}

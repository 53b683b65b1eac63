//! Static opening catalog and the fallback tables used to name a game's opening.

use serde::{Deserialize, Serialize};

/// Sentinel for games too short to classify.
pub const UNDETERMINED: &str = "Undetermined";

/// Sentinel for openings no table recognises.
pub const OTHER_OPENING: &str = "Other opening";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Opening,
    Defense,
    Unknown,
}

/// A catalog entry, keyed by its space-separated move sequence.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub kind: OpeningKind,
    pub category: &'static str,
    pub description: &'static str,
    pub strength: f64,
    pub difficulty: u8,
}

/// Owned opening metadata attached to aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OpeningKind,
    pub category: String,
    pub description: String,
    pub strength: f64,
    pub difficulty: u8,
}

impl From<&CatalogEntry> for OpeningInfo {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            name: entry.name.to_string(),
            kind: entry.kind,
            category: entry.category.to_string(),
            description: entry.description.to_string(),
            strength: entry.strength,
            difficulty: entry.difficulty,
        }
    }
}

/// Catalog in priority order. Detection takes the first entry that matches.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        key: "e4 e5",
        name: "Open Game",
        kind: OpeningKind::Opening,
        category: "King's pawn openings",
        description: "Classical and sound, fights for the centre from move one",
        strength: 8.5,
        difficulty: 6,
    },
    CatalogEntry {
        key: "e4 c5",
        name: "Sicilian Defense",
        kind: OpeningKind::Defense,
        category: "Counter-attacking defenses",
        description: "Sharp, unbalanced defense giving Black active counterplay",
        strength: 9.0,
        difficulty: 9,
    },
    CatalogEntry {
        key: "d4 d5",
        name: "Queen's Pawn Game",
        kind: OpeningKind::Opening,
        category: "Queen's pawn openings",
        description: "Strategic, solid opening that builds a strong position",
        strength: 8.0,
        difficulty: 7,
    },
    CatalogEntry {
        key: "d4 Nf6",
        name: "Indian Defense",
        kind: OpeningKind::Defense,
        category: "Indian defenses",
        description: "Flexible defense that delays committing the central pawns",
        strength: 7.5,
        difficulty: 8,
    },
    CatalogEntry {
        key: "e4 e6",
        name: "French Defense",
        kind: OpeningKind::Defense,
        category: "Closed defenses",
        description: "Resilient defense built on a solid pawn chain",
        strength: 7.0,
        difficulty: 6,
    },
    CatalogEntry {
        key: "e4 c6",
        name: "Caro-Kann Defense",
        kind: OpeningKind::Defense,
        category: "Solid defenses",
        description: "Safe defense that keeps a healthy pawn structure",
        strength: 7.2,
        difficulty: 5,
    },
    CatalogEntry {
        key: "Nf3 d5",
        name: "Reti System",
        kind: OpeningKind::Opening,
        category: "Flexible systems",
        description: "Develops pieces before fixing the central structure",
        strength: 7.8,
        difficulty: 7,
    },
    CatalogEntry {
        key: "c4",
        name: "English Opening",
        kind: OpeningKind::Opening,
        category: "Flank openings",
        description: "Flexible opening that controls key central squares",
        strength: 8.2,
        difficulty: 8,
    },
    CatalogEntry {
        key: "g3",
        name: "King's Fianchetto",
        kind: OpeningKind::Opening,
        category: "Flank openings",
        description: "Quiet setup developing the bishop on the long diagonal",
        strength: 6.8,
        difficulty: 6,
    },
    CatalogEntry {
        key: "f4",
        name: "Bird's Opening",
        kind: OpeningKind::Opening,
        category: "Aggressive openings",
        description: "Aggressive opening aiming for a quick kingside attack",
        strength: 6.5,
        difficulty: 7,
    },
    CatalogEntry {
        key: "d4 f5",
        name: "Dutch Defense",
        kind: OpeningKind::Defense,
        category: "Aggressive defenses",
        description: "Unorthodox defense aiming at the kingside",
        strength: 6.0,
        difficulty: 8,
    },
    CatalogEntry {
        key: "e4 d6",
        name: "Pirc Defense",
        kind: OpeningKind::Defense,
        category: "Solid defenses",
        description: "Flexible defense allowing varied piece development",
        strength: 6.5,
        difficulty: 6,
    },
];

/// Named patterns for the first two half-moves.
pub const TWO_MOVE_PATTERNS: &[(&str, &str, &str)] = &[
    ("e4", "e5", "Open Game"),
    ("e4", "c5", "Sicilian Defense"),
    ("e4", "e6", "French Defense"),
    ("e4", "c6", "Caro-Kann Defense"),
    ("e4", "d6", "Pirc Defense"),
    ("e4", "Nc6", "Nimzowitsch Defense"),
    ("d4", "d5", "Queen's Pawn Game"),
    ("d4", "Nf6", "Indian Defense"),
    ("d4", "f5", "Dutch Defense"),
    ("d4", "g6", "Modern Defense"),
    ("Nf3", "d5", "Reti System"),
    ("Nf3", "Nf6", "Symmetrical Reti"),
    ("c4", "e5", "Reversed Sicilian"),
    ("c4", "c5", "Symmetrical English"),
];

/// Default names keyed by the first half-move alone.
pub const FIRST_MOVE_DEFAULTS: &[(&str, &str)] = &[
    ("e4", "King's Pawn Opening"),
    ("d4", "Queen's Pawn Opening"),
    ("Nf3", "Zukertort Opening"),
    ("c4", "English Opening"),
    ("g3", "Benko Opening"),
    ("f4", "Bird's Opening"),
    ("b3", "Larsen's Opening"),
    ("Nc3", "Van Geet Opening"),
];

/// Catalog key used to group games by their first half-move when no
/// two-move key matches.
pub const FIRST_MOVE_GROUPS: &[(&str, &str)] = &[
    ("e4", "e4 e5"),
    ("d4", "d4 d5"),
    ("Nf3", "Nf3 d5"),
    ("c4", "c4"),
    ("g3", "g3"),
    ("f4", "f4"),
];

pub fn catalog_entry(key: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.key == key)
}

/// Catalog info for a grouping key, or a placeholder carrying `fallback_name`.
pub fn lookup(key: &str, fallback_name: &str) -> OpeningInfo {
    match catalog_entry(key) {
        Some(entry) => OpeningInfo::from(entry),
        None => OpeningInfo {
            name: fallback_name.to_string(),
            kind: OpeningKind::Unknown,
            category: "Other".to_string(),
            description: "Opening not listed in the catalog".to_string(),
            strength: 5.0,
            difficulty: 5,
        },
    }
}

pub fn two_move_pattern(first: &str, second: &str) -> Option<&'static str> {
    TWO_MOVE_PATTERNS
        .iter()
        .find(|(a, b, _)| *a == first && *b == second)
        .map(|(_, _, name)| *name)
}

pub fn first_move_default(first: &str) -> Option<&'static str> {
    FIRST_MOVE_DEFAULTS
        .iter()
        .find(|(mv, _)| *mv == first)
        .map(|(_, name)| *name)
}

pub fn first_move_group(first: &str) -> Option<&'static str> {
    FIRST_MOVE_GROUPS
        .iter()
        .find(|(mv, _)| *mv == first)
        .map(|(_, key)| *key)
}

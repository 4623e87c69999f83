//! Strongly-typed wrappers for catalog concepts
//!
//! Card codes, pack codes and deck ids are all plain strings/integers on the
//! wire. Wrapping them keeps a pack code from being passed where a card code
//! is expected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable catalog code of a card (e.g. "01006")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardCode(String);

impl CardCode {
    pub fn new(s: impl Into<String>) -> Self {
        CardCode(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholder code for "draw a random basic weakness later"
    pub fn random_basic_weakness() -> Self {
        CardCode(RANDOM_BASIC_WEAKNESS.to_string())
    }

    pub fn is_random_basic_weakness(&self) -> bool {
        self.0 == RANDOM_BASIC_WEAKNESS
    }
}

pub const RANDOM_BASIC_WEAKNESS: &str = "01000";

impl fmt::Display for CardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardCode {
    fn from(s: String) -> Self {
        CardCode(s)
    }
}

impl From<&str> for CardCode {
    fn from(s: &str) -> Self {
        CardCode(s.to_string())
    }
}

/// Code of the product a card ships in (e.g. "core", "dwl")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackCode(String);

impl PackCode {
    pub fn new(s: impl Into<String>) -> Self {
        PackCode(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PackCode {
    fn from(s: &str) -> Self {
        PackCode(s.to_string())
    }
}

impl From<String> for PackCode {
    fn from(s: String) -> Self {
        PackCode(s)
    }
}

/// Deck identifier as assigned by the deck store (negative ids are local drafts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckId(i64);

impl DeckId {
    pub fn new(id: i64) -> Self {
        DeckId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    pub fn is_local(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slot selection: card code -> owned quantity
///
/// A BTreeMap keeps serialization and iteration order stable.
pub type Slots = BTreeMap<CardCode, u32>;

/// Card class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Guardian,
    Seeker,
    Rogue,
    Mystic,
    Survivor,
    Neutral,
    /// Encounter cards; never legal in a player deck
    Mythos,
}

impl Faction {
    pub const PLAYER: [Faction; 6] = [
        Faction::Guardian,
        Faction::Seeker,
        Faction::Rogue,
        Faction::Mystic,
        Faction::Survivor,
        Faction::Neutral,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "guardian" => Some(Faction::Guardian),
            "seeker" => Some(Faction::Seeker),
            "rogue" => Some(Faction::Rogue),
            "mystic" => Some(Faction::Mystic),
            "survivor" => Some(Faction::Survivor),
            "neutral" => Some(Faction::Neutral),
            "mythos" => Some(Faction::Mythos),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Faction::Guardian => "guardian",
            Faction::Seeker => "seeker",
            Faction::Rogue => "rogue",
            Faction::Mystic => "mystic",
            Faction::Survivor => "survivor",
            Faction::Neutral => "neutral",
            Faction::Mythos => "mythos",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Faction::Guardian => "Guardian",
            Faction::Seeker => "Seeker",
            Faction::Rogue => "Rogue",
            Faction::Mystic => "Mystic",
            Faction::Survivor => "Survivor",
            Faction::Neutral => "Neutral",
            Faction::Mythos => "Mythos",
        };
        write!(f, "{name}")
    }
}

/// Skill icon kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Willpower,
    Intellect,
    Combat,
    Agility,
    Wild,
}

impl Skill {
    pub const ALL: [Skill; 5] = [
        Skill::Willpower,
        Skill::Intellect,
        Skill::Combat,
        Skill::Agility,
        Skill::Wild,
    ];
}

//! Core catalog types

pub mod card;
pub mod investigator;
pub mod taboo;
pub mod types;

pub use card::{Card, CardSubtype, CardType, SkillIcons};
pub use investigator::{
    DeckOption, DeckRequirements, LevelRange, RandomRequirement, RequiredCard, DEFAULT_DECK_SIZE,
};
pub use taboo::{TabooEntry, TabooSet};
pub use types::{CardCode, DeckId, Faction, PackCode, Skill, Slots, RANDOM_BASIC_WEAKNESS};

//! Deck analysis: aggregation, legality, upgrades, history and draws

pub mod draw;
pub mod history;
pub mod parse;
pub mod upgrade;
pub mod validation;

use crate::core::{Slots, TabooSet};

pub use draw::DrawSimulator;
pub use history::DeckStore;
pub use parse::{parse_deck, parse_deck_record, CardEntry, CardSplit, ParsedDeck, Section};
pub use upgrade::{compute_changes, spent_xp, DeckChanges};
pub use validation::{DeckProblem, DeckValidation, ProblemReason};

/// Inputs shared by aggregation and validation
///
/// Passed explicitly rather than read from any global state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions<'a> {
    /// Taboo list in effect, if any
    pub taboo: Option<&'a TabooSet>,
    /// Slots of the deck this one was upgraded from
    pub previous_slots: Option<&'a Slots>,
    /// Overrides the investigator's deck size
    pub deck_size: Option<u32>,
}

//! Taboo lists: optional errata that adjust card level and copy limits

use crate::core::{Card, CardCode};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Adjustment applied to one card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabooEntry {
    /// Added to the printed level (may be negative)
    pub xp: i32,
    /// Card becomes exceptional: one copy per deck, double xp to purchase
    pub exceptional: bool,
    pub deck_limit: Option<u32>,
    pub text: Option<String>,
}

/// A published taboo list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabooSet {
    pub id: u32,
    pub name: String,
    pub cards: FxHashMap<CardCode, TabooEntry>,
}

impl TabooSet {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        TabooSet {
            id,
            name: name.into(),
            cards: FxHashMap::default(),
        }
    }

    pub fn with_entry(mut self, code: impl Into<CardCode>, entry: TabooEntry) -> Self {
        self.cards.insert(code.into(), entry);
        self
    }

    pub fn entry(&self, code: &CardCode) -> Option<&TabooEntry> {
        self.cards.get(code)
    }
}

/// Effective level of a card, with the taboo list (if any) applied
///
/// Cards without a printed level stay without one.
pub fn card_level(card: &Card, taboo: Option<&TabooSet>) -> Option<u32> {
    let base = card.xp?;
    let delta = taboo.and_then(|t| t.entry(&card.code)).map_or(0, |e| e.xp);
    Some((base as i32 + delta).max(0) as u32)
}

pub fn is_exceptional(card: &Card, taboo: Option<&TabooSet>) -> bool {
    card.exceptional || taboo.and_then(|t| t.entry(&card.code)).is_some_and(|e| e.exceptional)
}

/// Copies allowed per deck; exceptional cards are capped at one
pub fn deck_limit(card: &Card, taboo: Option<&TabooSet>) -> u32 {
    let limit = taboo
        .and_then(|t| t.entry(&card.code))
        .and_then(|e| e.deck_limit)
        .unwrap_or(card.deck_limit);
    if is_exceptional(card, taboo) {
        limit.min(1)
    } else {
        limit
    }
}

/// Experience a single copy contributes to a deck's total
pub fn card_experience(card: &Card, taboo: Option<&TabooSet>) -> u32 {
    let level = card_level(card, taboo).unwrap_or(0);
    if is_exceptional(card, taboo) {
        level * 2
    } else {
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardType;

    fn taboo() -> TabooSet {
        TabooSet::new(1, "Taboo List 1.0")
            .with_entry(
                "01022",
                TabooEntry {
                    xp: 1,
                    ..Default::default()
                },
            )
            .with_entry(
                "02153",
                TabooEntry {
                    exceptional: true,
                    ..Default::default()
                },
            )
    }

    #[test]
    fn test_level_adjustment() {
        let card = Card::new("01022", "Evidence!", CardType::Event).with_xp(0);
        assert_eq!(card_level(&card, None), Some(0));
        assert_eq!(card_level(&card, Some(&taboo())), Some(1));
        assert_eq!(card_experience(&card, Some(&taboo())), 1);
    }

    #[test]
    fn test_level_never_negative() {
        let set = TabooSet::new(2, "t").with_entry(
            "x",
            TabooEntry {
                xp: -3,
                ..Default::default()
            },
        );
        let card = Card::new("x", "x", CardType::Asset).with_xp(1);
        assert_eq!(card_level(&card, Some(&set)), Some(0));
    }

    #[test]
    fn test_exceptional_from_taboo() {
        let card = Card::new("02153", "Streetwise", CardType::Asset).with_xp(3);
        assert_eq!(deck_limit(&card, None), 2);
        assert_eq!(deck_limit(&card, Some(&taboo())), 1);
        assert_eq!(card_experience(&card, Some(&taboo())), 6);
    }

    #[test]
    fn test_levelless_cards() {
        let card = Card::new("01096", "Amnesia", CardType::Treachery);
        assert_eq!(card_level(&card, Some(&taboo())), None);
        assert_eq!(card_experience(&card, None), 0);
    }
}

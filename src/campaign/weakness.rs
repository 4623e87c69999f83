//! Campaign weakness set: which basic weaknesses are in play and which have
//! already been dealt out

use crate::core::{Card, CardCode, PackCode, Slots};
use crate::deck::{parse_deck, DeckValidation, ParseOptions};
use crate::loader::{Deck, PlayerCards};
use crate::{DeckError, Result};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaknessSet {
    /// Packs whose basic weaknesses are shuffled into the pool
    pub pack_codes: Vec<PackCode>,
    /// Copies already given to investigators
    pub assigned_cards: BTreeMap<CardCode, u32>,
}

impl WeaknessSet {
    pub fn new(pack_codes: Vec<PackCode>) -> Self {
        WeaknessSet {
            pack_codes,
            assigned_cards: BTreeMap::new(),
        }
    }

    pub fn assigned(&self, code: &CardCode) -> u32 {
        self.assigned_cards.get(code).copied().unwrap_or(0)
    }

    /// Basic weaknesses from the set's packs with copies left, in catalog order
    pub fn available<'c, C: PlayerCards + ?Sized>(&self, cards: &'c C) -> Vec<(&'c Card, u32)> {
        cards
            .all_cards()
            .filter(|card| {
                card.is_basic_weakness()
                    && !card.code.is_random_basic_weakness()
                    && self.pack_codes.contains(&card.pack_code)
            })
            .filter_map(|card| {
                let left = card.quantity.saturating_sub(self.assigned(&card.code));
                (left > 0).then_some((card, left))
            })
            .collect()
    }

    /// Draw one unassigned copy, weighted by copies left, and mark it assigned
    pub fn draw<C: PlayerCards + ?Sized, R: Rng + ?Sized>(
        &mut self,
        cards: &C,
        rng: &mut R,
    ) -> Option<CardCode> {
        let available = self.available(cards);
        let total: u32 = available.iter().map(|(_, left)| left).sum();
        if total == 0 {
            debug!("No basic weaknesses left to draw");
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        let code = available
            .into_iter()
            .find_map(|(card, left)| {
                if pick < left {
                    Some(card.code.clone())
                } else {
                    pick -= left;
                    None
                }
            })?;
        *self.assigned_cards.entry(code.clone()).or_insert(0) += 1;
        info!("Drew basic weakness {code}");
        Some(code)
    }

    /// Give a copy back to the pool
    pub fn unassign(&mut self, code: &CardCode) {
        if let Some(count) = self.assigned_cards.get_mut(code) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.assigned_cards.remove(code);
            }
        }
    }
}

/// Add a drawn weakness to `slots`, optionally consuming one random basic
/// weakness placeholder
pub fn add_weakness(slots: &Slots, weakness: &CardCode, replace_random: bool) -> Slots {
    let mut slots = slots.clone();
    let count = slots.entry(weakness.clone()).or_insert(0);
    *count = count.saturating_add(1);
    if replace_random {
        let placeholder = CardCode::random_basic_weakness();
        // A zero count holds no placeholder copy to consume
        if let Some(count) = slots.get_mut(&placeholder) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                slots.remove(&placeholder);
            }
        }
    }
    slots
}

/// Apply a drawn weakness to a deck and refresh its stored problem and xp
///
/// `previous` is the deck this one was upgraded from, used for the spent
/// experience.
pub fn apply_weakness_to_deck<C: PlayerCards + ?Sized>(
    deck: &Deck,
    previous: Option<&Deck>,
    weakness: &CardCode,
    replace_random: bool,
    cards: &C,
    options: &ParseOptions<'_>,
) -> Result<Deck> {
    let investigator = cards
        .card(&deck.investigator_code)
        .ok_or_else(|| DeckError::CardNotFound(deck.investigator_code.to_string()))?;
    if !investigator.is_investigator() {
        return Err(DeckError::NotAnInvestigator(deck.investigator_code.to_string()));
    }

    let slots = add_weakness(&deck.slots, weakness, replace_random);
    let options = ParseOptions {
        previous_slots: previous.map(|d| &d.slots),
        ..*options
    };
    let parsed = parse_deck(&deck.investigator_code, &slots, cards, &options);
    let problem = DeckValidation::new(investigator, &options).get_problem(&slots, cards);

    Ok(Deck {
        slots,
        problem: problem.map(|p| p.reason.code().to_string()),
        xp: parsed.spent_xp,
        ..deck.clone()
    })
}

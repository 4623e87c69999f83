//! Deck collection with upgrade chains
//!
//! Decks link to the deck they were upgraded from (`previous_deck`) and the
//! deck they were upgraded into (`next_deck`). The "my decks" list holds the
//! head of each chain, most recent first.

use crate::core::DeckId;
use crate::loader::Deck;
use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default)]
pub struct DeckStore {
    all: FxHashMap<DeckId, Deck>,
    my_decks: Vec<DeckId>,
}

impl DeckStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with a freshly fetched set of decks
    ///
    /// Decks already known are overwritten. Only decks that were not
    /// upgraded further are listed, newest (last in input) first.
    pub fn set_decks(&mut self, decks: Vec<Deck>) {
        self.my_decks = decks
            .iter()
            .filter(|deck| deck.next_deck.is_none())
            .map(|deck| deck.id)
            .rev()
            .collect();
        for deck in decks {
            self.all.insert(deck.id, deck);
        }
        debug!("Deck store holds {} decks", self.all.len());
    }

    /// Store a changed deck; writes move it to the head of the list
    pub fn update_deck(&mut self, deck: Deck, is_write: bool) {
        let id = deck.id;
        self.all.insert(id, deck);
        if is_write {
            self.my_decks.retain(|d| *d != id);
            self.my_decks.insert(0, id);
        }
    }

    /// Store a newly created deck at the head of the list
    ///
    /// An upgrade replaces the deck it came from in the list.
    pub fn new_deck_available(&mut self, deck: Deck) {
        let id = deck.id;
        if let Some(previous) = deck.previous_deck {
            self.my_decks.retain(|d| *d != previous);
        }
        self.my_decks.retain(|d| *d != id);
        self.my_decks.insert(0, id);
        self.all.insert(id, deck);
    }

    /// Swap a locally created deck for its server copy
    ///
    /// Chain links pointing at the local id are rewritten.
    pub fn replace_local_deck(&mut self, local_id: DeckId, deck: Deck) {
        let new_id = deck.id;
        if self.all.remove(&local_id).is_none() {
            warn!("Replacing unknown local deck {}", local_id.as_i64());
        }
        for other in self.all.values_mut() {
            if other.previous_deck == Some(local_id) {
                other.previous_deck = Some(new_id);
            }
            if other.next_deck == Some(local_id) {
                other.next_deck = Some(new_id);
            }
        }
        for id in self.my_decks.iter_mut() {
            if *id == local_id {
                *id = new_id;
            }
        }
        self.all.insert(new_id, deck);
    }

    pub fn get(&self, id: DeckId) -> Option<&Deck> {
        self.all.get(&id)
    }

    /// Heads of the upgrade chains, most recent first
    pub fn my_decks(&self) -> &[DeckId] {
        &self.my_decks
    }

    pub fn latest_decks(&self) -> impl Iterator<Item = &Deck> {
        self.my_decks.iter().filter_map(|id| self.all.get(id))
    }

    /// Number of upgrades behind a deck, i.e. scenarios it has been through
    ///
    /// Stops at a missing link or a repeated id.
    pub fn scenario_count(&self, id: DeckId) -> u32 {
        let mut seen = FxHashSet::default();
        let mut count = 0;
        let mut current = self.all.get(&id);
        while let Some(deck) = current {
            if !seen.insert(deck.id) {
                warn!("Upgrade chain of deck {} loops", id.as_i64());
                break;
            }
            let Some(previous) = deck.previous_deck else {
                break;
            };
            count += 1;
            current = self.all.get(&previous);
        }
        count
    }

    /// The deck `id` was upgraded from, if known
    pub fn previous(&self, id: DeckId) -> Option<&Deck> {
        self.all.get(&id)?.previous_deck.and_then(|p| self.all.get(&p))
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn clear(&mut self) {
        self.all.clear();
        self.my_decks.clear();
    }
}

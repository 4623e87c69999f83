//! Opening-hand draw simulator

use crate::core::{CardCode, Slots};
use crate::loader::PlayerCards;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Starts in play instead of the draw pile
const EXCLUDED_FROM_DRAW: &[&str] = &["02014"];

/// Shuffled draw pile plus the cards drawn so far
///
/// The RNG is seeded, so a given seed always produces the same sequence of
/// shuffles and draws.
#[derive(Debug, Clone)]
pub struct DrawSimulator {
    deck: Vec<CardCode>,
    pile: Vec<CardCode>,
    drawn: Vec<CardCode>,
    rng: ChaCha12Rng,
}

impl DrawSimulator {
    pub fn new<C: PlayerCards + ?Sized>(slots: &Slots, cards: &C, seed: u64) -> Self {
        let deck = slots
            .iter()
            .filter_map(|(code, &count)| {
                let card = cards.card(code)?;
                let drawable =
                    card.is_drawable() && !EXCLUDED_FROM_DRAW.contains(&code.as_str());
                drawable.then(|| std::iter::repeat(code.clone()).take(count as usize))
            })
            .flatten()
            .collect();
        let mut simulator = DrawSimulator {
            deck,
            pile: Vec::new(),
            drawn: Vec::new(),
            rng: ChaCha12Rng::seed_from_u64(seed),
        };
        simulator.reset();
        simulator
    }

    /// Put every card back and shuffle a fresh pile
    pub fn reset(&mut self) {
        self.pile = self.deck.clone();
        self.pile.shuffle(&mut self.rng);
        self.drawn.clear();
    }

    /// Draw up to `count` cards; returns how many were drawn
    pub fn draw(&mut self, count: usize) -> usize {
        let count = count.min(self.pile.len());
        self.drawn.extend(self.pile.drain(..count));
        count
    }

    pub fn draw_all(&mut self) -> usize {
        self.draw(self.pile.len())
    }

    /// Draw replacements for the selected cards, then shuffle the selected
    /// cards back into the pile
    ///
    /// `selected` holds indices into `drawn()`; invalid indices are ignored.
    pub fn redraw_selected(&mut self, selected: &[usize]) {
        let count = self.valid_selection(selected).len();
        self.draw(count);
        self.reshuffle_selected(selected);
    }

    /// Return the selected cards to the pile and shuffle it
    pub fn reshuffle_selected(&mut self, selected: &[usize]) {
        let indices = self.valid_selection(selected);
        // Remove from the back so earlier indices stay valid
        for &index in indices.iter().rev() {
            let card = self.drawn.remove(index);
            self.pile.push(card);
        }
        self.pile.shuffle(&mut self.rng);
    }

    fn valid_selection(&self, selected: &[usize]) -> Vec<usize> {
        let mut indices: Vec<usize> = selected
            .iter()
            .copied()
            .filter(|&i| i < self.drawn.len())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    pub fn drawn(&self) -> &[CardCode] {
        &self.drawn
    }

    pub fn remaining(&self) -> usize {
        self.pile.len()
    }

    /// Cards in a full pile
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }
}

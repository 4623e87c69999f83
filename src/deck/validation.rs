//! Deck legality checks
//!
//! `DeckValidation::get_problem` runs an ordered checklist and reports the
//! first rule the deck breaks. A legal deck has no problem; this is never an
//! error path.

use crate::core::taboo::{card_level, deck_limit};
use crate::core::{Card, CardCode, DeckRequirements, Faction, Slots, TabooSet};
use crate::deck::parse::saturating_total;
use crate::deck::ParseOptions;
use crate::loader::PlayerCards;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Why a deck is not legal, in checklist order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemReason {
    /// More copies of a title than its deck limit
    TooManyCopies,
    /// A card the investigator may not include
    InvalidCards,
    /// A limited deck-building option admitted too many copies
    DeckOptionsLimit,
    TooFewCards,
    TooManyCards,
    /// A required card or random requirement is missing
    Investigator,
}

impl ProblemReason {
    /// Reason code stored with a saved deck
    pub fn code(&self) -> &'static str {
        match self {
            ProblemReason::TooManyCopies => "too_many_copies",
            ProblemReason::InvalidCards => "invalid_cards",
            ProblemReason::DeckOptionsLimit => "deck_options_limit",
            ProblemReason::TooFewCards => "too_few_cards",
            ProblemReason::TooManyCards => "too_many_cards",
            ProblemReason::Investigator => "investigator",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "too_many_copies" => Some(ProblemReason::TooManyCopies),
            "invalid_cards" => Some(ProblemReason::InvalidCards),
            "deck_options_limit" => Some(ProblemReason::DeckOptionsLimit),
            "too_few_cards" => Some(ProblemReason::TooFewCards),
            "too_many_cards" => Some(ProblemReason::TooManyCards),
            "investigator" => Some(ProblemReason::Investigator),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProblemReason::TooManyCopies => "Contains too many copies of a card (by title)",
            ProblemReason::InvalidCards => "Contains forbidden cards (cards not permitted by the investigator)",
            ProblemReason::DeckOptionsLimit => "Contains too many limited cards",
            ProblemReason::TooFewCards => "Contains too few cards",
            ProblemReason::TooManyCards => "Contains too many cards",
            ProblemReason::Investigator => "Doesn't comply with the investigator requirements",
        }
    }
}

impl fmt::Display for ProblemReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The single problem reported for a deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckProblem {
    pub reason: ProblemReason,
    /// Offending cards, for `InvalidCards` and `TooManyCopies`
    pub invalid_cards: Vec<CardCode>,
    /// Option-specific explanation, for `DeckOptionsLimit`
    pub message: Option<String>,
}

impl DeckProblem {
    fn new(reason: ProblemReason) -> Self {
        DeckProblem {
            reason,
            invalid_cards: Vec::new(),
            message: None,
        }
    }
}

impl fmt::Display for DeckProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.reason.description()),
            None => write!(f, "{}", self.reason.description()),
        }
    }
}

/// How a card gets into a deck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admission {
    /// Signature, weakness or required card
    Always,
    /// Admitted by the deck option at this index
    Option(usize),
    Never,
}

/// Rule checker bound to one investigator
#[derive(Debug, Clone)]
pub struct DeckValidation<'a> {
    investigator: &'a Card,
    requirements: DeckRequirements,
    taboo: Option<&'a TabooSet>,
    deck_size: u32,
}

impl<'a> DeckValidation<'a> {
    pub fn new(investigator: &'a Card, options: &ParseOptions<'a>) -> Self {
        let requirements = investigator.deck_requirements.clone().unwrap_or_default();
        let deck_size = options.deck_size.unwrap_or(requirements.size);
        DeckValidation {
            investigator,
            requirements,
            taboo: options.taboo,
            deck_size,
        }
    }

    pub fn deck_size(&self) -> u32 {
        self.deck_size
    }

    /// First violated rule, or None for a legal deck
    pub fn get_problem<C: PlayerCards + ?Sized>(
        &self,
        slots: &Slots,
        cards: &C,
    ) -> Option<DeckProblem> {
        let resolved = resolve(slots, cards);
        let problem = self.check(&resolved);
        if let Some(problem) = &problem {
            debug!(
                "Deck for {} fails {}",
                self.investigator.code, problem.reason
            );
        }
        problem
    }

    fn check(&self, resolved: &[(&Card, u32)]) -> Option<DeckProblem> {
        let over_limit = self.too_many_copies(resolved);
        if !over_limit.is_empty() {
            return Some(DeckProblem {
                invalid_cards: over_limit,
                ..DeckProblem::new(ProblemReason::TooManyCopies)
            });
        }

        let invalid = self.invalid_cards(resolved);
        if !invalid.is_empty() {
            return Some(DeckProblem {
                invalid_cards: invalid,
                ..DeckProblem::new(ProblemReason::InvalidCards)
            });
        }

        if let Some(message) = self.deck_options_limit(resolved) {
            return Some(DeckProblem {
                message,
                ..DeckProblem::new(ProblemReason::DeckOptionsLimit)
            });
        }

        let size = draw_deck_size(resolved);
        if size < self.deck_size {
            return Some(DeckProblem::new(ProblemReason::TooFewCards));
        }
        if size > self.deck_size {
            return Some(DeckProblem::new(ProblemReason::TooManyCards));
        }

        if !self.has_required_cards(resolved) {
            return Some(DeckProblem::new(ProblemReason::Investigator));
        }

        None
    }

    /// Whether `card` may appear in this investigator's deck at all
    pub fn can_include_card(&self, card: &Card) -> bool {
        match self.admission(card) {
            Admission::Always | Admission::Option(_) => true,
            Admission::Never => false,
        }
    }

    fn admission(&self, card: &Card) -> Admission {
        if card.is_investigator() || card.faction == Faction::Mythos {
            return Admission::Never;
        }
        if card.is_signature() {
            return if card.is_restricted_to(&self.investigator.code) {
                Admission::Always
            } else {
                Admission::Never
            };
        }
        if card.is_weakness() || self.requirements.cards.iter().any(|r| r.accepts(&card.code)) {
            return Admission::Always;
        }

        // First matching option decides
        let level = card_level(card, self.taboo);
        self.investigator
            .deck_options
            .iter()
            .position(|option| option.matches(card, level))
            .map_or(Admission::Never, |i| {
                if self.investigator.deck_options[i].not {
                    Admission::Never
                } else {
                    Admission::Option(i)
                }
            })
    }

    pub fn invalid_cards(&self, resolved: &[(&Card, u32)]) -> Vec<CardCode> {
        resolved
            .iter()
            .filter(|(card, _)| !self.can_include_card(card))
            .map(|(card, _)| card.code.clone())
            .collect()
    }

    /// Titles whose combined copies exceed the limit; reports every code of
    /// an offending title
    fn too_many_copies(&self, resolved: &[(&Card, u32)]) -> Vec<CardCode> {
        let mut by_title: BTreeMap<&str, (u32, u32, Vec<CardCode>)> = BTreeMap::new();
        for (card, quantity) in resolved {
            let entry = by_title.entry(card.name.as_str()).or_insert((0, 0, Vec::new()));
            entry.0 = entry.0.saturating_add(*quantity);
            entry.1 = entry.1.max(deck_limit(card, self.taboo));
            entry.2.push(card.code.clone());
        }
        by_title
            .into_values()
            .filter(|(count, limit, _)| count > limit)
            .flat_map(|(_, _, codes)| codes)
            .collect()
    }

    /// Message for the first limited option that admitted too many copies
    fn deck_options_limit(&self, resolved: &[(&Card, u32)]) -> Option<Option<String>> {
        let options = &self.investigator.deck_options;
        let mut counts = vec![0u32; options.len()];
        for (card, quantity) in resolved {
            if let Admission::Option(i) = self.admission(card) {
                counts[i] = counts[i].saturating_add(*quantity);
            }
        }
        options
            .iter()
            .zip(counts)
            .find(|(option, count)| option.limit.is_some_and(|limit| *count > limit))
            .map(|(option, _)| option.error.clone())
    }

    fn has_required_cards(&self, resolved: &[(&Card, u32)]) -> bool {
        let cards_ok = self.requirements.cards.iter().all(|required| {
            resolved
                .iter()
                .any(|(card, _)| required.accepts(&card.code))
        });
        let random_ok = self.requirements.random.iter().all(|requirement| {
            resolved
                .iter()
                .any(|(card, _)| requirement.is_satisfied_by(card))
        });
        cards_ok && random_ok
    }
}

/// Cards counting toward deck size
pub fn draw_deck_size(resolved: &[(&Card, u32)]) -> u32 {
    saturating_total(
        resolved
            .iter()
            .filter(|(card, _)| card.counts_toward_deck_size())
            .map(|(_, quantity)| *quantity),
    )
}

/// Resolve a selection to (card, quantity) pairs in catalog order
pub fn resolve<'c, C: PlayerCards + ?Sized>(slots: &Slots, cards: &'c C) -> Vec<(&'c Card, u32)> {
    let mut resolved: Vec<(usize, &Card, u32)> = slots
        .iter()
        .filter(|(_, &quantity)| quantity > 0)
        .filter_map(|(code, &quantity)| {
            let card = cards.card(code)?;
            let position = cards.catalog_position(code)?;
            Some((position, card, quantity))
        })
        .collect();
    resolved.sort_by_key(|(position, _, _)| *position);
    resolved
        .into_iter()
        .map(|(_, card, quantity)| (card, quantity))
        .collect()
}

//! Deck aggregation
//!
//! Turns a slot selection into the grouped, totalled view the deck screen
//! shows. Pure function of its inputs: the same selection always produces
//! an equal `ParsedDeck`.

use crate::core::taboo::card_experience;
use crate::core::{Card, CardCode, CardType, Faction, PackCode, Skill, Slots};
use crate::deck::upgrade::{compute_changes, spent_xp, DeckChanges};
use crate::deck::ParseOptions;
use crate::loader::{Deck, PlayerCards};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Slot label for assets that occupy no slot
pub const NO_SLOT: &str = "Other";

/// Display order of asset slot groups; unknown slots sort after these
const SLOT_ORDER: &[&str] = &[
    "Hand",
    "Hand x2",
    "Arcane",
    "Arcane x2",
    "Hand. Arcane",
    "Accessory",
    "Body",
    "Body. Hand x2",
    "Ally",
    "Ally. Arcane",
    "Tarot",
];

/// One line of a deck listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardEntry {
    pub code: CardCode,
    pub quantity: u32,
}

/// Assets sharing a slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetGroup {
    pub slot: String,
    pub cards: Vec<CardEntry>,
}

impl AssetGroup {
    pub fn count(&self) -> u32 {
        saturating_total(self.cards.iter().map(|c| c.quantity))
    }
}

/// Cards of one half of the deck, bucketed by type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardSplit {
    pub assets: Vec<AssetGroup>,
    pub events: Vec<CardEntry>,
    pub skills: Vec<CardEntry>,
    pub treacheries: Vec<CardEntry>,
    pub enemies: Vec<CardEntry>,
    pub locations: Vec<CardEntry>,
    pub other: Vec<CardEntry>,
}

/// A titled run of entries, ready to print
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section<'a> {
    pub title: String,
    /// Set for asset slot sub-sections
    pub subtitle: Option<&'a str>,
    pub cards: &'a [CardEntry],
}

impl CardSplit {
    pub fn count(&self) -> u32 {
        let assets = saturating_total(self.assets.iter().map(AssetGroup::count));
        let others = saturating_total(
            [
                &self.events,
                &self.skills,
                &self.treacheries,
                &self.enemies,
                &self.locations,
                &self.other,
            ]
            .iter()
            .flat_map(|v| v.iter())
            .map(|c| c.quantity),
        );
        assets.saturating_add(others)
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Sections in display order: an "Assets (n)" header followed by one
    /// sub-section per slot, then each non-empty type bucket.
    pub fn sections(&self) -> Vec<Section<'_>> {
        let mut result = Vec::new();
        if !self.assets.is_empty() {
            let asset_count = saturating_total(self.assets.iter().map(AssetGroup::count));
            result.push(Section {
                title: format!("{} ({asset_count})", CardType::Asset.heading()),
                subtitle: None,
                cards: &[],
            });
            for group in &self.assets {
                result.push(Section {
                    title: CardType::Asset.heading().to_string(),
                    subtitle: Some(group.slot.as_str()),
                    cards: &group.cards,
                });
            }
        }
        let buckets = [
            (CardType::Event, &self.events),
            (CardType::Skill, &self.skills),
            (CardType::Treachery, &self.treacheries),
            (CardType::Enemy, &self.enemies),
            (CardType::Location, &self.locations),
            (CardType::Other, &self.other),
        ];
        for (card_type, entries) in buckets {
            if entries.is_empty() {
                continue;
            }
            let count = saturating_total(entries.iter().map(|c| c.quantity));
            result.push(Section {
                title: format!("{} ({count})", card_type.heading()),
                subtitle: None,
                cards: entries,
            });
        }
        result
    }
}

/// Derived view of a deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDeck {
    pub investigator: CardCode,
    /// Cards that count toward deck size
    pub normal_cards: CardSplit,
    /// Weaknesses, permanents and signature cards
    pub special_cards: CardSplit,
    /// Distinct resolved codes with a non-zero quantity
    pub distinct_card_count: usize,
    pub normal_card_count: u32,
    pub total_card_count: u32,
    pub experience: u32,
    pub packs: BTreeSet<PackCode>,
    pub faction_counts: BTreeMap<Faction, u32>,
    /// Printed cost -> copies; drawable cards with a numeric cost only
    pub cost_curve: BTreeMap<i32, u32>,
    /// Skill icons over drawable cards
    pub skill_icons: BTreeMap<Skill, u32>,
    /// Set when a previous deck was supplied
    pub changes: Option<DeckChanges>,
    pub spent_xp: Option<u32>,
}

impl ParsedDeck {
    pub fn pack_count(&self) -> usize {
        self.packs.len()
    }

    /// Every section, normal half first
    pub fn sections(&self) -> Vec<Section<'_>> {
        let mut sections = self.normal_cards.sections();
        sections.extend(self.special_cards.sections());
        sections
    }
}

/// Aggregate `deck` against the catalog
pub fn parse_deck_record<C: PlayerCards + ?Sized>(
    deck: &Deck,
    cards: &C,
    options: &ParseOptions<'_>,
) -> ParsedDeck {
    parse_deck(&deck.investigator_code, &deck.slots, cards, options)
}

/// Aggregate a slot selection
///
/// Unresolved codes and zero quantities are skipped. Entries within each
/// bucket follow catalog order.
pub fn parse_deck<C: PlayerCards + ?Sized>(
    investigator: &CardCode,
    slots: &Slots,
    cards: &C,
    options: &ParseOptions<'_>,
) -> ParsedDeck {
    let mut resolved: Vec<(usize, &Card, u32)> = Vec::with_capacity(slots.len());
    for (code, &quantity) in slots {
        if quantity == 0 {
            continue;
        }
        match (cards.card(code), cards.catalog_position(code)) {
            (Some(card), Some(position)) => resolved.push((position, card, quantity)),
            _ => debug!("Skipping unknown card code {code}"),
        }
    }
    resolved.sort_by_key(|(position, _, _)| *position);

    let mut normal_cards = CardSplit::default();
    let mut special_cards = CardSplit::default();
    let mut normal_card_count: u32 = 0;
    let mut total_card_count: u32 = 0;
    let mut experience: u32 = 0;
    let mut packs = BTreeSet::new();
    let mut faction_counts = BTreeMap::new();
    let mut cost_curve = BTreeMap::new();
    let mut skill_icons = BTreeMap::new();

    for &(_, card, quantity) in &resolved {
        // Counts come from the caller; totals saturate instead of overflowing
        total_card_count = total_card_count.saturating_add(quantity);
        let copies_xp = card_experience(card, options.taboo).saturating_mul(quantity);
        experience = experience.saturating_add(copies_xp);
        packs.insert(card.pack_code.clone());

        if card.counts_toward_deck_size() {
            normal_card_count = normal_card_count.saturating_add(quantity);
            add_count(&mut faction_counts, card.faction, quantity);
        }

        if card.is_drawable() {
            if let (Some(cost), CardType::Asset | CardType::Event) = (card.cost, card.card_type) {
                add_count(&mut cost_curve, cost, quantity);
            }
            for skill in Skill::ALL {
                let icons = card.skills.get(skill) as u32;
                if icons > 0 {
                    add_count(&mut skill_icons, skill, icons.saturating_mul(quantity));
                }
            }
        }

        let split = if card.is_special() {
            &mut special_cards
        } else {
            &mut normal_cards
        };
        add_to_split(split, card, quantity);
    }

    sort_asset_groups(&mut normal_cards.assets);
    sort_asset_groups(&mut special_cards.assets);

    let (changes, spent) = match options.previous_slots {
        Some(previous) => {
            let changes = compute_changes(previous, slots);
            let spent = spent_xp(&changes, cards, options.taboo);
            (Some(changes), Some(spent))
        }
        None => (None, None),
    };

    ParsedDeck {
        investigator: investigator.clone(),
        normal_cards,
        special_cards,
        distinct_card_count: resolved.len(),
        normal_card_count,
        total_card_count,
        experience,
        packs,
        faction_counts,
        cost_curve,
        skill_icons,
        changes,
        spent_xp: spent,
    }
}

/// Sum of copies, capped at `u32::MAX`
pub(crate) fn saturating_total(quantities: impl IntoIterator<Item = u32>) -> u32 {
    quantities.into_iter().fold(0, u32::saturating_add)
}

fn add_count<K: Ord>(counts: &mut BTreeMap<K, u32>, key: K, quantity: u32) {
    let count = counts.entry(key).or_insert(0);
    *count = count.saturating_add(quantity);
}

fn add_to_split(split: &mut CardSplit, card: &Card, quantity: u32) {
    let entry = CardEntry {
        code: card.code.clone(),
        quantity,
    };
    let bucket = match card.card_type {
        CardType::Asset => {
            let slot = card.slot.as_deref().unwrap_or(NO_SLOT);
            let existing = split.assets.iter().position(|g| g.slot == slot);
            match existing {
                Some(i) => split.assets[i].cards.push(entry),
                None => split.assets.push(AssetGroup {
                    slot: slot.to_string(),
                    cards: vec![entry],
                }),
            }
            return;
        }
        CardType::Event => &mut split.events,
        CardType::Skill => &mut split.skills,
        CardType::Treachery => &mut split.treacheries,
        CardType::Enemy => &mut split.enemies,
        CardType::Location => &mut split.locations,
        _ => &mut split.other,
    };
    bucket.push(entry);
}

/// Known slots in display order, unknown slots alphabetically, "Other" last
fn sort_asset_groups(groups: &mut [AssetGroup]) {
    groups.sort_by(|a, b| slot_rank(&a.slot).cmp(&slot_rank(&b.slot)));
}

fn slot_rank(slot: &str) -> (usize, String) {
    if slot == NO_SLOT {
        return (SLOT_ORDER.len() + 1, String::new());
    }
    match SLOT_ORDER.iter().position(|s| *s == slot) {
        Some(i) => (i, String::new()),
        None => (SLOT_ORDER.len(), slot.to_string()),
    }
}

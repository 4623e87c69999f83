//! Card search filters and facet discovery

use crate::core::{Card, CardSubtype, CardType, Faction, PackCode, Skill};
use crate::loader::database::normalize_name;
use crate::loader::PlayerCards;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive numeric range used by the level and cost filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: i32,
    pub max: i32,
}

impl Range {
    pub fn new(min: i32, max: i32) -> Self {
        Range { min, max }
    }

    pub fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// "XP(2)" or "XP(0-2)"
    pub fn describe(&self, name: &str) -> String {
        if self.min == self.max {
            format!("{name}({})", self.min)
        } else {
            format!("{name}({}-{})", self.min, self.max)
        }
    }
}

/// A card search
///
/// Empty lists and `None` ranges do not filter. Within one list any entry
/// may match; across criteria all must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFilter {
    pub name: Option<String>,
    pub factions: Vec<Faction>,
    pub types: Vec<CardType>,
    pub subtypes: Vec<CardSubtype>,
    pub traits: Vec<String>,
    pub packs: Vec<PackCode>,
    pub slots: Vec<String>,
    pub uses: Vec<String>,
    pub level: Option<Range>,
    pub cost: Option<Range>,
    /// Card must have at least one icon of each listed skill
    pub skill_icons: Vec<Skill>,
    pub unique: bool,
    pub permanent: bool,
    pub exceptional: bool,
}

impl CardFilter {
    pub fn is_empty(&self) -> bool {
        *self == CardFilter::default()
    }

    pub fn matches(&self, card: &Card) -> bool {
        if let Some(name) = &self.name {
            let needle = normalize_name(name);
            let haystack = normalize_name(&card.display_name());
            if !haystack.contains(&needle) {
                return false;
            }
        }
        if !self.factions.is_empty() && !self.factions.iter().any(|f| card.has_faction(*f)) {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&card.card_type) {
            return false;
        }
        if !self.subtypes.is_empty()
            && !card.subtype.is_some_and(|s| self.subtypes.contains(&s))
        {
            return false;
        }
        if !self.traits.is_empty() && !self.traits.iter().any(|t| card.has_trait(t)) {
            return false;
        }
        if !self.packs.is_empty() && !self.packs.contains(&card.pack_code) {
            return false;
        }
        if !self.slots.is_empty()
            && !card
                .slot_parts()
                .any(|part| self.slots.iter().any(|s| s.eq_ignore_ascii_case(part)))
        {
            return false;
        }
        if !self.uses.is_empty() {
            let Some(uses) = card.uses.as_deref() else {
                return false;
            };
            if !self.uses.iter().any(|u| u.eq_ignore_ascii_case(uses)) {
                return false;
            }
        }
        if let Some(level) = self.level {
            if !card.xp.is_some_and(|xp| level.contains(xp as i32)) {
                return false;
            }
        }
        if let Some(cost) = self.cost {
            if !card.cost.is_some_and(|c| cost.contains(c)) {
                return false;
            }
        }
        if !self.skill_icons.iter().all(|s| card.skills.get(*s) > 0) {
            return false;
        }
        if self.unique && !card.is_unique {
            return false;
        }
        if self.permanent && !card.permanent {
            return false;
        }
        if self.exceptional && !card.exceptional {
            return false;
        }
        true
    }

    /// Matching cards in catalog order
    pub fn apply<'c, C: PlayerCards + ?Sized>(&self, cards: &'c C) -> Vec<&'c Card> {
        cards.all_cards().filter(|card| self.matches(card)).collect()
    }

    /// Short summary of the active filters, e.g. "Guardian, Asset, XP(0-2)"
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(name) = &self.name {
            parts.push(format!("\"{name}\""));
        }
        parts.extend(self.factions.iter().map(|f| f.to_string()));
        parts.extend(self.types.iter().map(|t| t.heading().to_string()));
        parts.extend(self.traits.iter().cloned());
        parts.extend(self.slots.iter().cloned());
        if let Some(level) = self.level {
            parts.push(level.describe("XP"));
        }
        if let Some(cost) = self.cost {
            parts.push(cost.describe("Cost"));
        }
        if parts.is_empty() {
            "All cards".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Values present in a catalog, used to offer filter choices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterFacets {
    pub factions: BTreeSet<Faction>,
    pub types: Vec<CardType>,
    pub traits: BTreeSet<String>,
    pub slots: BTreeSet<String>,
    pub uses: BTreeSet<String>,
    pub packs: BTreeSet<PackCode>,
    pub has_cost: bool,
    pub has_xp: bool,
    pub has_skill: bool,
}

impl FilterFacets {
    pub fn discover<C: PlayerCards + ?Sized>(cards: &C) -> Self {
        let mut facets = FilterFacets::default();
        for card in cards.all_cards() {
            facets.factions.insert(card.faction);
            if let Some(f) = card.faction2 {
                facets.factions.insert(f);
            }
            if !facets.types.contains(&card.card_type) {
                facets.types.push(card.card_type);
            }
            facets.traits.extend(card.traits.iter().cloned());
            facets.slots.extend(card.slot_parts().map(str::to_string));
            facets.uses.extend(card.uses.clone());
            facets.packs.insert(card.pack_code.clone());
            facets.has_cost |= card.cost.is_some();
            facets.has_xp |= card.xp.is_some();
            facets.has_skill |= card.skills.total() > 0;
        }
        facets
    }
}

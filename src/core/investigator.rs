//! Investigator deck-building requirements and options

use crate::core::{Card, CardCode, CardSubtype, CardType, Faction};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Default deck size when an investigator does not state one
pub const DEFAULT_DECK_SIZE: u32 = 30;

/// What an investigator's deck must contain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRequirements {
    /// Draw deck size (weaknesses, permanents and signature cards excluded)
    pub size: u32,
    pub cards: Vec<RequiredCard>,
    pub random: Vec<RandomRequirement>,
}

impl Default for DeckRequirements {
    fn default() -> Self {
        DeckRequirements {
            size: DEFAULT_DECK_SIZE,
            cards: Vec::new(),
            random: Vec::new(),
        }
    }
}

/// A required card; any one of the alternatives satisfies it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredCard {
    pub alternatives: SmallVec<[CardCode; 2]>,
}

impl RequiredCard {
    pub fn new(code: impl Into<CardCode>) -> Self {
        RequiredCard {
            alternatives: SmallVec::from_elem(code.into(), 1),
        }
    }

    pub fn or(mut self, code: impl Into<CardCode>) -> Self {
        self.alternatives.push(code.into());
        self
    }

    pub fn accepts(&self, code: &CardCode) -> bool {
        self.alternatives.iter().any(|c| c == code)
    }
}

/// A card drawn at random at deck creation, e.g. one basic weakness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomRequirement {
    pub target: String,
    pub value: String,
}

impl RandomRequirement {
    pub fn basic_weakness() -> Self {
        RandomRequirement {
            target: "subtype".to_string(),
            value: "basicweakness".to_string(),
        }
    }

    pub fn is_satisfied_by(&self, card: &Card) -> bool {
        match self.target.as_str() {
            "subtype" => CardSubtype::from_code(&self.value)
                .map(|s| card.subtype == Some(s))
                .unwrap_or(false),
            "type" => CardType::from_code(&self.value) == card.card_type,
            "code" => card.code.as_str() == self.value,
            _ => false,
        }
    }
}

/// Inclusive level range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange {
    pub min: u32,
    pub max: u32,
}

impl LevelRange {
    pub fn new(min: u32, max: u32) -> Self {
        LevelRange { min, max }
    }

    pub fn contains(&self, level: u32) -> bool {
        level >= self.min && level <= self.max
    }
}

/// One clause of an investigator's "may include" list
///
/// Every non-empty criterion must match. A `not` option forbids what it
/// matches instead of allowing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckOption {
    pub factions: Vec<Faction>,
    pub level: Option<LevelRange>,
    pub types: Vec<CardType>,
    pub traits: Vec<String>,
    pub uses: Vec<String>,
    pub slots: Vec<String>,
    pub not: bool,
    /// Maximum copies this option may admit in total
    pub limit: Option<u32>,
    /// Explanation shown when the limit is exceeded
    pub error: Option<String>,
}

impl DeckOption {
    pub fn factions(factions: &[Faction], level: LevelRange) -> Self {
        DeckOption {
            factions: factions.to_vec(),
            level: Some(level),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_traits(mut self, traits: &[&str]) -> Self {
        self.traits = traits.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn negated(mut self) -> Self {
        self.not = true;
        self
    }

    /// Does this option's criteria cover `card` at the given (taboo-adjusted) level?
    pub fn matches(&self, card: &Card, level: Option<u32>) -> bool {
        if !self.factions.is_empty() && !self.factions.iter().any(|f| card.has_faction(*f)) {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&card.card_type) {
            return false;
        }
        if !self.traits.is_empty() && !self.traits.iter().any(|t| card.has_trait(t)) {
            return false;
        }
        if !self.uses.is_empty() {
            let uses = card.uses.as_deref().unwrap_or("");
            if !self.uses.iter().any(|u| u.eq_ignore_ascii_case(uses)) {
                return false;
            }
        }
        if !self.slots.is_empty()
            && !card
                .slot_parts()
                .any(|part| self.slots.iter().any(|s| s.eq_ignore_ascii_case(part)))
        {
            return false;
        }
        if let Some(range) = self.level {
            match level {
                Some(l) if range.contains(l) => {}
                _ => return false,
            }
        }
        true
    }
}

//! Card catalog loader (card-database JSON format)
//!
//! The public card database exports one JSON array per pack. Each object is
//! flat except for the investigator-only `deck_requirements`,
//! `deck_options` and the signature-card `restrictions` blocks.

use crate::core::{
    Card, CardCode, CardSubtype, CardType, DeckOption, DeckRequirements, Faction, LevelRange,
    PackCode, RandomRequirement, RequiredCard, SkillIcons, DEFAULT_DECK_SIZE,
};
use crate::{DeckError, Result};
use serde::Deserialize;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Card loader for card-database JSON files
pub struct CardLoader;

impl CardLoader {
    /// Load every card from a JSON file holding an array of cards
    pub fn load_from_file(path: &Path) -> Result<Vec<Card>> {
        let content = fs::read_to_string(path).map_err(DeckError::IoError)?;
        Self::parse(&content).map_err(|e| {
            DeckError::InvalidCardFormat(format!(
                "Failed to parse card file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse a JSON array of cards
    pub fn parse(content: &str) -> Result<Vec<Card>> {
        let raw: Vec<RawCard> = serde_json::from_str(content)?;
        raw.into_iter().map(RawCard::into_card).collect()
    }

    /// Parse a single JSON card object
    pub fn parse_one(content: &str) -> Result<Card> {
        let raw: RawCard = serde_json::from_str(content)?;
        raw.into_card()
    }
}

#[derive(Debug, Deserialize)]
struct RawCard {
    code: String,
    name: String,
    #[serde(default)]
    subname: Option<String>,
    type_code: String,
    #[serde(default)]
    subtype_code: Option<String>,
    #[serde(default)]
    faction_code: Option<String>,
    #[serde(default)]
    faction2_code: Option<String>,
    #[serde(default)]
    pack_code: Option<String>,
    #[serde(default)]
    position: u32,
    #[serde(default)]
    cost: Option<i32>,
    #[serde(default)]
    xp: Option<u32>,
    #[serde(default)]
    skill_willpower: Option<u8>,
    #[serde(default)]
    skill_intellect: Option<u8>,
    #[serde(default)]
    skill_combat: Option<u8>,
    #[serde(default)]
    skill_agility: Option<u8>,
    #[serde(default)]
    skill_wild: Option<u8>,
    #[serde(default)]
    slot: Option<String>,
    #[serde(default)]
    traits: Option<String>,
    #[serde(default)]
    real_traits: Option<String>,
    #[serde(default)]
    uses: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    is_unique: bool,
    #[serde(default)]
    permanent: bool,
    #[serde(default)]
    double_sided: bool,
    #[serde(default)]
    exile: bool,
    #[serde(default)]
    exceptional: bool,
    #[serde(default)]
    deck_limit: Option<u32>,
    #[serde(default)]
    quantity: Option<u32>,
    #[serde(default)]
    health: Option<u32>,
    #[serde(default)]
    sanity: Option<u32>,
    #[serde(default)]
    restrictions: Option<RawRestrictions>,
    #[serde(default)]
    deck_requirements: Option<RawDeckRequirements>,
    #[serde(default)]
    deck_options: Vec<RawDeckOption>,
}

#[derive(Debug, Deserialize)]
struct RawRestrictions {
    #[serde(default)]
    investigator: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawDeckRequirements {
    #[serde(default)]
    size: Option<u32>,
    /// required code -> { alternative code -> alternative code }
    #[serde(default)]
    card: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    random: Vec<RandomRequirement>,
}

#[derive(Debug, Deserialize)]
struct RawDeckOption {
    #[serde(default)]
    faction: Vec<String>,
    #[serde(default)]
    level: Option<LevelRange>,
    #[serde(default, rename = "type")]
    type_code: Vec<String>,
    #[serde(default, rename = "trait")]
    traits: Vec<String>,
    #[serde(default)]
    uses: Vec<String>,
    #[serde(default)]
    slot: Vec<String>,
    #[serde(default)]
    not: bool,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    error: Option<String>,
}

fn split_traits(traits: &str) -> SmallVec<[String; 4]> {
    traits
        .split('.')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl RawCard {
    fn into_card(self) -> Result<Card> {
        if self.code.trim().is_empty() {
            return Err(DeckError::InvalidCardFormat(format!(
                "Missing card code for '{}'",
                self.name
            )));
        }

        let faction = match self.faction_code.as_deref() {
            None => Faction::Neutral,
            Some(code) => Faction::from_code(code).ok_or_else(|| {
                DeckError::InvalidCardFormat(format!(
                    "Unknown faction '{code}' on card {}",
                    self.code
                ))
            })?,
        };
        let faction2 = self.faction2_code.as_deref().and_then(Faction::from_code);

        let traits = self
            .real_traits
            .as_deref()
            .or(self.traits.as_deref())
            .map(split_traits)
            .unwrap_or_default();

        let restrictions = self
            .restrictions
            .map(|r| r.investigator.into_keys().map(CardCode::new).collect())
            .unwrap_or_default();

        let card_type = CardType::from_code(&self.type_code);
        let deck_requirements = self.deck_requirements.map(|raw| DeckRequirements {
            size: raw.size.unwrap_or(DEFAULT_DECK_SIZE),
            cards: raw
                .card
                .into_iter()
                .map(|(code, alternatives)| {
                    let mut required = RequiredCard::new(code.as_str());
                    for alt in alternatives.into_keys().filter(|alt| *alt != code) {
                        required = required.or(alt);
                    }
                    required
                })
                .collect(),
            random: raw.random,
        });
        let deck_options = self
            .deck_options
            .into_iter()
            .map(|raw| DeckOption {
                factions: raw
                    .faction
                    .iter()
                    .filter_map(|f| Faction::from_code(f))
                    .collect(),
                level: raw.level,
                types: raw.type_code.iter().map(|t| CardType::from_code(t)).collect(),
                traits: raw.traits,
                uses: raw.uses,
                slots: raw.slot,
                not: raw.not,
                limit: raw.limit,
                error: raw.error,
            })
            .collect();

        Ok(Card {
            code: CardCode::new(self.code),
            name: self.name,
            subname: self.subname,
            card_type,
            subtype: self.subtype_code.as_deref().and_then(CardSubtype::from_code),
            faction,
            faction2,
            pack_code: PackCode::new(self.pack_code.unwrap_or_default()),
            position: self.position,
            cost: self.cost,
            xp: self.xp,
            skills: SkillIcons {
                willpower: self.skill_willpower.unwrap_or(0),
                intellect: self.skill_intellect.unwrap_or(0),
                combat: self.skill_combat.unwrap_or(0),
                agility: self.skill_agility.unwrap_or(0),
                wild: self.skill_wild.unwrap_or(0),
            },
            slot: self.slot,
            traits,
            uses: self.uses,
            text: self.text,
            is_unique: self.is_unique,
            permanent: self.permanent,
            double_sided: self.double_sided,
            exile: self.exile,
            exceptional: self.exceptional,
            deck_limit: self.deck_limit.unwrap_or(2),
            quantity: self.quantity.unwrap_or(1),
            health: self.health,
            sanity: self.sanity,
            restrictions,
            deck_requirements,
            deck_options,
        })
    }
}

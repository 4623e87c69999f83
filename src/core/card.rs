//! Card types and definitions

use crate::core::{CardCode, DeckOption, DeckRequirements, Faction, PackCode, Skill};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Investigator,
    Asset,
    Event,
    Skill,
    Treachery,
    Enemy,
    Location,
    Act,
    Agenda,
    Scenario,
    Story,
    Other,
}

impl CardType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "investigator" => CardType::Investigator,
            "asset" => CardType::Asset,
            "event" => CardType::Event,
            "skill" => CardType::Skill,
            "treachery" => CardType::Treachery,
            "enemy" => CardType::Enemy,
            "location" => CardType::Location,
            "act" => CardType::Act,
            "agenda" => CardType::Agenda,
            "scenario" => CardType::Scenario,
            "story" => CardType::Story,
            _ => CardType::Other,
        }
    }

    /// Section heading used when listing a deck
    pub fn heading(&self) -> &'static str {
        match self {
            CardType::Investigator => "Investigator",
            CardType::Asset => "Assets",
            CardType::Event => "Event",
            CardType::Skill => "Skill",
            CardType::Treachery => "Treachery",
            CardType::Enemy => "Enemy",
            CardType::Location => "Location",
            CardType::Act => "Act",
            CardType::Agenda => "Agenda",
            CardType::Scenario => "Scenario",
            CardType::Story => "Story",
            CardType::Other => "Other",
        }
    }
}

/// Weakness subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSubtype {
    /// Signature weakness bound to an investigator or story
    Weakness,
    /// Weakness drawn at random from the basic weakness pool
    #[serde(rename = "basicweakness")]
    BasicWeakness,
}

impl CardSubtype {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "weakness" => Some(CardSubtype::Weakness),
            "basicweakness" => Some(CardSubtype::BasicWeakness),
            _ => None,
        }
    }
}

/// Skill icons printed on a card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillIcons {
    pub willpower: u8,
    pub intellect: u8,
    pub combat: u8,
    pub agility: u8,
    pub wild: u8,
}

impl SkillIcons {
    pub fn get(&self, skill: Skill) -> u8 {
        match skill {
            Skill::Willpower => self.willpower,
            Skill::Intellect => self.intellect,
            Skill::Combat => self.combat,
            Skill::Agility => self.agility,
            Skill::Wild => self.wild,
        }
    }

    pub fn total(&self) -> u32 {
        Skill::ALL.iter().map(|s| self.get(*s) as u32).sum()
    }
}

/// A catalog entry
///
/// Immutable reference data: decks refer to cards by `code` and never own
/// a `Card`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub code: CardCode,
    pub name: String,
    pub subname: Option<String>,
    pub card_type: CardType,
    pub subtype: Option<CardSubtype>,
    pub faction: Faction,
    /// Second class for multi-class cards
    pub faction2: Option<Faction>,
    pub pack_code: PackCode,
    /// Position inside its pack
    pub position: u32,
    /// None for cards with no cost or X cost
    pub cost: Option<i32>,
    /// Level; None for cards that have no level at all (weaknesses, encounter)
    pub xp: Option<u32>,
    pub skills: SkillIcons,
    /// Asset slot, e.g. "Hand", "Hand x2", "Hand. Arcane"
    pub slot: Option<String>,
    pub traits: SmallVec<[String; 4]>,
    /// Uses keyword, e.g. "Charges", "Ammo"
    pub uses: Option<String>,
    pub text: Option<String>,
    pub is_unique: bool,
    pub permanent: bool,
    pub double_sided: bool,
    pub exile: bool,
    pub exceptional: bool,
    /// Copies allowed per deck
    pub deck_limit: u32,
    /// Copies shipped in the pack
    pub quantity: u32,
    pub health: Option<u32>,
    pub sanity: Option<u32>,
    /// Investigators this card is restricted to (signature cards)
    pub restrictions: SmallVec<[CardCode; 2]>,
    /// Only set on investigators
    pub deck_requirements: Option<DeckRequirements>,
    /// Only set on investigators
    pub deck_options: Vec<DeckOption>,
}

impl Card {
    pub fn new(code: impl Into<CardCode>, name: impl Into<String>, card_type: CardType) -> Self {
        Card {
            code: code.into(),
            name: name.into(),
            subname: None,
            card_type,
            subtype: None,
            faction: Faction::Neutral,
            faction2: None,
            pack_code: PackCode::new("core"),
            position: 0,
            cost: None,
            xp: None,
            skills: SkillIcons::default(),
            slot: None,
            traits: SmallVec::new(),
            uses: None,
            text: None,
            is_unique: false,
            permanent: false,
            double_sided: false,
            exile: false,
            exceptional: false,
            deck_limit: 2,
            quantity: 2,
            health: None,
            sanity: None,
            restrictions: SmallVec::new(),
            deck_requirements: None,
            deck_options: Vec::new(),
        }
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    pub fn with_xp(mut self, xp: u32) -> Self {
        self.xp = Some(xp);
        self
    }

    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_pack(mut self, pack: impl Into<PackCode>, position: u32) -> Self {
        self.pack_code = pack.into();
        self.position = position;
        self
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    pub fn with_subtype(mut self, subtype: CardSubtype) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn with_traits(mut self, traits: &[&str]) -> Self {
        self.traits = traits.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_skills(mut self, skills: SkillIcons) -> Self {
        self.skills = skills;
        self
    }

    pub fn restricted_to(mut self, investigator: impl Into<CardCode>) -> Self {
        self.restrictions.push(investigator.into());
        self
    }

    pub fn with_deck_requirements(mut self, requirements: DeckRequirements) -> Self {
        self.deck_requirements = Some(requirements);
        self
    }

    pub fn with_deck_options(mut self, options: Vec<DeckOption>) -> Self {
        self.deck_options = options;
        self
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.card_type == card_type
    }

    pub fn is_investigator(&self) -> bool {
        self.is_type(CardType::Investigator)
    }

    pub fn is_weakness(&self) -> bool {
        self.subtype.is_some()
    }

    pub fn is_basic_weakness(&self) -> bool {
        self.subtype == Some(CardSubtype::BasicWeakness)
    }

    /// Signature cards may only be included by the investigators listed
    pub fn is_signature(&self) -> bool {
        !self.restrictions.is_empty()
    }

    pub fn is_restricted_to(&self, investigator: &CardCode) -> bool {
        self.restrictions.iter().any(|c| c == investigator)
    }

    pub fn has_faction(&self, faction: Faction) -> bool {
        self.faction == faction || self.faction2 == Some(faction)
    }

    /// Trait match is case-insensitive ("Tome" matches "tome")
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t.eq_ignore_ascii_case(name))
    }

    /// Slot parts: "Hand. Arcane" -> ["Hand", "Arcane"]
    pub fn slot_parts(&self) -> impl Iterator<Item = &str> {
        self.slot
            .iter()
            .flat_map(|s| s.split('.'))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Weaknesses, permanents and signature cards are listed separately
    /// and do not count toward the investigator's deck size.
    pub fn is_special(&self) -> bool {
        self.is_weakness() || self.permanent || self.is_signature()
    }

    pub fn counts_toward_deck_size(&self) -> bool {
        !self.is_special() && !self.is_investigator()
    }

    /// Cards that start in play or never enter the draw pile
    pub fn is_drawable(&self) -> bool {
        !self.permanent && !self.double_sided
    }

    /// "Name (Subname)" when the title alone is ambiguous
    pub fn display_name(&self) -> String {
        match &self.subname {
            Some(sub) => format!("{} ({sub})", self.name),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_creation() {
        let card = Card::new("01020", "Machete", CardType::Asset)
            .with_faction(Faction::Guardian)
            .with_cost(3)
            .with_xp(0)
            .with_slot("Hand");

        assert_eq!(card.code.as_str(), "01020");
        assert_eq!(card.deck_limit, 2);
        assert!(card.is_type(CardType::Asset));
        assert!(card.counts_toward_deck_size());
        assert!(card.is_drawable());
        assert!(!card.is_special());
    }

    #[test]
    fn test_special_cards() {
        let weakness = Card::new("01007", "Cover Up", CardType::Treachery)
            .with_subtype(CardSubtype::Weakness)
            .restricted_to("01001");
        assert!(weakness.is_special());
        assert!(!weakness.counts_toward_deck_size());
        assert!(weakness.is_restricted_to(&CardCode::new("01001")));

        let mut permanent = Card::new("05000", "Charisma", CardType::Asset);
        permanent.permanent = true;
        assert!(permanent.is_special());
        assert!(!permanent.is_drawable());
    }

    #[test]
    fn test_slot_parts() {
        let card = Card::new("02000", "Spell", CardType::Asset).with_slot("Hand. Arcane");
        let parts: Vec<_> = card.slot_parts().collect();
        assert_eq!(parts, vec!["Hand", "Arcane"]);

        let no_slot = Card::new("02001", "Event", CardType::Event);
        assert_eq!(no_slot.slot_parts().count(), 0);
    }

    #[test]
    fn test_multi_class() {
        let mut card = Card::new("08000", "Dual", CardType::Event).with_faction(Faction::Rogue);
        card.faction2 = Some(Faction::Survivor);
        assert!(card.has_faction(Faction::Rogue));
        assert!(card.has_faction(Faction::Survivor));
        assert!(!card.has_faction(Faction::Seeker));
    }

    #[test]
    fn test_skill_icon_total() {
        let icons = SkillIcons {
            willpower: 1,
            wild: 2,
            ..Default::default()
        };
        assert_eq!(icons.total(), 3);
        assert_eq!(icons.get(Skill::Wild), 2);
    }
}

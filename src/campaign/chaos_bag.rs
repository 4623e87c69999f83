//! Chaos bag contents, per-cycle starting bags and token draws

use crate::{DeckError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A chaos token; declaration order is display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChaosToken {
    #[serde(rename = "+1")]
    PlusOne,
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "-1")]
    MinusOne,
    #[serde(rename = "-2")]
    MinusTwo,
    #[serde(rename = "-3")]
    MinusThree,
    #[serde(rename = "-4")]
    MinusFour,
    #[serde(rename = "-5")]
    MinusFive,
    #[serde(rename = "-6")]
    MinusSix,
    #[serde(rename = "-7")]
    MinusSeven,
    #[serde(rename = "-8")]
    MinusEight,
    #[serde(rename = "skull")]
    Skull,
    #[serde(rename = "cultist")]
    Cultist,
    #[serde(rename = "tablet")]
    Tablet,
    #[serde(rename = "elder_thing")]
    ElderThing,
    #[serde(rename = "auto_fail")]
    AutoFail,
    #[serde(rename = "elder_sign")]
    ElderSign,
}

impl ChaosToken {
    pub const ALL: [ChaosToken; 16] = [
        ChaosToken::PlusOne,
        ChaosToken::Zero,
        ChaosToken::MinusOne,
        ChaosToken::MinusTwo,
        ChaosToken::MinusThree,
        ChaosToken::MinusFour,
        ChaosToken::MinusFive,
        ChaosToken::MinusSix,
        ChaosToken::MinusSeven,
        ChaosToken::MinusEight,
        ChaosToken::Skull,
        ChaosToken::Cultist,
        ChaosToken::Tablet,
        ChaosToken::ElderThing,
        ChaosToken::AutoFail,
        ChaosToken::ElderSign,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ChaosToken::PlusOne => "+1",
            ChaosToken::Zero => "0",
            ChaosToken::MinusOne => "-1",
            ChaosToken::MinusTwo => "-2",
            ChaosToken::MinusThree => "-3",
            ChaosToken::MinusFour => "-4",
            ChaosToken::MinusFive => "-5",
            ChaosToken::MinusSix => "-6",
            ChaosToken::MinusSeven => "-7",
            ChaosToken::MinusEight => "-8",
            ChaosToken::Skull => "skull",
            ChaosToken::Cultist => "cultist",
            ChaosToken::Tablet => "tablet",
            ChaosToken::ElderThing => "elder_thing",
            ChaosToken::AutoFail => "auto_fail",
            ChaosToken::ElderSign => "elder_sign",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        ChaosToken::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Printed modifier for numeric tokens
    pub fn modifier(&self) -> Option<i32> {
        match self {
            ChaosToken::PlusOne => Some(1),
            ChaosToken::Zero => Some(0),
            ChaosToken::MinusOne => Some(-1),
            ChaosToken::MinusTwo => Some(-2),
            ChaosToken::MinusThree => Some(-3),
            ChaosToken::MinusFour => Some(-4),
            ChaosToken::MinusFive => Some(-5),
            ChaosToken::MinusSix => Some(-6),
            ChaosToken::MinusSeven => Some(-7),
            ChaosToken::MinusEight => Some(-8),
            _ => None,
        }
    }

    /// Symbol tokens whose effect depends on the scenario
    pub fn is_special(&self) -> bool {
        self.modifier().is_none()
    }

    /// Copies of this token in the physical game
    pub fn limit(&self) -> u32 {
        match self {
            ChaosToken::PlusOne => 3,
            ChaosToken::Zero => 4,
            ChaosToken::MinusOne => 5,
            ChaosToken::MinusTwo => 4,
            ChaosToken::MinusThree => 3,
            ChaosToken::MinusFour | ChaosToken::MinusFive => 2,
            ChaosToken::MinusSix | ChaosToken::MinusSeven | ChaosToken::MinusEight => 1,
            ChaosToken::Skull | ChaosToken::Cultist | ChaosToken::Tablet | ChaosToken::ElderThing => 4,
            ChaosToken::AutoFail | ChaosToken::ElderSign => 1,
        }
    }
}

impl fmt::Display for ChaosToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Standard,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "standard" => Some(Difficulty::Standard),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Token counts in a campaign's bag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChaosBag(BTreeMap<ChaosToken, u32>);

impl ChaosBag {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_counts(counts: &[(ChaosToken, u32)]) -> Self {
        ChaosBag(counts.iter().copied().collect())
    }

    /// Starting bag for a cycle at a difficulty; None for unknown cycles
    pub fn for_cycle(cycle_code: &str, difficulty: Difficulty) -> Option<Self> {
        let bags = match cycle_code {
            "core" | "rtnotz" => NOTZ_BAGS,
            "dwl" => DWL_BAGS,
            "ptc" => PTC_BAGS,
            "tfa" => TFA_BAGS,
            _ => return None,
        };
        Some(ChaosBag::from_counts(bags[difficulty.index()]))
    }

    pub fn count(&self, token: ChaosToken) -> u32 {
        self.0.get(&token).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    /// Set a token count, refusing counts above the physical token limit
    pub fn set(&mut self, token: ChaosToken, count: u32) -> Result<()> {
        if count > token.limit() {
            return Err(DeckError::InvalidChaosBag(format!(
                "{count} x {token} exceeds the limit of {}",
                token.limit()
            )));
        }
        if count == 0 {
            self.0.remove(&token);
        } else {
            self.0.insert(token, count);
        }
        Ok(())
    }

    pub fn add(&mut self, token: ChaosToken) -> Result<()> {
        self.set(token, self.count(token) + 1)
    }

    pub fn remove(&mut self, token: ChaosToken) {
        match self.count(token) {
            0 => {}
            1 => {
                self.0.remove(&token);
            }
            n => {
                self.0.insert(token, n - 1);
            }
        }
    }

    /// Check every count against the token limits (for bags read from disk)
    pub fn validate(&self) -> Result<()> {
        for (token, &count) in &self.0 {
            if count > token.limit() {
                return Err(DeckError::InvalidChaosBag(format!(
                    "{count} x {token} exceeds the limit of {}",
                    token.limit()
                )));
            }
        }
        Ok(())
    }

    /// Draw one token uniformly among all tokens in the bag, without removing it
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ChaosToken> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        for (token, &count) in &self.0 {
            if pick < count {
                return Some(*token);
            }
            pick -= count;
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChaosToken, u32)> + '_ {
        self.0.iter().map(|(t, c)| (*t, *c))
    }
}

impl fmt::Display for ChaosBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .flat_map(|(token, count)| std::iter::repeat(token.code()).take(count as usize))
            .map(str::to_string)
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

use ChaosToken::*;

type BagTable = [&'static [(ChaosToken, u32)]; 4];

const NOTZ_BAGS: BagTable = [
    &[(PlusOne, 2), (Zero, 3), (MinusOne, 3), (MinusTwo, 2), (Skull, 2), (Cultist, 1), (Tablet, 1), (AutoFail, 1), (ElderSign, 1)],
    &[(PlusOne, 1), (Zero, 2), (MinusOne, 3), (MinusTwo, 2), (MinusThree, 1), (MinusFour, 1), (Skull, 2), (Cultist, 1), (Tablet, 1), (AutoFail, 1), (ElderSign, 1)],
    &[(Zero, 3), (MinusOne, 2), (MinusTwo, 2), (MinusThree, 2), (MinusFour, 1), (MinusFive, 1), (Skull, 2), (Cultist, 1), (Tablet, 1), (AutoFail, 1), (ElderSign, 1)],
    &[(Zero, 1), (MinusOne, 2), (MinusTwo, 2), (MinusThree, 2), (MinusFour, 2), (MinusFive, 1), (MinusSix, 1), (MinusEight, 1), (Skull, 2), (Cultist, 1), (Tablet, 1), (AutoFail, 1), (ElderSign, 1)],
];

const DWL_BAGS: BagTable = [
    &[(PlusOne, 2), (Zero, 3), (MinusOne, 3), (MinusTwo, 2), (Skull, 2), (Cultist, 1), (AutoFail, 1), (ElderSign, 1)],
    &[(PlusOne, 1), (Zero, 2), (MinusOne, 3), (MinusTwo, 2), (MinusThree, 1), (MinusFour, 1), (Skull, 2), (Cultist, 1), (AutoFail, 1), (ElderSign, 1)],
    &[(Zero, 3), (MinusOne, 2), (MinusTwo, 2), (MinusThree, 2), (MinusFour, 1), (MinusFive, 1), (Skull, 2), (Cultist, 1), (AutoFail, 1), (ElderSign, 1)],
    &[(Zero, 1), (MinusOne, 2), (MinusTwo, 2), (MinusThree, 2), (MinusFour, 2), (MinusFive, 1), (MinusSix, 1), (MinusEight, 1), (Skull, 2), (Cultist, 1), (AutoFail, 1), (ElderSign, 1)],
];

const PTC_BAGS: BagTable = [
    &[(PlusOne, 2), (Zero, 3), (MinusOne, 3), (MinusTwo, 2), (Skull, 3), (AutoFail, 1), (ElderSign, 1)],
    &[(PlusOne, 1), (Zero, 2), (MinusOne, 3), (MinusTwo, 2), (MinusThree, 1), (MinusFour, 1), (Skull, 3), (AutoFail, 1), (ElderSign, 1)],
    &[(Zero, 3), (MinusOne, 2), (MinusTwo, 2), (MinusThree, 3), (MinusFour, 1), (MinusFive, 1), (Skull, 3), (AutoFail, 1), (ElderSign, 1)],
    &[(Zero, 1), (MinusOne, 2), (MinusTwo, 2), (MinusThree, 3), (MinusFour, 2), (MinusFive, 1), (MinusSix, 1), (MinusEight, 1), (Skull, 3), (AutoFail, 1), (ElderSign, 1)],
];

const TFA_BAGS: BagTable = [
    &[(PlusOne, 2), (Zero, 3), (MinusOne, 2), (MinusTwo, 1), (MinusThree, 1), (Skull, 2), (ElderThing, 1), (AutoFail, 1), (ElderSign, 1)],
    &[(PlusOne, 1), (Zero, 3), (MinusOne, 1), (MinusTwo, 2), (MinusThree, 1), (MinusFive, 1), (Skull, 2), (ElderThing, 1), (AutoFail, 1), (ElderSign, 1)],
    &[(PlusOne, 1), (Zero, 2), (MinusOne, 1), (MinusTwo, 1), (MinusThree, 2), (MinusFour, 1), (MinusSix, 1), (Skull, 2), (ElderThing, 1), (AutoFail, 1), (ElderSign, 1)],
    &[(Zero, 1), (MinusOne, 1), (MinusTwo, 2), (MinusThree, 2), (MinusFour, 2), (MinusSix, 1), (MinusEight, 1), (Skull, 2), (ElderThing, 1), (AutoFail, 1), (ElderSign, 1)],
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    #[test]
    fn test_standard_core_bag() {
        let bag = ChaosBag::for_cycle("core", Difficulty::Standard).unwrap();
        assert_eq!(bag.total(), 16);
        assert_eq!(bag.count(ChaosToken::Skull), 2);
        assert_eq!(bag.count(ChaosToken::ElderThing), 0);
        assert!(bag.validate().is_ok());
    }

    #[test]
    fn test_every_default_bag_respects_limits() {
        for cycle in ["core", "rtnotz", "dwl", "ptc", "tfa"] {
            for difficulty in [
                Difficulty::Easy,
                Difficulty::Standard,
                Difficulty::Hard,
                Difficulty::Expert,
            ] {
                let bag = ChaosBag::for_cycle(cycle, difficulty).unwrap();
                assert!(bag.validate().is_ok(), "{cycle} {difficulty:?}");
            }
        }
        assert!(ChaosBag::for_cycle("nope", Difficulty::Easy).is_none());
    }

    #[test]
    fn test_token_limits() {
        let mut bag = ChaosBag::new();
        bag.add(ChaosToken::AutoFail).unwrap();
        assert!(matches!(
            bag.add(ChaosToken::AutoFail),
            Err(DeckError::InvalidChaosBag(_))
        ));
        bag.remove(ChaosToken::AutoFail);
        assert_eq!(bag.total(), 0);
    }

    #[test]
    fn test_serde_uses_token_codes() {
        let json = r#"{"+1": 1, "elder_sign": 1, "-8": 1}"#;
        let bag: ChaosBag = serde_json::from_str(json).unwrap();
        assert_eq!(bag.count(ChaosToken::MinusEight), 1);
        assert_eq!(bag.to_string(), "+1, -8, elder_sign");

        let over: ChaosBag = serde_json::from_str(r#"{"elder_sign": 2}"#).unwrap();
        assert!(over.validate().is_err());
    }

    #[test]
    fn test_draw_is_seeded() {
        let bag = ChaosBag::for_cycle("tfa", Difficulty::Hard).unwrap();
        let mut a = ChaCha12Rng::seed_from_u64(9);
        let mut b = ChaCha12Rng::seed_from_u64(9);
        let draws_a: Vec<_> = (0..20).map(|_| bag.draw(&mut a)).collect();
        let draws_b: Vec<_> = (0..20).map(|_| bag.draw(&mut b)).collect();
        assert_eq!(draws_a, draws_b);
        assert!(draws_a.iter().all(|t| t.is_some_and(|t| bag.count(t) > 0)));
        assert_eq!(ChaosBag::new().draw(&mut a), None);
    }

    #[test]
    fn test_token_codes_round_trip() {
        for token in ChaosToken::ALL {
            assert_eq!(ChaosToken::from_code(token.code()), Some(token));
        }
        assert_eq!(ChaosToken::MinusThree.modifier(), Some(-3));
        assert!(ChaosToken::Tablet.is_special());
    }
}

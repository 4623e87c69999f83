//! Per-investigator trauma

use crate::core::Card;
use serde::{Deserialize, Serialize};

/// Lasting damage an investigator carries between scenarios
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraumaData {
    pub physical: u32,
    pub mental: u32,
    /// Set directly by the campaign (e.g. a resolution), regardless of trauma
    pub killed: bool,
    pub insane: bool,
}

impl TraumaData {
    pub fn new(physical: u32, mental: u32) -> Self {
        TraumaData {
            physical,
            mental,
            ..Default::default()
        }
    }

    /// Killed outright or by physical trauma reaching health
    pub fn is_killed(&self, investigator: &Card) -> bool {
        self.killed || investigator.health.is_some_and(|h| self.physical >= h)
    }

    /// Insane outright or by mental trauma reaching sanity
    pub fn is_insane(&self, investigator: &Card) -> bool {
        self.insane || investigator.sanity.is_some_and(|s| self.mental >= s)
    }

    pub fn is_eliminated(&self, investigator: &Card) -> bool {
        self.is_killed(investigator) || self.is_insane(investigator)
    }

    pub fn has_trauma(&self) -> bool {
        self.physical > 0 || self.mental > 0 || self.killed || self.insane
    }

    /// "1 physical, 2 mental", "Killed", or "None"
    pub fn describe(&self, investigator: &Card) -> String {
        if self.is_killed(investigator) {
            return "Killed".to_string();
        }
        if self.is_insane(investigator) {
            return "Insane".to_string();
        }
        match (self.physical, self.mental) {
            (0, 0) => "None".to_string(),
            (p, 0) => format!("{p} physical"),
            (0, m) => format!("{m} mental"),
            (p, m) => format!("{p} physical, {m} mental"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardType;

    fn roland() -> Card {
        let mut card = Card::new("01001", "Roland Banks", CardType::Investigator);
        card.health = Some(9);
        card.sanity = Some(5);
        card
    }

    #[test]
    fn test_killed_and_insane_follow_thresholds() {
        let roland = roland();
        let trauma = TraumaData::new(8, 4);
        assert!(!trauma.is_eliminated(&roland));
        assert_eq!(trauma.describe(&roland), "8 physical, 4 mental");

        assert!(TraumaData::new(9, 0).is_killed(&roland));
        assert!(TraumaData::new(0, 5).is_insane(&roland));
        assert_eq!(TraumaData::new(0, 5).describe(&roland), "Insane");
    }

    #[test]
    fn test_explicit_flags() {
        let roland = roland();
        let trauma = TraumaData {
            killed: true,
            ..Default::default()
        };
        assert!(trauma.is_killed(&roland));
        assert!(trauma.has_trauma());
        assert_eq!(TraumaData::default().describe(&roland), "None");
    }
}

//! Deck loader (deck JSON and line-based text format)

use crate::core::{CardCode, DeckId, Slots};
use crate::{DeckError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A stored deck as exchanged with the deck store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub investigator_code: CardCode,
    pub slots: Slots,
    /// Deck this one was upgraded from
    #[serde(default)]
    pub previous_deck: Option<DeckId>,
    /// Deck this one was upgraded into
    #[serde(default)]
    pub next_deck: Option<DeckId>,
    #[serde(default)]
    pub taboo_id: Option<u32>,
    /// Reason code of the last validation, empty when legal
    #[serde(default)]
    pub problem: Option<String>,
    /// Experience spent on the upgrade that produced this deck
    #[serde(default)]
    pub xp: Option<u32>,
}

impl Deck {
    pub fn new(id: DeckId, name: impl Into<String>, investigator: impl Into<CardCode>) -> Self {
        Deck {
            id,
            name: name.into(),
            investigator_code: investigator.into(),
            slots: Slots::new(),
            previous_deck: None,
            next_deck: None,
            taboo_id: None,
            problem: None,
            xp: None,
        }
    }

    pub fn with_card(mut self, code: impl Into<CardCode>, count: u32) -> Self {
        self.slots.insert(code.into(), count);
        self
    }

    /// Total copies across all slots
    pub fn total_cards(&self) -> u32 {
        self.slots.values().sum()
    }
}

/// Deck loader for deck files
pub struct DeckLoader;

impl DeckLoader {
    /// Load a deck; `.json` files are read as JSON, anything else as text
    pub fn load_from_file(path: &Path) -> Result<Deck> {
        let content = fs::read_to_string(path).map_err(DeckError::IoError)?;
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            Self::parse_json(&content)
        } else {
            Self::parse_text(&content)
        }
    }

    pub fn parse_json(content: &str) -> Result<Deck> {
        serde_json::from_str(content)
            .map_err(|e| DeckError::InvalidDeckFormat(format!("Bad deck JSON: {e}")))
    }

    /// Parse the text format
    ///
    /// ```text
    /// # comment
    /// name: Roland starter
    /// investigator: 01001
    /// 2 01020 Machete
    /// 1 01006
    /// ```
    ///
    /// Anything after the code on a count line is ignored.
    pub fn parse_text(content: &str) -> Result<Deck> {
        let mut id = DeckId::new(0);
        let mut name = String::new();
        let mut investigator = None;
        let mut previous_deck = None;
        let mut taboo_id = None;
        let mut slots = Slots::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let is_count_line = line.starts_with(|c: char| c.is_ascii_digit());
            if let Some((key, value)) = line.split_once(':').filter(|_| !is_count_line) {
                let value = value.trim();
                match key.trim().to_lowercase().as_str() {
                    "name" => name = value.to_string(),
                    "investigator" => investigator = Some(CardCode::new(value)),
                    "id" => id = DeckId::new(parse_number(value, line_no)?),
                    "previous" => previous_deck = Some(DeckId::new(parse_number(value, line_no)?)),
                    "taboo" => taboo_id = Some(parse_number(value, line_no)?),
                    other => {
                        return Err(DeckError::InvalidDeckFormat(format!(
                            "line {}: unknown header '{other}'",
                            line_no + 1
                        )))
                    }
                }
                continue;
            }

            // Format: "<count> <code> [ignored name]"
            let mut parts = line.split_whitespace();
            let (Some(count_str), Some(code)) = (parts.next(), parts.next()) else {
                return Err(DeckError::InvalidDeckFormat(format!(
                    "line {}: expected '<count> <code>'",
                    line_no + 1
                )));
            };
            let count: u32 = parse_number(count_str, line_no)?;
            *slots.entry(CardCode::new(code)).or_insert(0) += count;
        }

        let investigator_code = investigator.ok_or_else(|| {
            DeckError::InvalidDeckFormat("Missing 'investigator:' header".to_string())
        })?;

        Ok(Deck {
            id,
            name,
            investigator_code,
            slots,
            previous_deck,
            next_deck: None,
            taboo_id,
            problem: None,
            xp: None,
        })
    }

    pub fn to_json(deck: &Deck) -> Result<String> {
        Ok(serde_json::to_string_pretty(deck)?)
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, line_no: usize) -> Result<T> {
    value.trim().parse().map_err(|_| {
        DeckError::InvalidDeckFormat(format!("line {}: invalid number '{value}'", line_no + 1))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_deck() {
        let content = r#"
# Starter deck
name: Roland starter
investigator: 01001
taboo: 3

2 01020 Machete
1 01006 Roland's .38 Special
1 01007
1 01020
"#;

        let deck = DeckLoader::parse_text(content).unwrap();
        assert_eq!(deck.name, "Roland starter");
        assert_eq!(deck.investigator_code.as_str(), "01001");
        assert_eq!(deck.taboo_id, Some(3));
        assert_eq!(deck.slots.len(), 3);
        assert_eq!(deck.slots[&CardCode::new("01020")], 3);
        assert_eq!(deck.total_cards(), 5);
    }

    #[test]
    fn test_text_deck_requires_investigator() {
        let err = DeckLoader::parse_text("2 01020\n").unwrap_err();
        assert!(matches!(err, DeckError::InvalidDeckFormat(_)));
    }

    #[test]
    fn test_text_deck_rejects_bad_count() {
        let err = DeckLoader::parse_text("investigator: 01001\ntwo 01020\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_json_deck() {
        let json = r#"{
            "id": 1234,
            "name": "The Fed",
            "investigator_code": "01001",
            "slots": {"01006": 1, "01007": 1, "01020": 2},
            "previous_deck": 1200,
            "taboo_id": null
        }"#;
        let deck = DeckLoader::parse_json(json).unwrap();
        assert_eq!(deck.id, DeckId::new(1234));
        assert_eq!(deck.previous_deck, Some(DeckId::new(1200)));
        assert_eq!(deck.next_deck, None);
        assert_eq!(deck.total_cards(), 4);
    }

    #[test]
    fn test_negative_counts_rejected() {
        let json = r#"{"id": 1, "name": "x", "investigator_code": "01001", "slots": {"01020": -1}}"#;
        assert!(DeckLoader::parse_json(json).is_err());
    }
}

//! Taboo list loader
//!
//! The card database publishes taboo lists with the per-card adjustments
//! either as a JSON array or as a JSON array encoded inside a string.

use crate::core::{CardCode, TabooEntry, TabooSet};
use crate::{DeckError, Result};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub struct TabooLoader;

#[derive(Debug, Deserialize)]
struct RawTabooSet {
    id: u32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    code: Option<String>,
    cards: RawTabooCards,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTabooCards {
    List(Vec<RawTabooCard>),
    Encoded(String),
}

#[derive(Debug, Deserialize)]
struct RawTabooCard {
    code: String,
    #[serde(default)]
    xp: i32,
    #[serde(default)]
    exceptional: bool,
    #[serde(default)]
    deck_limit: Option<u32>,
    #[serde(default)]
    text: Option<String>,
}

impl TabooLoader {
    /// Load all taboo sets from a file holding an array of sets
    pub fn load_from_file(path: &Path) -> Result<Vec<TabooSet>> {
        let content = fs::read_to_string(path).map_err(DeckError::IoError)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Vec<TabooSet>> {
        let raw: Vec<RawTabooSet> = serde_json::from_str(content)
            .map_err(|e| DeckError::InvalidTabooFormat(e.to_string()))?;
        raw.into_iter().map(convert).collect()
    }

    /// Pick the set with the given id out of a taboo file
    pub fn load_set(path: &Path, id: u32) -> Result<TabooSet> {
        Self::load_from_file(path)?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| DeckError::InvalidTabooFormat(format!("No taboo set with id {id}")))
    }
}

fn convert(raw: RawTabooSet) -> Result<TabooSet> {
    let cards = match raw.cards {
        RawTabooCards::List(cards) => cards,
        RawTabooCards::Encoded(s) => serde_json::from_str(&s)
            .map_err(|e| DeckError::InvalidTabooFormat(format!("set {}: {e}", raw.id)))?,
    };
    let name = raw.name.or(raw.code).unwrap_or_else(|| format!("Taboo {}", raw.id));
    debug!("Taboo set {} ({name}) adjusts {} cards", raw.id, cards.len());

    let mut set = TabooSet::new(raw.id, name);
    for card in cards {
        set.cards.insert(
            CardCode::new(card.code),
            TabooEntry {
                xp: card.xp,
                exceptional: card.exceptional,
                deck_limit: card.deck_limit,
                text: card.text,
            },
        );
    }
    Ok(set)
}

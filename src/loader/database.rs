//! Card database for looking up card definitions
//!
//! Provides lookup by code, catalog ordering, and the `PlayerCards`
//! capability the deck and campaign code depend on.

use crate::core::{Card, CardCode, PackCode};
use crate::loader::card::CardLoader;
use crate::{DeckError, Result};
use deunicode::deunicode;
use log::{debug, info, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Read access to the player card catalog
///
/// Aggregation, validation and campaign helpers take this trait rather than
/// a concrete database so callers can supply any indexed collection.
pub trait PlayerCards {
    fn card(&self, code: &CardCode) -> Option<&Card>;

    /// Index of the card in catalog order (pack order, then position)
    fn catalog_position(&self, code: &CardCode) -> Option<usize>;

    fn all_cards(&self) -> Box<dyn Iterator<Item = &Card> + '_>;
}

/// Database of card definitions loaded from card-database JSON
#[derive(Debug, Clone, Default)]
pub struct CardDatabase {
    cards: Vec<Card>,
    by_code: FxHashMap<CardCode, usize>,
}

impl CardDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        CardDatabase {
            cards: Vec::new(),
            by_code: FxHashMap::default(),
        }
    }

    /// Build from cards already in catalog order
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut db = CardDatabase::new();
        for card in cards {
            db.add_card(card);
        }
        db
    }

    /// Load cards from one JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let cards = CardLoader::load_from_file(path)?;
        let db = Self::from_cards(cards);
        info!("Loaded {} cards from {}", db.len(), path.display());
        Ok(db)
    }

    /// Load every `.json` file below `dir`
    ///
    /// Files are parsed in parallel but merged in sorted path order, so the
    /// catalog order does not depend on thread scheduling.
    pub fn load_from_directory(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            return Err(DeckError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Card directory not found: {dir:?}"),
            )));
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in jwalk::WalkDir::new(dir).skip_hidden(true) {
            let entry = entry.map_err(|e| {
                DeckError::IoError(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
            })?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().and_then(|s| s.to_str()) == Some("json")
            {
                paths.push(path);
            }
        }
        paths.sort();

        let parsed: Vec<Vec<Card>> = paths
            .par_iter()
            .map(|path| CardLoader::load_from_file(path))
            .collect::<Result<_>>()?;

        let db = Self::from_cards(parsed.into_iter().flatten());
        info!(
            "Loaded {} cards from {} files under {}",
            db.len(),
            paths.len(),
            dir.display()
        );
        Ok(db)
    }

    /// Load from a file or a directory, whichever `path` is
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Self::load_from_directory(path)
        } else {
            Self::load_from_file(path)
        }
    }

    /// Append a card; a duplicate code keeps the first definition
    pub fn add_card(&mut self, card: Card) {
        if self.by_code.contains_key(&card.code) {
            warn!("Duplicate card code {} ignored", card.code);
            return;
        }
        self.by_code.insert(card.code.clone(), self.cards.len());
        self.cards.push(card);
    }

    pub fn get_card(&self, code: &CardCode) -> Option<&Card> {
        self.by_code.get(code).map(|&i| &self.cards[i])
    }

    pub fn contains(&self, code: &CardCode) -> bool {
        self.by_code.contains_key(code)
    }

    /// Look up an investigator card, failing on unknown or non-investigator codes
    pub fn investigator(&self, code: &CardCode) -> Result<&Card> {
        let card = self
            .get_card(code)
            .ok_or_else(|| DeckError::CardNotFound(code.to_string()))?;
        if !card.is_investigator() {
            return Err(DeckError::NotAnInvestigator(code.to_string()));
        }
        Ok(card)
    }

    /// Name search ignoring case and diacritics ("pere" finds "Père")
    pub fn find_by_name(&self, query: &str) -> Vec<&Card> {
        let needle = normalize_name(query);
        let hits: Vec<&Card> = self
            .cards
            .iter()
            .filter(|c| normalize_name(&c.name).contains(&needle))
            .collect();
        debug!("Name search '{query}' matched {} cards", hits.len());
        hits
    }

    pub fn investigators(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.is_investigator())
    }

    /// Basic weaknesses printed in any of `packs`
    pub fn basic_weaknesses<'a>(&'a self, packs: &'a [PackCode]) -> impl Iterator<Item = &'a Card> {
        self.cards.iter().filter(move |c| {
            c.is_basic_weakness()
                && !c.code.is_random_basic_weakness()
                && packs.contains(&c.pack_code)
        })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

impl PlayerCards for CardDatabase {
    fn card(&self, code: &CardCode) -> Option<&Card> {
        self.get_card(code)
    }

    fn catalog_position(&self, code: &CardCode) -> Option<usize> {
        self.by_code.get(code).copied()
    }

    fn all_cards(&self) -> Box<dyn Iterator<Item = &Card> + '_> {
        Box::new(self.cards.iter())
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    deunicode(name).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardSubtype, CardType};

    fn sample() -> CardDatabase {
        CardDatabase::from_cards([
            Card::new("01001", "Roland Banks", CardType::Investigator),
            Card::new("01020", "Machete", CardType::Asset),
            Card::new("01000", "Random Basic Weakness", CardType::Treachery)
                .with_subtype(CardSubtype::BasicWeakness),
            Card::new("01096", "Amnesia", CardType::Treachery)
                .with_subtype(CardSubtype::BasicWeakness),
            Card::new("02037", "Père Lachaise", CardType::Location).with_pack("dwl", 37),
        ])
    }

    #[test]
    fn test_empty_database() {
        let db = CardDatabase::new();
        assert_eq!(db.len(), 0);
        assert!(db.is_empty());
        assert!(db.get_card(&CardCode::new("01020")).is_none());
    }

    #[test]
    fn test_lookup_and_position() {
        let db = sample();
        assert_eq!(db.len(), 5);
        assert_eq!(db.card(&CardCode::new("01020")).unwrap().name, "Machete");
        assert_eq!(db.catalog_position(&CardCode::new("01020")), Some(1));
        assert_eq!(db.catalog_position(&CardCode::new("99999")), None);
    }

    #[test]
    fn test_duplicate_code_keeps_first() {
        let mut db = sample();
        db.add_card(Card::new("01020", "Other Machete", CardType::Asset));
        assert_eq!(db.len(), 5);
        assert_eq!(db.get_card(&CardCode::new("01020")).unwrap().name, "Machete");
    }

    #[test]
    fn test_investigator_lookup() {
        let db = sample();
        assert!(db.investigator(&CardCode::new("01001")).is_ok());
        assert!(matches!(
            db.investigator(&CardCode::new("01020")),
            Err(DeckError::NotAnInvestigator(_))
        ));
        assert!(matches!(
            db.investigator(&CardCode::new("77777")),
            Err(DeckError::CardNotFound(_))
        ));
    }

    #[test]
    fn test_find_by_name_ignores_diacritics() {
        let db = sample();
        let hits = db.find_by_name("pere");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code.as_str(), "02037");
    }

    #[test]
    fn test_basic_weaknesses_skip_placeholder() {
        let db = sample();
        let packs = [PackCode::new("core")];
        let codes: Vec<_> = db.basic_weaknesses(&packs).map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["01096"]);
    }

    #[test]
    fn test_load_missing_directory() {
        let result = CardDatabase::load_from_directory(Path::new("no/such/dir"));
        assert!(result.is_err());
    }
}

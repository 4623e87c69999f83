//! End-to-end deck workflow against the test catalog
//!
//! Loads `test_data/cards.json` and walks a deck through the steps a
//! player takes: build, validate, upgrade, receive a weakness, draw.

use arkham_deck_rs::{
    campaign::{apply_weakness_to_deck, WeaknessSet},
    core::{CardCode, CardType, DeckId, Faction, PackCode},
    deck::{
        parse_deck_record, DeckStore, DeckValidation, DrawSimulator, ParseOptions, ProblemReason,
    },
    filter::{CardFilter, FilterFacets, Range},
    loader::{CardDatabase, Deck, DeckLoader, TabooLoader},
    Result,
};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::path::PathBuf;

fn test_data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join(name)
}

fn test_deck(name: &str) -> Result<Deck> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_decks")
        .join(name);
    DeckLoader::load_from_file(&path)
}

#[test]
fn test_load_catalog() -> Result<()> {
    let cards = CardDatabase::load(&test_data("cards.json"))?;
    assert_eq!(cards.len(), 29);

    let roland = cards.investigator(&CardCode::new("01001"))?;
    assert_eq!(roland.display_name(), "Roland Banks (The Fed)");
    assert_eq!(roland.deck_options.len(), 2);
    assert!(cards.investigator(&CardCode::new("01016")).is_err());

    let core = [PackCode::new("core")];
    let weaknesses: Vec<_> = cards.basic_weaknesses(&core).map(|c| c.code.as_str()).collect();
    assert!(weaknesses.contains(&"01096"));
    assert!(weaknesses.contains(&"01098"));
    Ok(())
}

#[test]
fn test_required_weakness_added_and_removed() -> Result<()> {
    let cards = CardDatabase::load(&test_data("cards.json"))?;
    let mut deck = test_deck("legal_roland.json")?;
    let roland = cards.investigator(&deck.investigator_code)?;
    let options = ParseOptions::default();
    let validation = DeckValidation::new(roland, &options);

    assert_eq!(validation.get_problem(&deck.slots, &cards), None);

    deck.slots.remove(&CardCode::new("01096"));
    let problem = validation.get_problem(&deck.slots, &cards).expect("weakness required");
    assert_eq!(problem.reason, ProblemReason::Investigator);

    // Any basic weakness satisfies the requirement, including the placeholder
    deck.slots.insert(CardCode::new("01000"), 1);
    assert_eq!(validation.get_problem(&deck.slots, &cards), None);
    Ok(())
}

#[test]
fn test_upgrade_spends_experience() -> Result<()> {
    let cards = CardDatabase::load(&test_data("cards.json"))?;
    let previous = test_deck("legal_roland.json")?;
    let mut upgraded = Deck {
        id: DeckId::new(2),
        previous_deck: Some(previous.id),
        ..previous.clone()
    };
    // Level 0 -> level 2 of the same title costs the difference
    upgraded.slots.insert(CardCode::new("01016"), 1);
    upgraded.slots.insert(CardCode::new("02190"), 1);
    // Level 0 swaps still cost one each
    upgraded.slots.remove(&CardCode::new("01025"));
    upgraded.slots.insert(CardCode::new("01093"), 2);

    let options = ParseOptions {
        previous_slots: Some(&previous.slots),
        ..Default::default()
    };
    let parsed = parse_deck_record(&upgraded, &cards, &options);
    assert_eq!(parsed.spent_xp, Some(4));
    assert_eq!(parsed.experience, 2);
    let changes = parsed.changes.expect("changes against previous deck");
    assert_eq!(changes.added.get(&CardCode::new("02190")), Some(&1));
    assert_eq!(changes.removed.get(&CardCode::new("01025")), Some(&2));

    let roland = cards.investigator(&upgraded.investigator_code)?;
    let validation = DeckValidation::new(roland, &options);
    assert_eq!(validation.get_problem(&upgraded.slots, &cards), None);
    Ok(())
}

#[test]
fn test_taboo_changes_legality() -> Result<()> {
    let cards = CardDatabase::load(&test_data("cards.json"))?;
    let deck = test_deck("taboo_lowers_level.json")?;
    let roland = cards.investigator(&deck.investigator_code)?;

    let untabooed = ParseOptions::default();
    let problem = DeckValidation::new(roland, &untabooed).get_problem(&deck.slots, &cards);
    assert_eq!(problem.map(|p| p.invalid_cards), Some(vec![CardCode::new("02187")]));

    let taboo = TabooLoader::load_set(&test_data("taboos.json"), 1)?;
    let tabooed = ParseOptions {
        taboo: Some(&taboo),
        ..Default::default()
    };
    let validation = DeckValidation::new(roland, &tabooed);
    assert_eq!(validation.get_problem(&deck.slots, &cards), None);
    assert_eq!(parse_deck_record(&deck, &cards, &tabooed).experience, 4);

    // A later list makes Machete exceptional, so its second copy breaks the limit
    let stricter = TabooLoader::load_set(&test_data("taboos.json"), 3)?;
    let options = ParseOptions {
        taboo: Some(&stricter),
        ..Default::default()
    };
    let problem = DeckValidation::new(roland, &options)
        .get_problem(&deck.slots, &cards)
        .expect("exceptional card over its limit");
    assert_eq!(problem.reason, ProblemReason::TooManyCopies);
    assert_eq!(problem.invalid_cards, vec![CardCode::new("01020")]);
    Ok(())
}

#[test]
fn test_campaign_weakness_replaces_placeholder() -> Result<()> {
    let cards = CardDatabase::load(&test_data("cards.json"))?;
    let deck = test_deck("random_weakness_placeholder.json")?;
    let mut set = WeaknessSet::new(vec![PackCode::new("core")]);
    let mut rng = ChaCha12Rng::seed_from_u64(7);

    let weakness = set.draw(&cards, &mut rng).expect("core has basic weaknesses");
    assert!(["01096", "01097", "01098"].contains(&weakness.as_str()));
    assert_eq!(set.assigned(&weakness), 1);

    let updated =
        apply_weakness_to_deck(&deck, None, &weakness, true, &cards, &ParseOptions::default())?;
    assert!(!updated.slots.contains_key(&CardCode::random_basic_weakness()));
    assert_eq!(updated.slots.get(&weakness), Some(&1));
    assert_eq!(updated.problem, None);
    assert_eq!(updated.xp, None);

    // Every copy in the pool is handed out exactly once
    let mut drawn = vec![weakness];
    while let Some(code) = set.draw(&cards, &mut rng) {
        drawn.push(code);
    }
    drawn.sort();
    assert_eq!(drawn, ["01096", "01097", "01098"].map(CardCode::new));
    Ok(())
}

#[test]
fn test_weakness_for_zero_count_placeholder() -> Result<()> {
    let cards = CardDatabase::load(&test_data("cards.json"))?;
    let deck = test_deck("zero_count_placeholder.json")?;
    assert_eq!(deck.problem.as_deref(), Some("investigator"));

    let weakness = CardCode::new("01097");
    let updated =
        apply_weakness_to_deck(&deck, None, &weakness, true, &cards, &ParseOptions::default())?;
    assert!(!updated.slots.contains_key(&CardCode::random_basic_weakness()));
    assert_eq!(updated.slots.get(&weakness), Some(&1));
    assert_eq!(updated.problem, None);
    Ok(())
}

#[test]
fn test_weakness_for_unknown_investigator() -> Result<()> {
    let cards = CardDatabase::load(&test_data("cards.json"))?;
    let deck = Deck::new(DeckId::new(9), "Nobody", "99999");
    let result = apply_weakness_to_deck(
        &deck,
        None,
        &CardCode::new("01096"),
        false,
        &cards,
        &ParseOptions::default(),
    );
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_opening_hand_is_reproducible() -> Result<()> {
    let cards = CardDatabase::load(&test_data("cards.json"))?;
    let deck = test_deck("legal_roland.json")?;

    let mut first = DrawSimulator::new(&deck.slots, &cards, 42);
    let mut second = DrawSimulator::new(&deck.slots, &cards, 42);
    assert_eq!(first.deck_size(), 33);
    assert_eq!(first.draw(5), 5);
    second.draw(5);
    assert_eq!(first.drawn(), second.drawn());

    first.redraw_selected(&[0, 1]);
    assert_eq!(first.drawn().len(), 5);
    assert_eq!(first.remaining(), 28);
    Ok(())
}

#[test]
fn test_deck_history() -> Result<()> {
    let base = test_deck("legal_roland.json")?;
    let upgraded = Deck {
        id: DeckId::new(20),
        previous_deck: Some(base.id),
        ..base.clone()
    };
    let base = Deck {
        next_deck: Some(upgraded.id),
        ..base
    };

    let mut store = DeckStore::new();
    store.set_decks(vec![base.clone(), upgraded.clone()]);
    assert_eq!(store.my_decks(), &[upgraded.id]);
    assert_eq!(store.scenario_count(upgraded.id), 1);
    assert_eq!(store.previous(upgraded.id).map(|d| d.id), Some(base.id));
    Ok(())
}

#[test]
fn test_catalog_search() -> Result<()> {
    let cards = CardDatabase::load(&test_data("cards.json"))?;

    let guardian_assets = CardFilter {
        factions: vec![Faction::Guardian],
        types: vec![CardType::Asset],
        level: Some(Range::new(0, 0)),
        ..Default::default()
    };
    let hits: Vec<_> = guardian_assets
        .apply(&cards)
        .into_iter()
        .map(|c| c.code.as_str())
        .collect();
    assert_eq!(hits, ["01016", "01017", "01018", "01019", "01020", "01021"]);

    let by_name = CardFilter {
        name: Some("45 automatic".to_string()),
        ..Default::default()
    };
    assert_eq!(by_name.apply(&cards).len(), 2);

    let facets = FilterFacets::discover(&cards);
    assert!(facets.factions.contains(&Faction::Mythos));
    assert!(facets.slots.contains("Arcane"));
    assert!(facets.uses.contains("Ammo"));
    assert!(facets.has_cost && facets.has_xp && facets.has_skill);
    Ok(())
}

//! Property tests for deck aggregation and validation

use arkham_deck_rs::{
    core::{Card, CardCode, CardType, DeckOption, DeckRequirements, Faction, LevelRange, Slots},
    deck::{compute_changes, parse_deck, spent_xp, DeckValidation, ParseOptions},
    loader::{CardDatabase, PlayerCards},
};
use proptest::prelude::*;

const CODES: [&str; 6] = ["01016", "01017", "01020", "01030", "01086", "02190"];

fn catalog() -> CardDatabase {
    let mut roland = Card::new("01001", "Roland Banks", CardType::Investigator)
        .with_faction(Faction::Guardian)
        .with_deck_options(vec![DeckOption::factions(
            &[Faction::Guardian, Faction::Neutral],
            LevelRange::new(0, 5),
        )]);
    roland.deck_requirements = Some(DeckRequirements {
        size: 10,
        ..Default::default()
    });
    CardDatabase::from_cards([
        roland,
        Card::new("01016", ".45 Automatic", CardType::Asset)
            .with_faction(Faction::Guardian)
            .with_xp(0)
            .with_cost(4),
        Card::new("01017", "Physical Training", CardType::Asset)
            .with_faction(Faction::Guardian)
            .with_xp(0)
            .with_cost(2),
        Card::new("01020", "Machete", CardType::Asset)
            .with_faction(Faction::Guardian)
            .with_xp(0)
            .with_cost(3),
        Card::new("01030", "Magnifying Glass", CardType::Asset)
            .with_faction(Faction::Seeker)
            .with_xp(0)
            .with_cost(1),
        Card::new("01086", "Knife", CardType::Asset).with_xp(0).with_cost(1),
        Card::new("02190", ".45 Automatic", CardType::Asset)
            .with_faction(Faction::Guardian)
            .with_xp(2)
            .with_cost(4),
    ])
}

/// Selections over known and unknown codes, zero counts included
fn selection() -> impl Strategy<Value = Slots> {
    let code = prop_oneof![
        prop::sample::select(CODES.to_vec()).prop_map(CardCode::new),
        "9[0-9]{4}".prop_map(CardCode::new),
    ];
    prop::collection::btree_map(code, 0u32..4, 0..8)
}

proptest! {
    #[test]
    fn total_counts_only_known_codes(slots in selection()) {
        let cards = catalog();
        let parsed = parse_deck(&CardCode::new("01001"), &slots, &cards, &ParseOptions::default());
        let known: u32 = slots
            .iter()
            .filter(|(code, _)| cards.card(code).is_some())
            .map(|(_, count)| count)
            .sum();
        prop_assert_eq!(parsed.total_card_count, known);
        prop_assert_eq!(parsed.normal_card_count, known);
        prop_assert!(parsed.distinct_card_count <= slots.len());
    }

    #[test]
    fn parsing_is_deterministic(slots in selection()) {
        let cards = catalog();
        let investigator = CardCode::new("01001");
        let first = parse_deck(&investigator, &slots, &cards, &ParseOptions::default());
        let second = parse_deck(&investigator, &slots, &cards, &ParseOptions::default());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn validation_is_deterministic(slots in selection()) {
        let cards = catalog();
        let roland = cards.investigator(&CardCode::new("01001")).unwrap();
        let validation = DeckValidation::new(roland, &ParseOptions::default());
        prop_assert_eq!(
            validation.get_problem(&slots, &cards),
            validation.get_problem(&slots, &cards)
        );
    }

    #[test]
    fn no_changes_cost_nothing(slots in selection()) {
        let cards = catalog();
        let changes = compute_changes(&slots, &slots);
        prop_assert!(changes.is_empty());
        prop_assert_eq!(spent_xp(&changes, &cards, None), 0);
    }

    #[test]
    fn added_cards_cost_at_least_one_each(before in selection(), after in selection()) {
        let cards = catalog();
        let changes = compute_changes(&before, &after);
        let known_added: u32 = changes
            .added
            .iter()
            .filter(|(code, _)| cards.card(code).is_some())
            .map(|(_, count)| count)
            .sum();
        prop_assert!(spent_xp(&changes, &cards, None) >= known_added);
    }
}

#[test]
fn test_cost_curve_counts_copies() {
    let cards = catalog();
    let slots: Slots = [(CardCode::new("01016"), 2), (CardCode::new("01020"), 1)]
        .into_iter()
        .collect();
    let parsed = parse_deck(&CardCode::new("01001"), &slots, &cards, &ParseOptions::default());
    assert_eq!(parsed.total_card_count, 3);
    assert_eq!(parsed.normal_card_count, 3);
    assert_eq!(parsed.distinct_card_count, 2);
    assert_eq!(parsed.cost_curve.get(&4), Some(&2));
    assert_eq!(parsed.cost_curve.get(&3), Some(&1));
}

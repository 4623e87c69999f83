//! Card, deck and taboo loaders
//!
//! Parsers for card-database JSON exports, deck files (JSON and text) and
//! taboo lists.

pub mod card;
pub mod database;
pub mod deck;
pub mod taboo;

pub use card::CardLoader;
pub use database::{CardDatabase, PlayerCards};
pub use deck::{Deck, DeckLoader};
pub use taboo::TabooLoader;

//! Arkham deck tools
//!
//! Deck parsing and validation for a cooperative living card game, plus
//! the surrounding campaign bookkeeping: catalog and taboo loading, upgrade
//! accounting, deck history, draw simulation, card search and campaign
//! tracking.

pub mod campaign;
pub mod config;
pub mod core;
pub mod deck;
pub mod error;
pub mod filter;
pub mod loader;

pub use error::{DeckError, Result};

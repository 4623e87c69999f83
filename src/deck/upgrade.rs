//! Upgrade accounting between a deck and the deck it was upgraded from

use crate::core::taboo::card_experience;
use crate::core::{Card, Slots, TabooSet};
use crate::loader::PlayerCards;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Per-code differences between two slot selections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeckChanges {
    pub added: Slots,
    pub removed: Slots,
}

impl DeckChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn compute_changes(previous: &Slots, current: &Slots) -> DeckChanges {
    let mut changes = DeckChanges::default();
    for (code, &count) in current {
        let before = previous.get(code).copied().unwrap_or(0);
        if count > before {
            changes.added.insert(code.clone(), count - before);
        }
    }
    for (code, &before) in previous {
        let count = current.get(code).copied().unwrap_or(0);
        if before > count {
            changes.removed.insert(code.clone(), before - count);
        }
    }
    changes
}

/// Experience needed to make `changes`
///
/// Each added copy costs its experience, at least 1. If a lower-level copy
/// of the same title was removed in the same upgrade, the added copy costs
/// the difference instead (still at least 1). Weaknesses and unresolved
/// codes are free; removals are free.
pub fn spent_xp<C: PlayerCards + ?Sized>(
    changes: &DeckChanges,
    cards: &C,
    taboo: Option<&TabooSet>,
) -> u32 {
    // title -> (experience, removed copies), highest experience first
    let mut removed_by_title: FxHashMap<&str, Vec<(u32, u32)>> = FxHashMap::default();
    for (code, &count) in &changes.removed {
        if let Some(card) = cards.card(code) {
            let xp = card_experience(card, taboo);
            let removed = removed_by_title.entry(card.name.as_str()).or_default();
            match removed.iter_mut().find(|(value, _)| *value == xp) {
                Some((_, copies)) => *copies = copies.saturating_add(count),
                None => removed.push((xp, count)),
            }
        }
    }
    for removed in removed_by_title.values_mut() {
        removed.sort_unstable_by(|a, b| b.0.cmp(&a.0));
    }

    // Highest-level additions claim the best discounts first
    let mut added: Vec<(&Card, u32)> = changes
        .added
        .iter()
        .filter_map(|(code, &count)| cards.card(code).map(|card| (card, count)))
        .filter(|(card, _)| !card.is_weakness() && !card.is_investigator())
        .collect();
    added.sort_by(|(a, _), (b, _)| {
        card_experience(b, taboo)
            .cmp(&card_experience(a, taboo))
            .then_with(|| a.code.cmp(&b.code))
    });

    let mut total: u32 = 0;
    for (card, count) in added {
        let xp = card_experience(card, taboo);
        let mut left = count;
        if let Some(removed) = removed_by_title.get_mut(card.name.as_str()) {
            while left > 0 {
                let Some((old, copies)) = take_lower(removed, xp, left) else {
                    break;
                };
                total = total.saturating_add(copies.saturating_mul((xp - old).max(1)));
                left -= copies;
            }
        }
        total = total.saturating_add(left.saturating_mul(xp.max(1)));
    }
    total
}

/// Take up to `wanted` removed copies from the highest experience strictly
/// below `xp`; returns that experience and how many copies were taken
fn take_lower(removed: &mut Vec<(u32, u32)>, xp: u32, wanted: u32) -> Option<(u32, u32)> {
    let index = removed.iter().position(|&(value, _)| value < xp)?;
    let (value, copies) = &mut removed[index];
    let taken = (*copies).min(wanted);
    let value = *value;
    *copies -= taken;
    if *copies == 0 {
        removed.remove(index);
    }
    Some((value, taken))
}

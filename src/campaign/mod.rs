//! Campaign tracking
//!
//! A campaign follows a group of investigators through a cycle: scenario
//! results and earned experience, trauma, the chaos bag, campaign log notes,
//! and the pool of basic weaknesses. `CampaignStore` owns every campaign and
//! applies updates the way the deck store applies deck updates.

pub mod chaos_bag;
pub mod merge;
pub mod notes;
pub mod trauma;
pub mod weakness;

use crate::core::{CardCode, DeckId};
use crate::loader::PlayerCards;
use crate::{DeckError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

pub use chaos_bag::{ChaosBag, ChaosToken, Difficulty};
pub use merge::MergeReport;
pub use notes::{CampaignLog, CampaignNotes};
pub use trauma::TraumaData;
pub use weakness::{add_weakness, apply_weakness_to_deck, WeaknessSet};

pub type CampaignId = u64;

/// Milliseconds since the Unix epoch
pub type Timestamp = u64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioResult {
    pub scenario: String,
    pub scenario_code: Option<String>,
    pub resolution: Option<String>,
    /// Experience each investigator earned
    pub xp: Option<u32>,
    pub interlude: bool,
}

impl ScenarioResult {
    pub fn new(scenario: impl Into<String>, resolution: impl Into<String>, xp: u32) -> Self {
        ScenarioResult {
            scenario: scenario.into(),
            resolution: Some(resolution.into()),
            xp: Some(xp),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub cycle_code: String,
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub show_interludes: bool,
    #[serde(default)]
    pub chaos_bag: ChaosBag,
    #[serde(default)]
    pub campaign_notes: CampaignNotes,
    #[serde(default)]
    pub investigator_data: BTreeMap<CardCode, TraumaData>,
    #[serde(default)]
    pub weakness_set: WeaknessSet,
    #[serde(default)]
    pub base_deck_ids: Vec<DeckId>,
    #[serde(default)]
    pub scenario_results: Vec<ScenarioResult>,
    pub date_created: Timestamp,
    pub last_updated: Timestamp,
}

impl Campaign {
    /// Experience earned across every scenario so far
    pub fn total_xp(&self) -> u32 {
        self.scenario_results.iter().filter_map(|r| r.xp).sum()
    }

    pub fn latest_scenario(&self) -> Option<&ScenarioResult> {
        self.scenario_results.last()
    }

    pub fn trauma(&self, investigator: &CardCode) -> TraumaData {
        self.investigator_data.get(investigator).copied().unwrap_or_default()
    }

    /// Plain-text summary suitable for sharing
    pub fn to_text<C: PlayerCards + ?Sized>(&self, cards: &C) -> String {
        let name_of = |code: &CardCode| {
            cards
                .card(code)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| code.to_string())
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.name);
        match self.difficulty {
            Some(d) => {
                let _ = writeln!(out, "Campaign: {} ({d:?})", self.cycle_code);
            }
            None => {
                let _ = writeln!(out, "Campaign: {}", self.cycle_code);
            }
        }

        if !self.scenario_results.is_empty() {
            let _ = writeln!(out, "\nScenarios:");
            for result in &self.scenario_results {
                let mut line = format!("- {}", result.scenario);
                if let Some(resolution) = &result.resolution {
                    let _ = write!(line, ": {resolution}");
                }
                if let Some(xp) = result.xp {
                    let _ = write!(line, " ({xp} XP)");
                }
                let _ = writeln!(out, "{line}");
            }
            let _ = writeln!(out, "Total XP: {}", self.total_xp());
        }

        if !self.investigator_data.is_empty() {
            let _ = writeln!(out, "\nInvestigators:");
            for (code, trauma) in &self.investigator_data {
                let status = match cards.card(code) {
                    Some(card) => trauma.describe(card),
                    None => format!("{} physical, {} mental", trauma.physical, trauma.mental),
                };
                let _ = writeln!(out, "- {}: {status}", name_of(code));
            }
        }

        let _ = writeln!(out, "\nChaos Bag: {}", self.chaos_bag);

        for section in &self.campaign_notes.sections {
            if section.notes.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n{}:", section.title);
            for note in &section.notes {
                let _ = writeln!(out, "- {note}");
            }
        }
        for count in &self.campaign_notes.counts {
            let _ = writeln!(out, "{}: {}", count.title, count.count);
        }
        for section in &self.campaign_notes.investigator_notes.sections {
            for (code, notes) in &section.notes {
                if notes.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "\n{} ({}):", section.title, name_of(code));
                for note in notes {
                    let _ = writeln!(out, "- {note}");
                }
            }
        }
        out
    }
}

/// Parameters for a new campaign
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub name: String,
    pub cycle_code: String,
    pub difficulty: Option<Difficulty>,
    /// Starting bag; defaults to the cycle's bag at the chosen difficulty
    pub chaos_bag: Option<ChaosBag>,
    pub weakness_set: WeaknessSet,
    pub base_deck_ids: Vec<DeckId>,
}

impl NewCampaign {
    pub fn new(name: impl Into<String>, cycle_code: impl Into<String>) -> Self {
        NewCampaign {
            name: name.into(),
            cycle_code: cycle_code.into(),
            difficulty: None,
            chaos_bag: None,
            weakness_set: WeaknessSet::default(),
            base_deck_ids: Vec::new(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }
}

/// All campaigns, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStore {
    all: BTreeMap<CampaignId, Campaign>,
}

impl CampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> CampaignId {
        self.all.keys().next_back().map_or(1, |id| id + 1)
    }

    /// Create a campaign with the cycle's log layout and starting bag
    pub fn new_campaign(&mut self, params: NewCampaign, now: Timestamp) -> Result<&Campaign> {
        let chaos_bag = match (params.chaos_bag, params.difficulty) {
            (Some(bag), _) => bag,
            (None, Some(difficulty)) => {
                ChaosBag::for_cycle(&params.cycle_code, difficulty).unwrap_or_default()
            }
            (None, None) => ChaosBag::default(),
        };
        chaos_bag.validate()?;

        let id = self.next_id();
        let campaign = Campaign {
            id,
            name: params.name,
            campaign_notes: CampaignNotes::from_log(&CampaignLog::for_cycle(&params.cycle_code)),
            cycle_code: params.cycle_code,
            difficulty: params.difficulty,
            show_interludes: true,
            chaos_bag,
            investigator_data: BTreeMap::new(),
            weakness_set: params.weakness_set,
            base_deck_ids: params.base_deck_ids,
            scenario_results: Vec::new(),
            date_created: now,
            last_updated: now,
        };
        info!("Created campaign {id} ({})", campaign.cycle_code);
        Ok(&*self.all.entry(id).or_insert(campaign))
    }

    /// Replace the whole collection
    pub fn set_all(&mut self, campaigns: Vec<Campaign>) {
        self.all = campaigns.into_iter().map(|c| (c.id, c)).collect();
    }

    pub fn get(&self, id: CampaignId) -> Option<&Campaign> {
        self.all.get(&id)
    }

    /// Apply `change` to a campaign and stamp it as updated
    pub fn update<F>(&mut self, id: CampaignId, now: Timestamp, change: F) -> Result<&Campaign>
    where
        F: FnOnce(&mut Campaign),
    {
        let campaign = self
            .all
            .get_mut(&id)
            .ok_or(DeckError::CampaignNotFound(id))?;
        change(campaign);
        campaign.id = id;
        campaign.last_updated = now;
        Ok(&*campaign)
    }

    pub fn add_scenario_result(
        &mut self,
        id: CampaignId,
        result: ScenarioResult,
        now: Timestamp,
    ) -> Result<&Campaign> {
        debug!("Campaign {id}: recorded {}", result.scenario);
        self.update(id, now, |c| c.scenario_results.push(result))
    }

    pub fn set_trauma(
        &mut self,
        id: CampaignId,
        investigator: CardCode,
        trauma: TraumaData,
        now: Timestamp,
    ) -> Result<&Campaign> {
        self.update(id, now, |c| {
            c.investigator_data.insert(investigator, trauma);
        })
    }

    pub fn delete(&mut self, id: CampaignId) -> Option<Campaign> {
        self.all.remove(&id)
    }

    /// Point every campaign that used a local deck at its server id
    pub fn replace_local_deck(&mut self, local_id: DeckId, server_id: DeckId) -> usize {
        let mut replaced = 0;
        for campaign in self.all.values_mut() {
            for deck_id in campaign.base_deck_ids.iter_mut() {
                if *deck_id == local_id {
                    *deck_id = server_id;
                    replaced += 1;
                }
            }
        }
        replaced
    }

    pub fn iter(&self) -> impl Iterator<Item = &Campaign> {
        self.all.values()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn clear(&mut self) {
        self.all.clear();
    }
}

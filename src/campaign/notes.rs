//! Campaign log: note sections and tallies, shared or per investigator

use crate::core::CardCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Section and tally titles printed in a cycle's campaign log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignLog {
    pub sections: &'static [&'static str],
    pub counts: &'static [&'static str],
    pub investigator_sections: &'static [&'static str],
    pub investigator_counts: &'static [&'static str],
}

const CORE_LOG: CampaignLog = CampaignLog {
    sections: &["Campaign Notes", "Cultists We Interrogated", "Cultists Who Got Away"],
    counts: &[],
    investigator_sections: &[],
    investigator_counts: &[],
};

impl CampaignLog {
    /// Log layout for a cycle; unknown cycles get a single notes section
    pub fn for_cycle(cycle_code: &str) -> CampaignLog {
        match cycle_code {
            "core" | "rtnotz" => CORE_LOG,
            "dwl" => CampaignLog {
                sections: &["Campaign Notes", "Sacrificed to Yog-Sothoth"],
                ..CampaignLog::empty()
            },
            "ptc" => CampaignLog {
                sections: &["Campaign Notes", "VIPs Interviewed", "VIPs Slain"],
                counts: &["Doubt", "Conviction", "Chasing the Stranger"],
                ..CampaignLog::empty()
            },
            "tfa" => CampaignLog {
                sections: &["Campaign Notes"],
                counts: &["Yig's Fury"],
                investigator_sections: &["Supplies"],
                investigator_counts: &[],
            },
            _ => CampaignLog {
                sections: &["Campaign Notes"],
                ..CampaignLog::empty()
            },
        }
    }

    const fn empty() -> CampaignLog {
        CampaignLog {
            sections: &[],
            counts: &[],
            investigator_sections: &[],
            investigator_counts: &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSection {
    pub title: String,
    pub notes: Vec<String>,
    /// Added by the player rather than printed in the log
    #[serde(default)]
    pub custom: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSection {
    pub title: String,
    pub count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigatorSection {
    pub title: String,
    pub notes: BTreeMap<CardCode, Vec<String>>,
    #[serde(default)]
    pub custom: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigatorCount {
    pub title: String,
    pub counts: BTreeMap<CardCode, i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigatorNotes {
    pub sections: Vec<InvestigatorSection>,
    pub counts: Vec<InvestigatorCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignNotes {
    pub sections: Vec<NoteSection>,
    pub counts: Vec<CountSection>,
    pub investigator_notes: InvestigatorNotes,
}

impl CampaignNotes {
    /// Empty notes laid out like `log`
    pub fn from_log(log: &CampaignLog) -> Self {
        CampaignNotes {
            sections: log
                .sections
                .iter()
                .map(|title| NoteSection {
                    title: title.to_string(),
                    ..Default::default()
                })
                .collect(),
            counts: log
                .counts
                .iter()
                .map(|title| CountSection {
                    title: title.to_string(),
                    count: 0,
                })
                .collect(),
            investigator_notes: InvestigatorNotes {
                sections: log
                    .investigator_sections
                    .iter()
                    .map(|title| InvestigatorSection {
                        title: title.to_string(),
                        ..Default::default()
                    })
                    .collect(),
                counts: log
                    .investigator_counts
                    .iter()
                    .map(|title| InvestigatorCount {
                        title: title.to_string(),
                        ..Default::default()
                    })
                    .collect(),
            },
        }
    }

    /// Append a note; returns false when no section has that title
    pub fn add_note(&mut self, section: &str, note: impl Into<String>) -> bool {
        match self.sections.iter_mut().find(|s| s.title == section) {
            Some(s) => {
                s.notes.push(note.into());
                true
            }
            None => false,
        }
    }

    pub fn add_custom_section(&mut self, title: impl Into<String>) {
        self.sections.push(NoteSection {
            title: title.into(),
            notes: Vec::new(),
            custom: true,
        });
    }

    pub fn count(&self, title: &str) -> Option<i32> {
        self.counts.iter().find(|c| c.title == title).map(|c| c.count)
    }

    /// Adjust a tally by `delta`, creating it if missing
    pub fn adjust_count(&mut self, title: &str, delta: i32) -> i32 {
        if let Some(c) = self.counts.iter_mut().find(|c| c.title == title) {
            c.count += delta;
            return c.count;
        }
        self.counts.push(CountSection {
            title: title.to_string(),
            count: delta,
        });
        delta
    }

    pub fn add_investigator_note(
        &mut self,
        section: &str,
        investigator: &CardCode,
        note: impl Into<String>,
    ) -> bool {
        match self
            .investigator_notes
            .sections
            .iter_mut()
            .find(|s| s.title == section)
        {
            Some(s) => {
                s.notes.entry(investigator.clone()).or_default().push(note.into());
                true
            }
            None => false,
        }
    }
}

//! Merging a remote campaign collection into the local one

use super::{Campaign, CampaignId, CampaignStore};
use log::{info, warn};
use serde::Serialize;

/// What a merge did with each remote campaign
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Same campaign on both sides; the local copy was newer
    pub kept_local: Vec<CampaignId>,
    /// Same campaign on both sides; the remote copy replaced the local one
    pub took_remote: Vec<CampaignId>,
    /// Remote-only campaigns added under their own id
    pub added: Vec<CampaignId>,
    /// Id clashes between different campaigns: (remote id, id assigned locally)
    pub renumbered: Vec<(CampaignId, CampaignId)>,
}

impl MergeReport {
    pub fn changed(&self) -> bool {
        !self.took_remote.is_empty() || !self.added.is_empty() || !self.renumbered.is_empty()
    }
}

impl CampaignStore {
    /// Merge campaigns fetched from remote storage
    ///
    /// Campaigns are matched by id and creation time. For the same campaign
    /// the copy updated last wins (ties keep the remote copy). A remote
    /// campaign whose id is taken by a different local campaign is kept
    /// under a fresh id. Local-only campaigns are left alone.
    pub fn merge_remote(&mut self, remote: Vec<Campaign>) -> MergeReport {
        let mut report = MergeReport::default();
        let mut clashes = Vec::new();

        for campaign in remote {
            let id = campaign.id;
            let local = self.all.get(&id).map(|c| (c.date_created, c.last_updated));
            match local {
                Some((created, updated)) if created == campaign.date_created => {
                    if updated > campaign.last_updated {
                        report.kept_local.push(id);
                    } else {
                        self.all.insert(id, campaign);
                        report.took_remote.push(id);
                    }
                }
                Some(_) => clashes.push(campaign),
                None => {
                    self.all.insert(id, campaign);
                    report.added.push(id);
                }
            }
        }

        // Renumber after every direct id is placed so fresh ids never collide
        for mut campaign in clashes {
            let remote_id = campaign.id;
            let new_id = self.next_id();
            warn!("Remote campaign {remote_id} clashes with a local campaign; stored as {new_id}");
            campaign.id = new_id;
            self.all.insert(new_id, campaign);
            report.renumbered.push((remote_id, new_id));
        }

        info!(
            "Merged remote campaigns: {} kept, {} replaced, {} added, {} renumbered",
            report.kept_local.len(),
            report.took_remote.len(),
            report.added.len(),
            report.renumbered.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::NewCampaign;

    fn store() -> CampaignStore {
        let mut store = CampaignStore::new();
        store.new_campaign(NewCampaign::new("Zealot", "core"), 100).unwrap();
        store.new_campaign(NewCampaign::new("Dunwich", "dwl"), 200).unwrap();
        store
    }

    fn remote(id: CampaignId, name: &str, created: u64, updated: u64) -> Campaign {
        let mut store = CampaignStore::new();
        let mut campaign = store
            .new_campaign(NewCampaign::new(name, "core"), created)
            .unwrap()
            .clone();
        campaign.id = id;
        campaign.last_updated = updated;
        campaign
    }

    #[test]
    fn test_newer_copy_wins() {
        let mut local = store();
        local.update(2, 500, |c| c.name = "Dunwich (local)".to_string()).unwrap();

        let report = local.merge_remote(vec![
            remote(1, "Zealot (remote)", 100, 300),
            remote(2, "Dunwich (remote)", 200, 400),
        ]);
        assert_eq!(report.took_remote, vec![1]);
        assert_eq!(report.kept_local, vec![2]);
        assert_eq!(local.get(1).unwrap().name, "Zealot (remote)");
        assert_eq!(local.get(2).unwrap().name, "Dunwich (local)");
        assert!(report.changed());
    }

    #[test]
    fn test_id_clash_keeps_both() {
        let mut local = store();
        let report = local.merge_remote(vec![remote(1, "Other campaign", 999, 999)]);
        assert_eq!(report.renumbered, vec![(1, 3)]);
        assert_eq!(local.get(1).unwrap().name, "Zealot");
        assert_eq!(local.get(3).unwrap().name, "Other campaign");
        assert_eq!(local.len(), 3);
    }

    #[test]
    fn test_remote_only_added() {
        let mut local = store();
        let report = local.merge_remote(vec![remote(7, "Carcosa", 50, 60)]);
        assert_eq!(report.added, vec![7]);
        assert_eq!(local.len(), 3);
    }

    #[test]
    fn test_local_only_untouched() {
        let mut local = store();
        let report = local.merge_remote(Vec::new());
        assert!(!report.changed());
        assert_eq!(local.len(), 2);
    }
}

//! Read-only projections over the stored campaigns.

use std::cmp::Reverse;

use boxsave_domain::{Amount, Campaign, CampaignId};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: Option<CampaignId>,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub amount_saved: Amount,
}

impl HistoryEntry {
    fn from_campaign(campaign: &Campaign) -> Self {
        Self {
            id: campaign.id,
            name: campaign.name.clone(),
            start_date: campaign.start_date,
            // Campaigns finished without an end date close on their last update.
            end_date: campaign
                .end_date
                .unwrap_or_else(|| campaign.updated_at.date_naive()),
            // Paid boxes are authoritative if a stored total has drifted.
            amount_saved: campaign.paid_total(),
        }
    }
}

pub struct HistoryService;

impl HistoryService {
    /// First campaign, in store order, that has not been completed.
    pub fn active_campaign(campaigns: &[Campaign]) -> Option<&Campaign> {
        campaigns.iter().find(|campaign| !campaign.is_completed)
    }

    /// Completed campaigns, most recently ended first, at most `limit` of them.
    pub fn recent_history(campaigns: &[Campaign], limit: usize) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = campaigns
            .iter()
            .filter(|campaign| campaign.is_completed)
            .map(HistoryEntry::from_campaign)
            .collect();
        entries.sort_by_key(|entry| Reverse(entry.end_date));
        entries.truncate(limit);
        entries
    }

    pub fn total_saved(campaigns: &[Campaign]) -> Amount {
        campaigns.iter().map(Campaign::paid_total).sum()
    }
}

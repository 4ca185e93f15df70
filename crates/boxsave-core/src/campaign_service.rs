//! Helper functions for campaign creation and high-level status.

use boxsave_domain::{Amount, Campaign, CampaignDraft};
use tracing::debug;

use crate::{
    ledger::{progress_percent, CampaignLedger},
    partition::{partition, shortfall},
    time::Clock,
    CoreResult,
};

/// Figures a presentation layer renders for an open campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignSummary {
    pub name: String,
    pub target_amount: Amount,
    pub current_amount: Amount,
    pub remaining_amount: Amount,
    pub progress_percent: f64,
    pub selection_total: Amount,
    pub reachable_total: Amount,
    pub shortfall: Amount,
    pub paid_boxes: usize,
    pub total_boxes: usize,
    pub is_completed: bool,
}

/// Provides constructor and status helpers for [`Campaign`] instances.
pub struct CampaignService;

impl CampaignService {
    /// Materialises a campaign from a validated draft. The partitioner runs here and only here.
    pub fn create(draft: &CampaignDraft, clock: &dyn Clock) -> Campaign {
        let boxes = partition(draft.target_amount());
        debug!(
            name = draft.name(),
            target = draft.target_amount(),
            boxes = boxes.len(),
            "campaign materialised"
        );
        Campaign::new(draft, &boxes, clock.now())
    }

    /// Derived values for the campaign open in `ledger`.
    pub fn summarize(ledger: &CampaignLedger) -> CoreResult<CampaignSummary> {
        let mut summary = Self::summarize_campaign(ledger.campaign())?;
        summary.selection_total = ledger.selection_total();
        Ok(summary)
    }

    /// Derived values for a stored campaign, with nothing selected.
    pub fn summarize_campaign(campaign: &Campaign) -> CoreResult<CampaignSummary> {
        Ok(CampaignSummary {
            name: campaign.name.clone(),
            target_amount: campaign.target_amount,
            current_amount: campaign.current_amount,
            remaining_amount: campaign.remaining_amount(),
            progress_percent: progress_percent(campaign)?,
            selection_total: 0,
            reachable_total: campaign.reachable_total(),
            shortfall: shortfall(campaign.target_amount),
            paid_boxes: campaign.paid_box_count(),
            total_boxes: campaign.box_count(),
            is_completed: campaign.is_completed,
        })
    }
}

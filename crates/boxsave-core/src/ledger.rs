//! The campaign ledger: keeps the collected total consistent with paid boxes.
//!
//! Every operation is a single in-memory transition. Preconditions are checked
//! before anything is touched, so a rejected call leaves the campaign and the
//! selection exactly as they were.

use std::{collections::BTreeSet, fmt, sync::Arc};

use boxsave_domain::{non_blank, Amount, Campaign, PaymentRecord, SavingsBox};
use tracing::debug;
use uuid::Uuid;

use crate::{
    time::{Clock, SystemClock},
    CoreError, CoreResult,
};

/// A campaign opened for editing, plus the boxes picked for the next payment.
#[derive(Clone)]
pub struct CampaignLedger {
    campaign: Campaign,
    selection: BTreeSet<usize>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for CampaignLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CampaignLedger")
            .field("campaign", &self.campaign)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl CampaignLedger {
    /// Opens `campaign`, refusing state that already breaks the ledger invariants.
    pub fn open(campaign: Campaign) -> CoreResult<Self> {
        Self::with_clock(campaign, Arc::new(SystemClock))
    }

    pub fn with_clock(campaign: Campaign, clock: Arc<dyn Clock>) -> CoreResult<Self> {
        let issues = invariant_issues(&campaign);
        if !issues.is_empty() {
            return Err(CoreError::InvariantViolation(issues.join("; ")));
        }
        Ok(Self {
            campaign,
            selection: BTreeSet::new(),
            clock,
        })
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn into_campaign(self) -> Campaign {
        self.campaign
    }

    /// Selected box indices in ascending order.
    pub fn selection(&self) -> Vec<usize> {
        self.selection.iter().copied().collect()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(&index)
    }

    /// Adds `index` to the selection. Paid boxes are ignored.
    /// Returns whether the box is selected afterwards.
    pub fn select(&mut self, index: usize) -> CoreResult<bool> {
        if self.box_at(index)?.is_paid {
            return Ok(false);
        }
        self.selection.insert(index);
        Ok(true)
    }

    /// Removes `index` from the selection. Returns whether it was selected.
    pub fn deselect(&mut self, index: usize) -> CoreResult<bool> {
        self.box_at(index)?;
        Ok(self.selection.remove(&index))
    }

    /// Flips selection membership. Returns whether the box is selected afterwards.
    pub fn toggle(&mut self, index: usize) -> CoreResult<bool> {
        if self.is_selected(index) {
            self.deselect(index).map(|_| false)
        } else {
            self.select(index)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection_total(&self) -> Amount {
        self.selection
            .iter()
            .filter_map(|&index| self.campaign.savings_box(index))
            .map(SavingsBox::value)
            .sum()
    }

    /// Marks every selected box as paid by `contributor` and commits their sum.
    ///
    /// Selected boxes are never paid: [`select`](Self::select) refuses paid
    /// boxes and the selection is cleared on every commit, so a repeated call
    /// finds nothing to pay instead of counting boxes twice.
    pub fn record_payment(&mut self, contributor: &str) -> CoreResult<PaymentRecord> {
        if self.selection.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        let contributor = non_blank(contributor).ok_or(CoreError::BlankContributor)?;

        let indices = self.selection();
        let committed = self.selection_total();
        for &index in &indices {
            if let Some(savings_box) = self.campaign.savings_box_mut(index) {
                debug_assert!(!savings_box.is_paid, "selected box {index} already paid");
                savings_box.mark_paid(contributor.clone());
            }
        }
        self.campaign.current_amount += committed;

        let now = self.clock.now();
        let record = PaymentRecord::new(contributor, indices, committed, now);
        self.campaign.payments.push(record.clone());
        self.selection.clear();
        self.campaign.touch(now);

        debug!(
            payment = %record.id,
            boxes = record.box_indices.len(),
            amount = committed,
            current = self.campaign.current_amount,
            "payment recorded"
        );
        self.debug_check();
        Ok(record)
    }

    /// Reverses the payment of one box. Returns the value removed from the total.
    pub fn unmark_paid(&mut self, index: usize) -> CoreResult<Amount> {
        let value = self.paid_box_at(index)?.value();

        if let Some(savings_box) = self.campaign.savings_box_mut(index) {
            savings_box.mark_unpaid();
        }
        self.campaign.current_amount -= value;
        self.release_from_history(index, value);
        self.campaign.touch(self.clock.now());

        debug!(box_index = index, value, current = self.campaign.current_amount, "box unmarked");
        self.debug_check();
        Ok(value)
    }

    /// Replaces the contributor of a paid box. Amounts are left alone.
    pub fn rename_contributor(&mut self, index: usize, new_name: &str) -> CoreResult<()> {
        let name = non_blank(new_name).ok_or(CoreError::BlankContributor)?;
        let value = self.paid_box_at(index)?.value();

        if let Some(savings_box) = self.campaign.savings_box_mut(index) {
            savings_box.contributor_name = Some(name.clone());
        }

        let payments = &mut self.campaign.payments;
        // A record already credited to `name` stays whole.
        let covering = payments
            .iter()
            .position(|record| record.covers(index) && record.contributor != name);
        if let Some(pos) = covering {
            if payments[pos].box_indices.len() == 1 {
                payments[pos].contributor = name;
            } else {
                // Split the box off so each record keeps a single contributor.
                payments[pos].release(index, value);
                let recorded_at = payments[pos].recorded_at;
                payments.insert(pos + 1, PaymentRecord::new(name, vec![index], value, recorded_at));
            }
        }
        self.campaign.touch(self.clock.now());

        debug!(box_index = index, "contributor renamed");
        self.debug_check();
        Ok(())
    }

    /// Renames the contributor of a whole payment and of every box it covers.
    pub fn rename_payment(&mut self, id: Uuid, new_name: &str) -> CoreResult<()> {
        let name = non_blank(new_name).ok_or(CoreError::BlankContributor)?;
        let record = self
            .campaign
            .payments
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(CoreError::PaymentNotFound(id))?;
        record.contributor = name.clone();
        let indices = record.box_indices.clone();

        for index in indices {
            if let Some(savings_box) = self.campaign.savings_box_mut(index) {
                savings_box.contributor_name = Some(name.clone());
            }
        }
        self.campaign.touch(self.clock.now());

        debug!(payment = %id, "payment renamed");
        self.debug_check();
        Ok(())
    }

    /// Deletes a payment, unmarking every box it covers.
    /// Returns the value removed from the total.
    pub fn remove_payment(&mut self, id: Uuid) -> CoreResult<Amount> {
        let pos = self
            .campaign
            .payments
            .iter()
            .position(|record| record.id == id)
            .ok_or(CoreError::PaymentNotFound(id))?;
        let record = self.campaign.payments.remove(pos);

        let mut removed = 0;
        for index in record.box_indices {
            if let Some(savings_box) = self.campaign.savings_box_mut(index) {
                if savings_box.is_paid {
                    removed += savings_box.value();
                    savings_box.mark_unpaid();
                }
            }
        }
        self.campaign.current_amount -= removed;
        self.campaign.touch(self.clock.now());

        debug!(payment = %id, amount = removed, current = self.campaign.current_amount, "payment removed");
        self.debug_check();
        Ok(removed)
    }

    /// `current / target * 100`, not clamped. A non-positive target is an error.
    pub fn progress_percent(&self) -> CoreResult<f64> {
        progress_percent(&self.campaign)
    }

    pub fn remaining_amount(&self) -> Amount {
        self.campaign.remaining_amount()
    }

    /// Sets the user-controlled completion flag. Amounts are not consulted.
    pub fn set_completed(&mut self, completed: bool) {
        self.campaign.is_completed = completed;
        self.campaign.touch(self.clock.now());
        debug!(completed, "completion flag set");
    }

    fn box_at(&self, index: usize) -> CoreResult<&SavingsBox> {
        self.campaign
            .savings_box(index)
            .ok_or(CoreError::BoxNotFound(index))
    }

    fn paid_box_at(&self, index: usize) -> CoreResult<&SavingsBox> {
        let savings_box = self.box_at(index)?;
        if !savings_box.is_paid {
            return Err(CoreError::BoxNotPaid(index));
        }
        Ok(savings_box)
    }

    fn release_from_history(&mut self, index: usize, value: Amount) {
        let payments = &mut self.campaign.payments;
        if let Some(pos) = payments.iter().position(|record| record.covers(index)) {
            payments[pos].release(index, value);
            if payments[pos].is_empty() {
                payments.remove(pos);
            }
        }
    }

    fn debug_check(&self) {
        debug_assert!(
            invariant_issues(&self.campaign).is_empty(),
            "ledger invariants broken: {:?}",
            invariant_issues(&self.campaign)
        );
    }
}

/// Progress of `campaign` towards its target, in percent.
pub fn progress_percent(campaign: &Campaign) -> CoreResult<f64> {
    if campaign.target_amount <= 0 {
        return Err(CoreError::InvalidTarget(campaign.target_amount));
    }
    Ok(campaign.current_amount as f64 / campaign.target_amount as f64 * 100.0)
}

/// Lists every way `campaign` breaks the ledger invariants. Empty means consistent.
///
/// Boxes paid before payment history existed may lack a record; every record
/// present must still agree with the boxes it covers.
pub fn invariant_issues(campaign: &Campaign) -> Vec<String> {
    let mut issues = Vec::new();

    if campaign.target_amount <= 0 {
        issues.push(format!("target amount {} is not positive", campaign.target_amount));
    }
    let paid_total = campaign.paid_total();
    if paid_total != campaign.current_amount {
        issues.push(format!(
            "current amount {} differs from paid boxes total {}",
            campaign.current_amount, paid_total
        ));
    }
    for (index, savings_box) in campaign.boxes().iter().enumerate() {
        if savings_box.value() <= 0 {
            issues.push(format!("box {index} has non-positive value {}", savings_box.value()));
        }
        if !savings_box.is_paid && savings_box.contributor_name.is_some() {
            issues.push(format!("unpaid box {index} carries a contributor"));
        }
    }

    let mut covered = BTreeSet::new();
    for record in &campaign.payments {
        let mut record_total = 0;
        for &index in &record.box_indices {
            if !covered.insert(index) {
                issues.push(format!("box {index} appears in more than one payment"));
            }
            match campaign.savings_box(index) {
                None => issues.push(format!("payment {} references missing box {index}", record.id)),
                Some(savings_box) if !savings_box.is_paid => {
                    issues.push(format!("payment {} references unpaid box {index}", record.id))
                }
                Some(savings_box) => {
                    record_total += savings_box.value();
                    if savings_box.contributor() != Some(record.contributor.as_str()) {
                        issues.push(format!(
                            "box {index} contributor differs from payment {}",
                            record.id
                        ));
                    }
                }
            }
        }
        if record.is_empty() {
            issues.push(format!("payment {} covers no boxes", record.id));
        }
        if record_total != record.amount {
            issues.push(format!(
                "payment {} amount {} differs from its boxes total {}",
                record.id, record.amount, record_total
            ));
        }
    }
    issues
}

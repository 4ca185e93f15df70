use std::sync::Arc;

use boxsave_config::Config;
use boxsave_core::{
    format::{CurrencyFormatter, SymbolFormatter},
    storage::{CampaignObserver, CampaignStore},
    time::{Clock, SystemClock},
    CampaignLedger, CampaignService, CampaignSummary, CoreError, CoreResult, HistoryEntry,
    HistoryService,
};
use boxsave_domain::{Amount, Campaign, CampaignDraft, CampaignId, Displayable, TargetBounds};
use boxsave_storage_json::JsonCampaignStore;
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{errors::Result, utils::formatter_for};

/// Facade that coordinates the open ledger session with persistence.
///
/// Mutating calls run against the in-memory ledger first and then write the
/// whole campaign back in one `update`. When the store refuses the write the
/// session is restored to what it was before the call.
pub struct CampaignManager {
    store: Box<dyn CampaignStore>,
    session: Option<CampaignLedger>,
    bounds: TargetBounds,
    history_limit: usize,
    clock: Arc<dyn Clock>,
    formatter: SymbolFormatter,
}

impl CampaignManager {
    pub fn new(store: Box<dyn CampaignStore>) -> Self {
        Self::from_config(store, &Config::default())
    }

    pub fn from_config(store: Box<dyn CampaignStore>, config: &Config) -> Self {
        Self {
            store,
            session: None,
            bounds: config.target_bounds(),
            history_limit: config.history_limit,
            clock: Arc::new(SystemClock),
            formatter: formatter_for(config),
        }
    }

    /// Opens the JSON store under the data root `config` resolves to.
    pub fn open_json(config: &Config) -> Result<Self> {
        let root = config.resolve_data_root();
        let store = JsonCampaignStore::new(root.clone())?;
        info!(root = %root.display(), "campaign store opened");
        Ok(Self::from_config(Box::new(store), config))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &dyn CampaignStore {
        self.store.as_ref()
    }

    pub fn subscribe(&self, observer: Arc<dyn CampaignObserver>) {
        self.store.subscribe(observer);
    }

    pub fn bounds(&self) -> TargetBounds {
        self.bounds
    }

    pub fn format_amount(&self, amount: Amount) -> String {
        self.formatter.format_amount(amount)
    }

    /// Validates form input against the configured target bounds.
    pub fn draft(
        &self,
        name: &str,
        description: Option<&str>,
        target_amount: Amount,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<CampaignDraft> {
        Ok(CampaignDraft::new(
            name,
            description,
            target_amount,
            start_date,
            end_date,
            self.bounds,
        )?)
    }

    /// Partitions the draft's target, stores the campaign, and opens it.
    pub fn create_campaign(&mut self, draft: &CampaignDraft) -> Result<Campaign> {
        let mut campaign = CampaignService::create(draft, self.clock.as_ref());
        let id = self.store.create(&campaign)?;
        campaign.id = Some(id);
        self.session = Some(CampaignLedger::with_clock(campaign.clone(), self.clock.clone())?);

        info!(
            campaign = %id,
            target = %self.format_amount(campaign.target_amount),
            boxes = campaign.box_count(),
            "campaign created"
        );
        Ok(campaign)
    }

    /// Loads a stored campaign into a fresh session with an empty selection.
    pub fn open(&mut self, id: CampaignId) -> Result<&Campaign> {
        let campaign = self.store.read(id)?;
        let ledger = CampaignLedger::with_clock(campaign, self.clock.clone())?;
        info!(campaign = %ledger.campaign().display_label(), "campaign opened");
        Ok(self.session.insert(ledger).campaign())
    }

    /// Opens the first campaign that is not completed, if any.
    pub fn open_active(&mut self) -> Result<Option<&Campaign>> {
        let campaigns = self.store.read_all()?;
        let Some(active) = HistoryService::active_campaign(&campaigns).cloned() else {
            self.session = None;
            return Ok(None);
        };
        let ledger = CampaignLedger::with_clock(active, self.clock.clone())?;
        Ok(Some(self.session.insert(ledger).campaign()))
    }

    /// Ends the session. Unsaved selection is discarded.
    pub fn close(&mut self) -> Option<Campaign> {
        self.session.take().map(CampaignLedger::into_campaign)
    }

    pub fn current(&self) -> Option<&Campaign> {
        self.session.as_ref().map(CampaignLedger::campaign)
    }

    pub fn ledger(&self) -> Option<&CampaignLedger> {
        self.session.as_ref()
    }

    pub fn campaigns(&self) -> Result<Vec<Campaign>> {
        Ok(self.store.read_all()?)
    }

    pub fn select(&mut self, index: usize) -> Result<bool> {
        Ok(self.session_mut()?.select(index)?)
    }

    pub fn deselect(&mut self, index: usize) -> Result<bool> {
        Ok(self.session_mut()?.deselect(index)?)
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        Ok(self.session_mut()?.toggle(index)?)
    }

    pub fn selection(&self) -> Result<Vec<usize>> {
        Ok(self.session_ref()?.selection())
    }

    pub fn selection_total(&self) -> Result<Amount> {
        Ok(self.session_ref()?.selection_total())
    }

    /// Commits the selected boxes as one payment by `contributor`.
    pub fn record_payment(&mut self, contributor: &str) -> Result<Campaign> {
        let (record, campaign) = self.commit(|ledger| ledger.record_payment(contributor))?;
        info!(
            payment = %record.id,
            label = %record.display_label(),
            amount = %self.format_amount(record.amount),
            total = %self.format_amount(campaign.current_amount),
            "payment saved"
        );
        Ok(campaign)
    }

    pub fn unmark_paid(&mut self, index: usize) -> Result<Campaign> {
        let (value, campaign) = self.commit(|ledger| ledger.unmark_paid(index))?;
        info!(box_index = index, value = %self.format_amount(value), "box unmarked");
        Ok(campaign)
    }

    pub fn rename_contributor(&mut self, index: usize, new_name: &str) -> Result<Campaign> {
        let ((), campaign) = self.commit(|ledger| ledger.rename_contributor(index, new_name))?;
        Ok(campaign)
    }

    pub fn rename_payment(&mut self, payment: Uuid, new_name: &str) -> Result<Campaign> {
        let ((), campaign) = self.commit(|ledger| ledger.rename_payment(payment, new_name))?;
        Ok(campaign)
    }

    pub fn remove_payment(&mut self, payment: Uuid) -> Result<Campaign> {
        let (value, campaign) = self.commit(|ledger| ledger.remove_payment(payment))?;
        info!(payment = %payment, value = %self.format_amount(value), "payment removed");
        Ok(campaign)
    }

    /// Flags the open campaign as finished. Amounts are not consulted.
    pub fn complete(&mut self) -> Result<Campaign> {
        let ((), campaign) = self.commit(|ledger| {
            ledger.set_completed(true);
            Ok(())
        })?;
        info!(campaign = %campaign.name, "campaign completed");
        Ok(campaign)
    }

    pub fn reopen(&mut self) -> Result<Campaign> {
        let ((), campaign) = self.commit(|ledger| {
            ledger.set_completed(false);
            Ok(())
        })?;
        Ok(campaign)
    }

    pub fn summary(&self) -> Result<CampaignSummary> {
        Ok(CampaignService::summarize(self.session_ref()?)?)
    }

    /// Completed campaigns, newest first, capped at the configured history limit.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        let campaigns = self.store.read_all()?;
        Ok(HistoryService::recent_history(&campaigns, self.history_limit))
    }

    fn session_ref(&self) -> CoreResult<&CampaignLedger> {
        self.session.as_ref().ok_or(CoreError::NoOpenCampaign)
    }

    fn session_mut(&mut self) -> CoreResult<&mut CampaignLedger> {
        self.session.as_mut().ok_or(CoreError::NoOpenCampaign)
    }

    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut CampaignLedger) -> CoreResult<T>,
    ) -> Result<(T, Campaign)> {
        let ledger = self.session.as_mut().ok_or(CoreError::NoOpenCampaign)?;
        let id = ledger.campaign().id.ok_or(CoreError::CampaignNotSaved)?;
        let snapshot = ledger.clone();

        let value = op(ledger)?;
        if let Err(err) = self.store.update(id, ledger.campaign()) {
            warn!(campaign = %id, error = %err, "store rejected update; session rolled back");
            *ledger = snapshot;
            return Err(err.into());
        }
        Ok((value, ledger.campaign().clone()))
    }
}

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

use boxsave_domain::{Campaign, CampaignId};

use crate::{ledger::invariant_issues, CoreError, CoreResult};

/// Emitted to subscribers after a write has been accepted by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Created(CampaignId),
    Updated(CampaignId),
}

impl StoreEvent {
    pub fn campaign_id(&self) -> CampaignId {
        match self {
            StoreEvent::Created(id) | StoreEvent::Updated(id) => *id,
        }
    }
}

/// Receives post-write notifications from a [`CampaignStore`].
pub trait CampaignObserver: Send + Sync {
    fn on_event(&self, event: &StoreEvent);
}

impl<F> CampaignObserver for F
where
    F: Fn(&StoreEvent) + Send + Sync,
{
    fn on_event(&self, event: &StoreEvent) {
        self(event)
    }
}

/// Subscriber registry shared by store implementations.
#[derive(Default)]
pub struct ObserverList {
    observers: Mutex<Vec<Arc<dyn CampaignObserver>>>,
}

impl ObserverList {
    pub fn subscribe(&self, observer: Arc<dyn CampaignObserver>) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    pub fn notify(&self, event: StoreEvent) {
        let observers = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer.on_event(&event);
        }
    }
}

/// Record store the campaigns are persisted through.
///
/// Stores assign identifiers on `create`, return campaigns in creation order
/// from `read_all`, and replace whole records on `update`.
pub trait CampaignStore: Send + Sync {
    fn create(&self, campaign: &Campaign) -> CoreResult<CampaignId>;
    fn read_all(&self) -> CoreResult<Vec<Campaign>>;
    fn update(&self, id: CampaignId, campaign: &Campaign) -> CoreResult<()>;
    fn subscribe(&self, observer: Arc<dyn CampaignObserver>);

    fn read(&self, id: CampaignId) -> CoreResult<Campaign> {
        self.read_all()?
            .into_iter()
            .find(|campaign| campaign.id == Some(id))
            .ok_or(CoreError::CampaignNotFound(id))
    }
}

impl<S: CampaignStore + ?Sized> CampaignStore for Arc<S> {
    fn create(&self, campaign: &Campaign) -> CoreResult<CampaignId> {
        (**self).create(campaign)
    }

    fn read_all(&self) -> CoreResult<Vec<Campaign>> {
        (**self).read_all()
    }

    fn update(&self, id: CampaignId, campaign: &Campaign) -> CoreResult<()> {
        (**self).update(id, campaign)
    }

    fn subscribe(&self, observer: Arc<dyn CampaignObserver>) {
        (**self).subscribe(observer)
    }

    fn read(&self, id: CampaignId) -> CoreResult<Campaign> {
        (**self).read(id)
    }
}

/// Detects inconsistencies in a stored campaign, labelled for log output.
pub fn campaign_warnings(campaign: &Campaign) -> Vec<String> {
    let label = match campaign.id {
        Some(id) => format!("campaign {id}"),
        None => format!("campaign `{}`", campaign.name),
    };
    invariant_issues(campaign)
        .into_iter()
        .map(|issue| format!("{label}: {issue}"))
        .collect()
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    campaigns: Vec<Campaign>,
}

/// Keeps campaigns in memory. Handy for tests and for embedding without a disk.
#[derive(Default)]
pub struct MemoryCampaignStore {
    state: Mutex<MemoryState>,
    observers: ObserverList,
    read_only: AtomicBool,
}

impl MemoryCampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every write fails with [`CoreError::Storage`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn ensure_writable(&self) -> CoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("store is read-only".into()));
        }
        Ok(())
    }
}

impl CampaignStore for MemoryCampaignStore {
    fn create(&self, campaign: &Campaign) -> CoreResult<CampaignId> {
        self.ensure_writable()?;
        let id = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.next_id += 1;
            let id = CampaignId(state.next_id);
            let mut stored = campaign.clone();
            stored.id = Some(id);
            state.campaigns.push(stored);
            id
        };
        self.observers.notify(StoreEvent::Created(id));
        Ok(id)
    }

    fn read_all(&self) -> CoreResult<Vec<Campaign>> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(state.campaigns.clone())
    }

    fn update(&self, id: CampaignId, campaign: &Campaign) -> CoreResult<()> {
        self.ensure_writable()?;
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = state
                .campaigns
                .iter_mut()
                .find(|stored| stored.id == Some(id))
                .ok_or(CoreError::CampaignNotFound(id))?;
            *slot = campaign.clone();
            slot.id = Some(id);
        }
        self.observers.notify(StoreEvent::Updated(id));
        Ok(())
    }

    fn subscribe(&self, observer: Arc<dyn CampaignObserver>) {
        self.observers.subscribe(observer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{time::SystemClock, CampaignService};
    use boxsave_domain::{CampaignDraft, TargetBounds};
    use chrono::NaiveDate;

    fn campaign(name: &str) -> Campaign {
        let draft = CampaignDraft::new(
            name,
            None,
            15,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            None,
            TargetBounds::unbounded(),
        )
        .unwrap();
        CampaignService::create(&draft, &SystemClock)
    }

    #[test]
    fn memory_store_assigns_sequential_ids_and_notifies() {
        let store = MemoryCampaignStore::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        store.subscribe(Arc::new(move |event: &StoreEvent| {
            sink.lock().unwrap().push(*event);
        }));

        let first = store.create(&campaign("First")).unwrap();
        let second = store.create(&campaign("Second")).unwrap();
        assert_eq!(first, CampaignId(1));
        assert_eq!(second, CampaignId(2));

        let mut stored = store.read(first).unwrap();
        stored.name = "Renamed".into();
        store.update(first, &stored).unwrap();

        let names: Vec<_> = store
            .read_all()
            .unwrap()
            .into_iter()
            .map(|campaign| campaign.name)
            .collect();
        assert_eq!(names, vec!["Renamed", "Second"]);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                StoreEvent::Created(first),
                StoreEvent::Created(second),
                StoreEvent::Updated(first)
            ]
        );
    }

    #[test]
    fn memory_store_rejects_unknown_ids_and_read_only_writes() {
        let store = MemoryCampaignStore::new();
        let record = campaign("Only");
        assert!(matches!(
            store.update(CampaignId(9), &record),
            Err(CoreError::CampaignNotFound(CampaignId(9)))
        ));
        assert!(matches!(
            store.read(CampaignId(9)),
            Err(CoreError::CampaignNotFound(_))
        ));

        store.set_read_only(true);
        assert!(matches!(store.create(&record), Err(CoreError::Storage(_))));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn warnings_are_labelled() {
        let mut record = campaign("Broken");
        record.current_amount = 2;
        let warnings = campaign_warnings(&record);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("campaign `Broken`:"));
    }
}

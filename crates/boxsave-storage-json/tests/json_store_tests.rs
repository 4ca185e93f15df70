use std::{
    fs,
    sync::{Arc, Mutex},
};

use boxsave_core::{
    storage::{CampaignStore, StoreEvent},
    time::SystemClock,
    CampaignLedger, CampaignService, CoreError,
};
use boxsave_domain::{Campaign, CampaignDraft, CampaignId, Profile, TargetBounds};
use boxsave_storage_json::JsonCampaignStore;
use chrono::NaiveDate;
use tempfile::tempdir;

fn sample_campaign(name: &str, target: i64) -> Campaign {
    let draft = CampaignDraft::new(
        name,
        Some("saved by the box"),
        target,
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        NaiveDate::from_ymd_opt(2025, 12, 31),
        TargetBounds::unbounded(),
    )
    .expect("draft");
    CampaignService::create(&draft, &SystemClock)
}

#[test]
fn json_store_creates_and_reads_campaigns() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCampaignStore::new(dir.path().join("data")).expect("create store");

    let id = store.create(&sample_campaign("Laptop", 1_000)).expect("create");
    assert_eq!(id, CampaignId(1));

    let loaded = store.read(id).expect("read");
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.name, "Laptop");
    assert_eq!(loaded.box_count(), 44);
    assert_eq!(loaded.description.as_deref(), Some("saved by the box"));
    assert!(store.store_path().exists());
}

#[test]
fn json_store_keeps_ids_across_reopen() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path().to_path_buf();
    {
        let store = JsonCampaignStore::new(root.clone()).expect("create store");
        store.create(&sample_campaign("First", 10)).expect("create");
        store.create(&sample_campaign("Second", 10)).expect("create");
    }

    let reopened = JsonCampaignStore::new(root).expect("reopen store");
    let third = reopened.create(&sample_campaign("Third", 10)).expect("create");
    assert_eq!(third, CampaignId(3));

    let names: Vec<_> = reopened
        .read_all()
        .expect("read all")
        .into_iter()
        .map(|campaign| campaign.name)
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[test]
fn json_store_persists_ledger_mutations() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCampaignStore::new(dir.path().to_path_buf()).expect("create store");
    let id = store.create(&sample_campaign("Bike", 10)).expect("create");

    let mut ledger = CampaignLedger::open(store.read(id).unwrap()).expect("open");
    ledger.select(1).unwrap();
    ledger.select(3).unwrap();
    ledger.record_payment("Alice").unwrap();
    store.update(id, ledger.campaign()).expect("update");

    let reloaded = store.read(id).expect("read");
    assert_eq!(reloaded.current_amount, 6);
    assert_eq!(reloaded.payments.len(), 1);
    assert_eq!(reloaded.savings_box(3).unwrap().contributor(), Some("Alice"));

    let report = store.load_report().expect("report");
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn json_store_rejects_unknown_campaign() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCampaignStore::new(dir.path().to_path_buf()).expect("create store");
    let err = store
        .update(CampaignId(42), &sample_campaign("Ghost", 10))
        .expect_err("update must fail");
    assert!(matches!(err, CoreError::CampaignNotFound(CampaignId(42))));
}

#[test]
fn json_store_reports_inconsistent_campaigns() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCampaignStore::new(dir.path().to_path_buf()).expect("create store");
    let mut broken = sample_campaign("Broken", 10);
    broken.current_amount = 7;
    store.create(&broken).expect("create");

    let report = store.load_report().expect("report");
    assert_eq!(report.campaigns.len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("current amount 7"));

    let opened = CampaignLedger::open(report.campaigns[0].clone());
    assert!(matches!(opened, Err(CoreError::InvariantViolation(_))));
}

#[test]
fn json_store_notifies_subscribers_after_writes() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCampaignStore::new(dir.path().to_path_buf()).expect("create store");
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    store.subscribe(Arc::new(move |event: &StoreEvent| {
        sink.lock().unwrap().push(*event);
    }));

    let id = store.create(&sample_campaign("Watched", 10)).expect("create");
    let campaign = store.read(id).unwrap();
    store.update(id, &campaign).expect("update");
    let _ = store.update(CampaignId(99), &campaign);

    assert_eq!(
        *events.lock().unwrap(),
        vec![StoreEvent::Created(id), StoreEvent::Updated(id)]
    );
}

#[test]
fn failed_write_preserves_existing_document() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCampaignStore::new(dir.path().to_path_buf()).expect("create store");
    let id = store.create(&sample_campaign("Stable", 10)).expect("create");
    let original = fs::read_to_string(store.store_path()).expect("read original");

    // A directory squatting on the temp file name makes the staged write fail.
    let mut tmp = store.store_path();
    tmp.set_extension("json.tmp");
    fs::create_dir_all(&tmp).unwrap();

    let mut changed = store.read(id).unwrap();
    changed.name = "Changed".into();
    assert!(store.update(id, &changed).is_err());

    let current = fs::read_to_string(store.store_path()).expect("read after failure");
    assert_eq!(current, original);
}

#[test]
fn json_store_round_trips_profile() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCampaignStore::new(dir.path().to_path_buf()).expect("create store");
    assert!(store.load_profile().expect("load").is_none());

    let profile = Profile::new("Ana", "PIX", "ana@example.com", "brl").expect("profile");
    store.save_profile(&profile).expect("save profile");

    assert_eq!(store.load_profile().expect("load"), Some(profile));
}

#[test]
fn json_store_refuses_newer_schema() {
    let dir = tempdir().expect("tempdir");
    let store = JsonCampaignStore::new(dir.path().to_path_buf()).expect("create store");
    fs::write(
        store.store_path(),
        r#"{"schema_version": 200, "next_id": 0, "campaigns": []}"#,
    )
    .unwrap();

    assert!(matches!(store.read_all(), Err(CoreError::Storage(_))));
}

#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use boxsave::{
    CampaignDraft, CampaignManager, Config, ConfigManager, FixedClock, JsonCampaignStore,
    MemoryCampaignStore,
};
use chrono::{NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()))
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

/// Creates a unique data directory that is cleaned up when the test binary exits.
pub fn temp_root() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Manager backed by a shared in-memory store the test can poke at directly.
pub fn memory_manager() -> (CampaignManager, Arc<MemoryCampaignStore>) {
    let store = Arc::new(MemoryCampaignStore::new());
    let manager = CampaignManager::new(Box::new(store.clone())).with_clock(clock());
    (manager, store)
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (CampaignManager, ConfigManager, PathBuf) {
    let base = temp_root();
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let manager = json_manager(&base.join("data"), &Config::default());
    (manager, config_manager, base)
}

pub fn json_manager(root: &std::path::Path, config: &Config) -> CampaignManager {
    let store = JsonCampaignStore::new(root.to_path_buf()).expect("create json store");
    CampaignManager::from_config(Box::new(store), config).with_clock(clock())
}

pub fn draft(manager: &CampaignManager, name: &str, target: i64) -> CampaignDraft {
    manager
        .draft(name, None, target, start_date(), None)
        .expect("valid draft")
}

//! boxsave-storage-json
//!
//! Filesystem-backed [`CampaignStore`]: every campaign lives in a single
//! `campaigns.json` document next to an optional `profile.json`.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use boxsave_core::{
    storage::{campaign_warnings, CampaignObserver, CampaignStore, ObserverList, StoreEvent},
    CoreError, CoreResult,
};
use boxsave_domain::{Campaign, CampaignId, Profile, CURRENT_SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const STORE_FILE: &str = "campaigns.json";
const PROFILE_FILE: &str = "profile.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default = "Campaign::schema_version_default")]
    schema_version: u8,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    campaigns: Vec<Campaign>,
}

impl StoreDocument {
    fn allocate_id(&mut self) -> CampaignId {
        let highest = self
            .campaigns
            .iter()
            .filter_map(|campaign| campaign.id)
            .map(CampaignId::get)
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(highest) + 1;
        CampaignId(self.next_id)
    }
}

/// Campaigns read from disk together with any anomalies found in them.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub campaigns: Vec<Campaign>,
    pub warnings: Vec<String>,
    pub path: PathBuf,
}

pub struct JsonCampaignStore {
    root: PathBuf,
    observers: ObserverList,
    write_lock: Mutex<()>,
}

impl JsonCampaignStore {
    pub fn new(root: PathBuf) -> CoreResult<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            observers: ObserverList::default(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store_path(&self) -> PathBuf {
        self.root.join(STORE_FILE)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.root.join(PROFILE_FILE)
    }

    /// Loads every campaign and reports inconsistencies instead of refusing them.
    pub fn load_report(&self) -> CoreResult<LoadReport> {
        let document = self.read_document()?;
        let warnings: Vec<String> = document
            .campaigns
            .iter()
            .flat_map(campaign_warnings)
            .collect();
        for warning in &warnings {
            warn!(path = %self.store_path().display(), "{warning}");
        }
        Ok(LoadReport {
            campaigns: document.campaigns,
            warnings,
            path: self.store_path(),
        })
    }

    pub fn save_profile(&self, profile: &Profile) -> CoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let json = serde_json::to_string_pretty(profile).map_err(serde_error)?;
        write_atomic(&self.profile_path(), &json)
    }

    pub fn load_profile(&self) -> CoreResult<Option<Profile>> {
        let path = self.profile_path();
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map(Some).map_err(serde_error)
    }

    fn read_document(&self) -> CoreResult<StoreDocument> {
        let path = self.store_path();
        if !path.exists() {
            return Ok(StoreDocument {
                schema_version: CURRENT_SCHEMA_VERSION,
                ..StoreDocument::default()
            });
        }
        let data = fs::read_to_string(&path)?;
        let document: StoreDocument = serde_json::from_str(&data).map_err(serde_error)?;
        if document.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(CoreError::Storage(format!(
                "{} uses schema version {}, newest supported is {}",
                path.display(),
                document.schema_version,
                CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(document)
    }

    fn write_document(&self, document: &StoreDocument) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(document).map_err(serde_error)?;
        write_atomic(&self.store_path(), &json)
    }
}

impl CampaignStore for JsonCampaignStore {
    fn create(&self, campaign: &Campaign) -> CoreResult<CampaignId> {
        let id = {
            let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
            let mut document = self.read_document()?;
            let id = document.allocate_id();
            let mut stored = campaign.clone();
            stored.id = Some(id);
            document.campaigns.push(stored);
            self.write_document(&document)?;
            id
        };
        debug!(campaign = %id, "campaign created on disk");
        self.observers.notify(StoreEvent::Created(id));
        Ok(id)
    }

    fn read_all(&self) -> CoreResult<Vec<Campaign>> {
        Ok(self.load_report()?.campaigns)
    }

    fn update(&self, id: CampaignId, campaign: &Campaign) -> CoreResult<()> {
        {
            let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
            let mut document = self.read_document()?;
            let slot = document
                .campaigns
                .iter_mut()
                .find(|stored| stored.id == Some(id))
                .ok_or(CoreError::CampaignNotFound(id))?;
            *slot = campaign.clone();
            slot.id = Some(id);
            self.write_document(&document)?;
        }
        debug!(campaign = %id, "campaign updated on disk");
        self.observers.notify(StoreEvent::Updated(id));
        Ok(())
    }

    fn subscribe(&self, observer: Arc<dyn CampaignObserver>) {
        self.observers.subscribe(observer);
    }
}

fn serde_error(err: serde_json::Error) -> CoreError {
    CoreError::Serde(err.to_string())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Stages `data` next to `path` and renames it into place, so readers never see half a file.
fn write_atomic(path: &Path, data: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#![doc(test(attr(deny(warnings))))]

//! Boxsave tracks savings goals split into numbered boxes.
//!
//! The workspace crates hold the domain model, the campaign ledger, JSON
//! persistence, and user configuration. This crate ties them together behind
//! [`CampaignManager`].

pub mod errors;
pub mod manager;
pub mod utils;

pub use boxsave_config::{Config, ConfigManager};
pub use boxsave_core::{
    format::{CurrencyFormatter, SymbolFormatter},
    storage::{CampaignObserver, CampaignStore, MemoryCampaignStore, StoreEvent},
    time::{Clock, FixedClock, SystemClock},
    CampaignLedger, CampaignSummary, HistoryEntry,
};
pub use boxsave_domain::{
    Amount, Campaign, CampaignDraft, CampaignId, PaymentRecord, Profile, SavingsBox, TargetBounds,
};
pub use boxsave_storage_json::JsonCampaignStore;
pub use errors::{BoxsaveError, Result};
pub use manager::CampaignManager;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Boxsave tracing initialized.");
    });
}

//! boxsave-core
//!
//! Business logic and services for boxsave: box partitioning, the campaign
//! ledger and the persistence contract it is saved through.
//! Depends on boxsave-domain. No terminal I/O, no direct file access.

pub mod campaign_service;
pub mod error;
pub mod format;
pub mod history_service;
pub mod ledger;
pub mod partition;
pub mod storage;
pub mod time;

pub use campaign_service::*;
pub use error::{CoreError, CoreResult};
pub use history_service::*;
pub use ledger::CampaignLedger;
pub use partition::partition;

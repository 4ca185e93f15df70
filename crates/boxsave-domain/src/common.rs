//! Shared traits, identifiers and amount helpers for savings primitives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whole currency units. Box denominations and campaign totals are integral.
pub type Amount = i64;

/// Store-assigned identifier for a persisted campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub u64);

impl CampaignId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Trims `raw` and returns `None` when nothing is left.
pub fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_trims_and_rejects_whitespace() {
        assert_eq!(non_blank("  Alice "), Some("Alice".to_string()));
        assert_eq!(non_blank(" \t "), None);
        assert_eq!(non_blank(""), None);
    }

    #[test]
    fn campaign_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&CampaignId(7)).unwrap();
        assert_eq!(json, "7");
        assert_eq!(CampaignId(7).to_string(), "#7");
    }
}

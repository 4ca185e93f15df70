//! Validated input for creating a campaign.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

pub const DEFAULT_MIN_TARGET: Amount = 1_000;
pub const DEFAULT_MAX_TARGET: Amount = 90_000;

/// Inclusive range of target amounts a new campaign may use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetBounds {
    pub min: Amount,
    pub max: Amount,
}

impl TargetBounds {
    pub fn new(min: Amount, max: Amount) -> Self {
        Self {
            min: min.max(1),
            max,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(1, Amount::MAX)
    }

    pub fn range(&self) -> RangeInclusive<Amount> {
        self.min..=self.max
    }
}

impl Default for TargetBounds {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TARGET, DEFAULT_MAX_TARGET)
    }
}

/// Immutable, already-validated form values for a new campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignDraft {
    name: String,
    description: Option<String>,
    target_amount: Amount,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl CampaignDraft {
    pub fn new(
        name: &str,
        description: Option<&str>,
        target_amount: Amount,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        bounds: TargetBounds,
    ) -> Result<Self, DraftError> {
        let name = non_blank(name).ok_or(DraftError::MissingName)?;
        if target_amount < 1 {
            return Err(DraftError::NonPositiveTarget(target_amount));
        }
        if target_amount < bounds.min {
            return Err(DraftError::TargetTooSmall {
                amount: target_amount,
                min: bounds.min,
            });
        }
        if target_amount > bounds.max {
            return Err(DraftError::TargetTooLarge {
                amount: target_amount,
                max: bounds.max,
            });
        }
        if let Some(end) = end_date {
            if end < start_date {
                return Err(DraftError::EndBeforeStart);
            }
        }
        Ok(Self {
            name,
            description: description.and_then(non_blank),
            target_amount,
            start_date,
            end_date,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn target_amount(&self) -> Amount {
        self.target_amount
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`CampaignDraft`] values.
pub enum DraftError {
    MissingName,
    NonPositiveTarget(Amount),
    TargetTooSmall { amount: Amount, min: Amount },
    TargetTooLarge { amount: Amount, max: Amount },
    EndBeforeStart,
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::MissingName => f.write_str("campaign name is required"),
            DraftError::NonPositiveTarget(amount) => {
                write!(f, "target amount must be positive (got {amount})")
            }
            DraftError::TargetTooSmall { min, .. } => {
                write!(f, "target amount must be at least {min}")
            }
            DraftError::TargetTooLarge { max, .. } => {
                write!(f, "target amount cannot exceed {max}")
            }
            DraftError::EndBeforeStart => f.write_str("end date must not precede start date"),
        }
    }
}

impl std::error::Error for DraftError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn draft_trims_fields() {
        let draft = CampaignDraft::new(
            "  Trip ",
            Some("   "),
            5_000,
            day(1),
            None,
            TargetBounds::default(),
        )
        .unwrap();
        assert_eq!(draft.name(), "Trip");
        assert_eq!(draft.description(), None);
    }

    #[test]
    fn draft_enforces_bounds() {
        let bounds = TargetBounds::default();
        assert_eq!(
            CampaignDraft::new("Car", None, 999, day(1), None, bounds),
            Err(DraftError::TargetTooSmall {
                amount: 999,
                min: 1_000
            })
        );
        assert_eq!(
            CampaignDraft::new("Car", None, 90_001, day(1), None, bounds),
            Err(DraftError::TargetTooLarge {
                amount: 90_001,
                max: 90_000
            })
        );
        assert_eq!(
            CampaignDraft::new("Car", None, 0, day(1), None, TargetBounds::unbounded()),
            Err(DraftError::NonPositiveTarget(0))
        );
    }

    #[test]
    fn draft_rejects_blank_name_and_inverted_dates() {
        let bounds = TargetBounds::unbounded();
        assert_eq!(
            CampaignDraft::new(" ", None, 10, day(1), None, bounds),
            Err(DraftError::MissingName)
        );
        assert_eq!(
            CampaignDraft::new("Bike", None, 10, day(5), Some(day(4)), bounds),
            Err(DraftError::EndBeforeStart)
        );
    }
}

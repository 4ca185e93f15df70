//! Payment-history records kept alongside the boxes they paid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// One committed payment: a contributor paying a set of boxes at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub contributor: String,
    pub box_indices: Vec<usize>,
    pub amount: Amount,
    pub recorded_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(
        contributor: impl Into<String>,
        box_indices: Vec<usize>,
        amount: Amount,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            contributor: contributor.into(),
            box_indices,
            amount,
            recorded_at,
        }
    }

    pub fn covers(&self, index: usize) -> bool {
        self.box_indices.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.box_indices.is_empty()
    }

    /// Drops `index` from the record and subtracts `value` from its amount.
    /// Returns `false` if the record did not cover the index.
    pub fn release(&mut self, index: usize, value: Amount) -> bool {
        let before = self.box_indices.len();
        self.box_indices.retain(|&covered| covered != index);
        if self.box_indices.len() == before {
            return false;
        }
        self.amount -= value;
        true
    }
}

impl Displayable for PaymentRecord {
    fn display_label(&self) -> String {
        format!("{} paid {}", self.contributor, self.amount)
    }
}

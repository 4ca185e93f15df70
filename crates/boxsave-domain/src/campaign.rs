//! Campaign aggregate: a savings goal and its fixed set of boxes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, draft::CampaignDraft, payment::PaymentRecord, savings_box::SavingsBox};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CampaignId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: Amount,
    #[serde(default)]
    pub current_amount: Amount,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
    boxes: Vec<SavingsBox>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Campaign::schema_version_default")]
    pub schema_version: u8,
}

impl Campaign {
    /// Builds an unsaved campaign from a validated draft and its box values.
    pub fn new(draft: &CampaignDraft, box_values: &[Amount], now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: draft.name().to_string(),
            description: draft.description().map(str::to_string),
            target_amount: draft.target_amount(),
            current_amount: 0,
            start_date: draft.start_date(),
            end_date: draft.end_date(),
            is_completed: false,
            boxes: box_values.iter().copied().map(SavingsBox::new).collect(),
            payments: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn boxes(&self) -> &[SavingsBox] {
        &self.boxes
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn savings_box(&self, index: usize) -> Option<&SavingsBox> {
        self.boxes.get(index)
    }

    /// Mutable access to one box. The collection itself never grows or shrinks.
    pub fn savings_box_mut(&mut self, index: usize) -> Option<&mut SavingsBox> {
        self.boxes.get_mut(index)
    }

    /// Sum of paid box values, recomputed from the boxes themselves.
    pub fn paid_total(&self) -> Amount {
        self.boxes
            .iter()
            .filter(|savings_box| savings_box.is_paid)
            .map(SavingsBox::value)
            .sum()
    }

    /// Highest total the boxes can ever collect.
    pub fn reachable_total(&self) -> Amount {
        self.boxes.iter().map(SavingsBox::value).sum()
    }

    pub fn remaining_amount(&self) -> Amount {
        self.target_amount - self.current_amount
    }

    pub fn paid_box_count(&self) -> usize {
        self.boxes.iter().filter(|savings_box| savings_box.is_paid).count()
    }

    pub fn payment(&self, id: Uuid) -> Option<&PaymentRecord> {
        self.payments.iter().find(|record| record.id == id)
    }

    pub fn payment_for_box(&self, index: usize) -> Option<&PaymentRecord> {
        self.payments.iter().find(|record| record.covers(index))
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Displayable for Campaign {
    fn display_label(&self) -> String {
        match self.id {
            Some(id) => format!("{} {} [{}/{}]", id, self.name, self.current_amount, self.target_amount),
            None => format!("{} [{}/{}]", self.name, self.current_amount, self.target_amount),
        }
    }
}

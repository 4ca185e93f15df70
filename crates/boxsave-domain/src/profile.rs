//! Saver profile: who is collecting and how contributors can pay.

use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub payment_name: String,
    #[serde(default)]
    pub payment_key: String,
    #[serde(default = "Profile::default_currency")]
    pub currency: String,
}

impl Profile {
    /// Returns `None` when the profile name is blank.
    pub fn new(
        name: &str,
        payment_name: &str,
        payment_key: &str,
        currency: impl Into<String>,
    ) -> Option<Self> {
        Some(Self {
            name: non_blank(name)?,
            payment_name: payment_name.trim().to_string(),
            payment_key: payment_key.trim().to_string(),
            currency: currency.into().to_uppercase(),
        })
    }

    pub fn default_currency() -> String {
        "BRL".into()
    }

    pub fn has_payment_details(&self) -> bool {
        !self.payment_key.is_empty()
    }
}

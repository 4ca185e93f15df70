//! A single payable denomination within a campaign.

use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavingsBox {
    value: Amount,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_name: Option<String>,
}

impl SavingsBox {
    pub fn new(value: Amount) -> Self {
        Self {
            value,
            is_paid: false,
            contributor_name: None,
        }
    }

    /// Denomination assigned at creation. There is no setter.
    pub fn value(&self) -> Amount {
        self.value
    }

    pub fn contributor(&self) -> Option<&str> {
        self.contributor_name.as_deref()
    }

    pub fn mark_paid(&mut self, contributor: impl Into<String>) {
        self.is_paid = true;
        self.contributor_name = Some(contributor.into());
    }

    pub fn mark_unpaid(&mut self) {
        self.is_paid = false;
        self.contributor_name = None;
    }
}

impl Displayable for SavingsBox {
    fn display_label(&self) -> String {
        match (self.is_paid, self.contributor()) {
            (true, Some(name)) => format!("{} (paid by {})", self.value, name),
            (true, None) => format!("{} (paid)", self.value),
            (false, _) => self.value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaid_box_drops_contributor() {
        let mut savings_box = SavingsBox::new(4);
        savings_box.mark_paid("Alice");
        assert_eq!(savings_box.display_label(), "4 (paid by Alice)");

        savings_box.mark_unpaid();
        assert!(!savings_box.is_paid);
        assert!(savings_box.contributor().is_none());
        assert_eq!(savings_box.value(), 4);
    }

    #[test]
    fn legacy_records_without_flags_load_unpaid() {
        let savings_box: SavingsBox = serde_json::from_str(r#"{"value":3}"#).unwrap();
        assert_eq!(savings_box, SavingsBox::new(3));
    }
}

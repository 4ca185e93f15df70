use boxsave_domain::Amount;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Amount) -> String;
}

/// Prefixes a currency symbol and groups thousands, e.g. `R$12,500`.
#[derive(Debug, Clone)]
pub struct SymbolFormatter {
    pub symbol: String,
    pub grouping_separator: char,
}

impl SymbolFormatter {
    pub fn new(symbol: impl Into<String>, grouping_separator: char) -> Self {
        Self {
            symbol: symbol.into(),
            grouping_separator,
        }
    }
}

impl Default for SymbolFormatter {
    fn default() -> Self {
        Self::new("R$", ',')
    }
}

impl CurrencyFormatter for SymbolFormatter {
    fn format_amount(&self, amount: Amount) -> String {
        let digits = amount.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(self.grouping_separator);
            }
            grouped.push(ch);
        }
        let sign = if amount < 0 { "-" } else { "" };
        format!("{sign}{}{grouped}", self.symbol)
    }
}

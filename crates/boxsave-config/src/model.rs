use std::{env, path::PathBuf};

use boxsave_domain::{Amount, TargetBounds, DEFAULT_MAX_TARGET, DEFAULT_MIN_TARGET};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Environment variable that overrides where campaign data is kept.
pub const DATA_HOME_ENV: &str = "BOXSAVE_HOME";
const DEFAULT_DIR_NAME: &str = "boxsave";

/// Stores user-configurable preferences for campaigns and formatting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_grouping_separator")]
    pub grouping_separator: char,
    #[serde(default = "Config::default_min_target")]
    pub min_target_amount: Amount,
    #[serde(default = "Config::default_max_target")]
    pub max_target_amount: Amount,
    #[serde(default = "Config::default_history_limit")]
    pub history_limit: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root for campaign data. See [`Config::resolve_data_root`].
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            currency_symbol: Self::default_currency_symbol(),
            grouping_separator: Self::default_grouping_separator(),
            min_target_amount: Self::default_min_target(),
            max_target_amount: Self::default_max_target(),
            history_limit: Self::default_history_limit(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "R$".into()
    }

    pub fn default_grouping_separator() -> char {
        ','
    }

    pub fn default_min_target() -> Amount {
        DEFAULT_MIN_TARGET
    }

    pub fn default_max_target() -> Amount {
        DEFAULT_MAX_TARGET
    }

    pub fn default_history_limit() -> usize {
        5
    }

    pub fn target_bounds(&self) -> TargetBounds {
        TargetBounds::new(self.min_target_amount, self.max_target_amount)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_target_amount < 1 {
            return Err(ConfigError::Invalid(format!(
                "min_target_amount must be positive (got {})",
                self.min_target_amount
            )));
        }
        if self.max_target_amount < self.min_target_amount {
            return Err(ConfigError::Invalid(format!(
                "max_target_amount {} is below min_target_amount {}",
                self.max_target_amount, self.min_target_amount
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency must not be empty".into()));
        }
        Ok(())
    }

    /// Explicit `data_root`, else `$BOXSAVE_HOME`, else the platform data dir.
    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }
        if let Some(custom) = env::var_os(DATA_HOME_ENV) {
            return PathBuf::from(custom);
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(DEFAULT_DIR_NAME)
    }
}

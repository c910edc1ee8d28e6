//! Outlet settings, loaded from `config.toml` in the platform config dir
//! (e.g. `~/.config/pettycash/config.toml` on Linux).

use anyhow::{Context, Result};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::calendar;
use crate::categorize::FlowClassifier;
use crate::error::LedgerError;
use crate::models::ReceiptRule;

pub const DEFAULT_TIME_ZONE: &str = "Asia/Jakarta";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutletConfig {
    pub outlet_name: String,
    /// IANA zone name deciding where the outlet's day starts and ends.
    pub time_zone: String,
    pub opening_balance: Decimal,
    pub budget_limit: Decimal,
    pub log_level: String,
    pub receipt_categories: Vec<ReceiptRule>,
}

impl Default for OutletConfig {
    fn default() -> Self {
        Self {
            outlet_name: "Outlet".into(),
            time_zone: DEFAULT_TIME_ZONE.into(),
            opening_balance: Decimal::ZERO,
            budget_limit: Decimal::ZERO,
            log_level: "warn".into(),
            receipt_categories: ReceiptRule::defaults(),
        }
    }
}

impl OutletConfig {
    /// Default location, or `None` when the platform has no home directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("id", "pettycash", "PettyCash")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.budget_limit < Decimal::ZERO {
            return Err(LedgerError::InvalidConfiguration(format!(
                "budget_limit must not be negative, got {}",
                self.budget_limit
            )));
        }
        self.zone()?;
        Ok(())
    }

    pub fn zone(&self) -> Result<Tz, LedgerError> {
        calendar::parse_time_zone(&self.time_zone)
    }

    /// Build the receipt classifier, logging rules whose regex is invalid.
    pub fn classifier(&self) -> FlowClassifier {
        let (classifier, bad_patterns) = FlowClassifier::new(&self.receipt_categories);
        for pattern in &bad_patterns {
            tracing::warn!("ignoring invalid receipt regex '{pattern}'");
        }
        classifier
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

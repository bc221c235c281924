//! Planner configuration, typically parsed from TOML.
//!
//! ```toml
//! [settings]
//! total_periods = 10
//! start_period = 1
//! strict_window = false
//!
//! [utilization]
//! high_pct = 86
//! over_pct = 100
//! ```
//!
//! Every key is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::{PlanSettings, DEFAULT_TOTAL_PERIODS};
use crate::scheduler::UtilizationThresholds;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub utilization: UtilizationThresholds,
}

/// Horizon overrides. Unset keys leave a plan's own settings untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsConfig {
    pub total_periods: Option<u32>,
    pub start_period: Option<u32>,
    pub strict_window: Option<bool>,
}

impl PlannerConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded planner config");
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.settings.total_periods == Some(0) {
            return Err(PlanError::InvalidConfig(
                "settings.total_periods must be at least 1".into(),
            ));
        }
        if self.utilization.high_pct > self.utilization.over_pct {
            return Err(PlanError::InvalidConfig(format!(
                "utilization.high_pct ({}) exceeds utilization.over_pct ({})",
                self.utilization.high_pct, self.utilization.over_pct
            )));
        }
        Ok(())
    }

    /// Overrides `settings` with every key set in this config.
    pub fn apply_to(&self, settings: &mut PlanSettings) {
        if let Some(total) = self.settings.total_periods {
            settings.total_periods = total;
        }
        if let Some(start) = self.settings.start_period {
            settings.start_period = start;
        }
        if let Some(strict) = self.settings.strict_window {
            settings.strict_window = strict;
        }
    }

    /// Settings for a fresh plan: defaults with this config applied.
    pub fn plan_settings(&self) -> PlanSettings {
        let mut settings = PlanSettings::with_periods(DEFAULT_TOTAL_PERIODS);
        self.apply_to(&mut settings);
        settings
    }
}

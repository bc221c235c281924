//! Capacity utilization report.
//!
//! Projects the final usage ledger onto one [`CapacityCell`] per team per
//! period. Pure: nothing is mutated.

use serde::{Deserialize, Serialize};

use crate::capacity::{CapacityPlan, UsageLedger};
use crate::models::{CapacityCell, CapacityStatus};

/// Utilization percentages at which a cell turns `high` and `over`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilizationThresholds {
    /// Cells at or above this percentage are `high`.
    #[serde(default = "default_high_pct")]
    pub high_pct: u32,
    /// Cells above this percentage are `over`.
    #[serde(default = "default_over_pct")]
    pub over_pct: u32,
}

fn default_high_pct() -> u32 {
    86
}

fn default_over_pct() -> u32 {
    100
}

impl Default for UtilizationThresholds {
    fn default() -> Self {
        Self {
            high_pct: default_high_pct(),
            over_pct: default_over_pct(),
        }
    }
}

impl UtilizationThresholds {
    /// Classifies a utilization percentage.
    pub fn classify(&self, utilization_pct: u32) -> CapacityStatus {
        if utilization_pct > self.over_pct {
            CapacityStatus::Over
        } else if utilization_pct >= self.high_pct {
            CapacityStatus::High
        } else {
            CapacityStatus::Healthy
        }
    }
}

/// `round(used / capacity * 100)`, or 0 when capacity is 0.
pub fn utilization_pct(used: f64, capacity: f64) -> u32 {
    if capacity <= 0.0 {
        return 0;
    }
    (used / capacity * 100.0).round().max(0.0) as u32
}

/// Builds cells for every team (input order) and period.
pub fn build_capacity_report(
    plan: &CapacityPlan,
    ledger: &UsageLedger,
    thresholds: &UtilizationThresholds,
) -> Vec<CapacityCell> {
    let settings = plan.settings();
    plan.teams()
        .iter()
        .flat_map(|team| {
            settings.periods().enumerate().map(move |(i, period)| {
                let used = ledger.used(&team.team_id, period);
                let capacity = team.available[i];
                let utilization_pct = utilization_pct(used, capacity);
                CapacityCell {
                    team_id: team.team_id.clone(),
                    period,
                    used,
                    capacity,
                    base_capacity: team.base[i],
                    external_load: team.load[i],
                    utilization_pct,
                    status: thresholds.classify(utilization_pct),
                }
            })
        })
        .collect()
}

//! Schedule (solution) models.
//!
//! Produced once per scheduling pass: one [`ScheduledInitiative`] per input
//! initiative and one [`CapacityCell`] per team per period.

use serde::{Deserialize, Serialize};

use super::Priority;

/// Effort placed into one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Period number.
    pub period: u32,
    /// Amount of effort placed.
    pub amount: f64,
}

impl Allocation {
    /// Creates an allocation.
    pub fn new(period: u32, amount: f64) -> Self {
        Self { period, amount }
    }
}

/// Terminal state of an initiative after one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitiativeStatus {
    /// Member of, or dependent on, a dependency cycle.
    CycleBlocked,
    /// Owning team does not exist.
    TeamInvalid,
    /// A dependency did not complete.
    DependencyBlocked,
    /// All effort allocated.
    Placed,
    /// Some (possibly zero) effort left unallocated.
    PartiallyPlaced,
}

impl InitiativeStatus {
    /// Whether allocation was never attempted.
    pub fn is_rejected(self) -> bool {
        matches!(
            self,
            InitiativeStatus::CycleBlocked
                | InitiativeStatus::TeamInvalid
                | InitiativeStatus::DependencyBlocked
        )
    }
}

/// Scheduling result for one initiative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledInitiative {
    /// Initiative ID.
    pub initiative_id: String,
    /// Initiative name (denormalized for display).
    pub initiative_name: String,
    /// Owning team ID.
    pub team_id: String,
    /// Initiative priority.
    pub priority: Priority,
    /// Allocations in increasing period order.
    pub allocations: Vec<Allocation>,
    /// First allocated period.
    pub start_period: Option<u32>,
    /// Last allocated period.
    pub end_period: Option<u32>,
    /// Effort that could not be placed.
    pub remaining_effort: f64,
    /// Terminal state.
    pub status: InitiativeStatus,
    /// Short explanation of the outcome.
    pub rationale: String,
}

impl ScheduledInitiative {
    /// Total effort placed across all allocations.
    pub fn allocated_effort(&self) -> f64 {
        self.allocations.iter().map(|a| a.amount).sum()
    }

    /// Whether the initiative was fully placed.
    pub fn is_placed(&self) -> bool {
        self.status == InitiativeStatus::Placed
    }

    /// Amount allocated in `period` (0 if none).
    pub fn amount_in(&self, period: u32) -> f64 {
        self.allocations
            .iter()
            .filter(|a| a.period == period)
            .map(|a| a.amount)
            .sum()
    }
}

/// Utilization classification of a capacity cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityStatus {
    /// Below the high-utilization threshold.
    Healthy,
    /// At or above the high threshold, not over.
    High,
    /// Above the over-utilization threshold.
    Over,
}

/// Capacity usage of one team in one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityCell {
    /// Team ID.
    pub team_id: String,
    /// Period number.
    pub period: u32,
    /// Effort allocated to initiatives.
    pub used: f64,
    /// Net available capacity (base minus external load, floored at 0).
    pub capacity: f64,
    /// Sum of engineer capacity.
    pub base_capacity: f64,
    /// Sum of external load.
    pub external_load: f64,
    /// `round(used / capacity * 100)`, 0 when capacity is 0.
    pub utilization_pct: u32,
    /// Classification of `utilization_pct`.
    pub status: CapacityStatus,
}

impl CapacityCell {
    /// Capacity still free in this cell.
    pub fn free(&self) -> f64 {
        (self.capacity - self.used).max(0.0)
    }
}

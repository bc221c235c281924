//! Roadmap quality metrics (KPIs).
//!
//! Computes summary indicators from a completed [`PlanOutput`].
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Roadmap end | Latest allocated period |
//! | Placed effort | Sum of all allocations |
//! | Unplaced effort | Sum of remaining effort |
//! | Window misses | Count of `WINDOW_MISSED` entries |
//! | Avg utilization | Mean utilization over cells with capacity |
//! | Peak utilization | Highest cell utilization |

use crate::models::{CapacityStatus, ChangelogLevel, InitiativeStatus, PlanOutput};

/// Roadmap performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanKpi {
    /// Initiatives fully placed.
    pub placed: usize,
    /// Initiatives left with remaining effort.
    pub partially_placed: usize,
    /// Initiatives excluded by cycles or unmet dependencies.
    pub blocked: usize,
    /// Initiatives referencing a missing team.
    pub invalid: usize,
    /// Sum of initiative effort.
    pub total_effort: f64,
    /// Effort allocated to periods.
    pub placed_effort: f64,
    /// Effort left unscheduled.
    pub unplaced_effort: f64,
    /// Number of window-missed entries.
    pub window_misses: usize,
    /// Latest period with any allocation.
    pub roadmap_end: Option<u32>,
    /// Mean utilization (%) over cells with capacity > 0.
    pub avg_utilization_pct: f64,
    /// Highest utilization (%) of any cell.
    pub peak_utilization_pct: u32,
    /// Cells classified `high` or `over`.
    pub hot_cells: usize,
}

impl PlanKpi {
    /// Computes KPIs from a scheduling output.
    pub fn calculate(output: &PlanOutput) -> Self {
        let mut kpi = Self {
            placed: 0,
            partially_placed: 0,
            blocked: 0,
            invalid: 0,
            total_effort: 0.0,
            placed_effort: 0.0,
            unplaced_effort: 0.0,
            window_misses: 0,
            roadmap_end: None,
            avg_utilization_pct: 0.0,
            peak_utilization_pct: 0,
            hot_cells: 0,
        };

        for item in &output.scheduled {
            match item.status {
                InitiativeStatus::Placed => kpi.placed += 1,
                InitiativeStatus::PartiallyPlaced => kpi.partially_placed += 1,
                InitiativeStatus::CycleBlocked | InitiativeStatus::DependencyBlocked => {
                    kpi.blocked += 1
                }
                InitiativeStatus::TeamInvalid => kpi.invalid += 1,
            }
            let allocated = item.allocated_effort();
            kpi.placed_effort += allocated;
            kpi.unplaced_effort += item.remaining_effort;
            kpi.total_effort += allocated + item.remaining_effort;
            kpi.roadmap_end = kpi.roadmap_end.max(item.end_period);
        }

        kpi.window_misses = output
            .changelog
            .iter()
            .filter(|e| e.level == ChangelogLevel::WindowMissed)
            .count();

        let mut sum = 0.0;
        let mut counted = 0usize;
        for cell in &output.capacity {
            kpi.peak_utilization_pct = kpi.peak_utilization_pct.max(cell.utilization_pct);
            if cell.status != CapacityStatus::Healthy {
                kpi.hot_cells += 1;
            }
            if cell.capacity > 0.0 {
                sum += cell.utilization_pct as f64;
                counted += 1;
            }
        }
        if counted > 0 {
            kpi.avg_utilization_pct = sum / counted as f64;
        }

        kpi
    }

    /// Whether the roadmap meets the given limits.
    pub fn meets_thresholds(&self, max_unplaced_effort: f64, max_peak_pct: u32) -> bool {
        self.unplaced_effort <= max_unplaced_effort && self.peak_utilization_pct <= max_peak_pct
    }
}

//! Roadmap scheduling and reporting.
//!
//! # Algorithm
//!
//! `RoadmapScheduler` is a single-pass, priority-driven, capacity-constrained
//! greedy allocator. It is not optimal (no rebalancing, no backtracking) but
//! it is deterministic and explains every decision in the changelog.
//!
//! # Reports
//!
//! `build_capacity_report` projects the usage ledger into per-team,
//! per-period utilization cells; `PlanKpi` summarises a finished output.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"

mod allocator;
mod kpi;
mod report;

pub use allocator::{entries_at, schedule, RoadmapScheduler, EFFORT_EPSILON};
pub use kpi::PlanKpi;
pub use report::{build_capacity_report, utilization_pct, UtilizationThresholds};

//! Roadmap domain models.
//!
//! Input entities (teams, engineers, external loads, initiatives), the
//! per-pass containers ([`PlanInput`], [`PlanOutput`]) and the computed
//! results (scheduled initiatives, capacity cells, changelog entries).
//!
//! # Domain Mappings
//!
//! | u-roadmap | Agile | Consulting | Operations |
//! |-----------|-------|------------|------------|
//! | Initiative | Epic | Engagement | Project |
//! | Team | Squad | Practice | Crew |
//! | Period | Sprint | Week | Shift block |
//! | External load | Support rotation | Bench time | Maintenance |

mod changelog;
mod initiative;
mod plan;
mod schedule;
mod team;

pub use changelog::{Changelog, ChangelogEntry, ChangelogLevel, IdGenerator, SeededIds, SequentialIds};
pub use initiative::{Initiative, Priority, TargetWindow};
pub use plan::{PlanInput, PlanOutput, PlanSettings, DEFAULT_TOTAL_PERIODS};
pub use schedule::{Allocation, CapacityCell, CapacityStatus, InitiativeStatus, ScheduledInitiative};
pub use team::{Engineer, ExternalLoad, Team};

//! Capacity-aware roadmap scheduling.
//!
//! Given initiatives with effort, priority, dependencies and optional target
//! windows, and teams whose capacity varies per period (sprint), produces a
//! deterministic allocation of effort across periods plus a changelog that
//! explains every placement, delay and rejection.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Team`, `Engineer`, `ExternalLoad`,
//!   `Initiative`, `PlanInput`, `PlanOutput`, `ScheduledInitiative`,
//!   `CapacityCell`, `ChangelogEntry`
//! - **`graph`**: Dependency cycle detection and processing order
//! - **`capacity`**: Per-team capacity aggregation and the usage ledger
//! - **`scheduler`**: The greedy effort allocator, utilization report, KPIs
//! - **`validation`**: Optional pre-flight checks for callers
//! - **`config`**: TOML planner configuration
//!
//! # Example
//!
//! ```
//! use u_roadmap::models::{Engineer, Initiative, PlanInput, PlanSettings, Team};
//!
//! let input = PlanInput::new(PlanSettings::with_periods(4))
//!     .with_team(Team::new("X"))
//!     .with_engineer(Engineer::uniform("e1", "X", 5.0, 4))
//!     .with_initiative(Initiative::new("A", "X", 5.0))
//!     .with_initiative(Initiative::new("B", "X", 5.0).with_dependency("A"));
//!
//! let output = u_roadmap::schedule(&input);
//! assert_eq!(output.initiative("B").unwrap().start_period, Some(2));
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22

pub mod capacity;
pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod sample;
pub mod scheduler;
pub mod validation;

pub use error::{PlanError, Result};
pub use scheduler::schedule;

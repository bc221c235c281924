//! Initiative (work item) model.
//!
//! An initiative is a unit of roadmap work owned by one team. Its effort is
//! expressed in the same unit as team capacity (story points, percentage of a
//! sprint, ...), and it may depend on other initiatives finishing first.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ranked priority. `P0` is the most important.
///
/// Ordering follows the rank: `P0 < P1 < P2 < P3`, so sorting ascending puts
/// the most important initiatives first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Priority {
    /// Critical, must ship.
    P0,
    /// High.
    P1,
    /// Normal.
    #[default]
    P2,
    /// Nice to have.
    P3,
}

impl Priority {
    /// Numeric rank (0 = highest priority).
    pub fn rank(self) -> u8 {
        match self {
            Priority::P0 => 0,
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::P3 => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.rank())
    }
}

/// Preferred period range for an initiative, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetWindow {
    /// First period of the window.
    pub start_period: u32,
    /// Last period of the window.
    pub end_period: u32,
}

impl TargetWindow {
    /// Creates a window covering `start..=end`.
    pub fn new(start_period: u32, end_period: u32) -> Self {
        Self {
            start_period,
            end_period,
        }
    }

    /// Whether `period` lies inside the window.
    #[inline]
    pub fn contains(&self, period: u32) -> bool {
        period >= self.start_period && period <= self.end_period
    }

    /// Whether the span `start..=end` lies entirely inside the window.
    pub fn covers(&self, start: u32, end: u32) -> bool {
        self.contains(start) && self.contains(end)
    }
}

impl fmt::Display for TargetWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}-S{}", self.start_period, self.end_period)
    }
}

/// A roadmap initiative to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    /// Unique initiative identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Total effort, in capacity units.
    pub effort: f64,
    /// Scheduling priority.
    #[serde(default)]
    pub priority: Priority,
    /// Initiatives that must complete before this one may start.
    #[serde(default)]
    pub dependency_ids: Vec<String>,
    /// Optional preferred period range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_window: Option<TargetWindow>,
    /// Owning team.
    pub team_id: String,
}

impl Initiative {
    /// Creates an initiative with the given ID, owning team and effort.
    pub fn new(id: impl Into<String>, team_id: impl Into<String>, effort: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            effort,
            priority: Priority::default(),
            dependency_ids: Vec::new(),
            target_window: None,
            team_id: team_id.into(),
        }
    }

    /// Sets the initiative name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Adds a dependency on another initiative.
    pub fn with_dependency(mut self, dependency_id: impl Into<String>) -> Self {
        self.dependency_ids.push(dependency_id.into());
        self
    }

    /// Sets the target window.
    pub fn with_target_window(mut self, start_period: u32, end_period: u32) -> Self {
        self.target_window = Some(TargetWindow::new(start_period, end_period));
        self
    }

    /// Whether this initiative has any dependencies.
    pub fn has_dependencies(&self) -> bool {
        !self.dependency_ids.is_empty()
    }
}

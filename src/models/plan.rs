//! Scheduling input and output containers.

use serde::{Deserialize, Serialize};

use super::{CapacityCell, ChangelogEntry, Engineer, ExternalLoad, Initiative, ScheduledInitiative, Team};
use crate::error::Result;

/// Default planning horizon, in periods.
pub const DEFAULT_TOTAL_PERIODS: u32 = 10;

/// Horizon and window-handling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSettings {
    /// Number of periods in the planning horizon.
    pub total_periods: u32,
    /// Number of the first period. Capacity vector index 0 maps to it.
    #[serde(default = "default_start_period")]
    pub start_period: u32,
    /// When set, allocation never continues past a target window's end.
    #[serde(default)]
    pub strict_window: bool,
}

fn default_start_period() -> u32 {
    1
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            total_periods: DEFAULT_TOTAL_PERIODS,
            start_period: default_start_period(),
            strict_window: false,
        }
    }
}

impl PlanSettings {
    /// Settings for a horizon of `total_periods` starting at period 1.
    pub fn with_periods(total_periods: u32) -> Self {
        Self {
            total_periods,
            ..Self::default()
        }
    }

    /// Enables or disables strict-window mode.
    pub fn strict(mut self, strict_window: bool) -> Self {
        self.strict_window = strict_window;
        self
    }

    /// Last period of the horizon, or `None` for an empty horizon.
    pub fn last_period(&self) -> Option<u32> {
        self.total_periods
            .checked_sub(1)
            .map(|n| self.start_period.saturating_add(n))
    }

    /// Period numbers of the horizon, in order.
    pub fn periods(&self) -> impl Iterator<Item = u32> {
        let start = self.start_period;
        (0..self.total_periods).map(move |i| start.saturating_add(i))
    }

    /// Vector index of `period`, if it lies inside the horizon.
    pub fn index_of(&self, period: u32) -> Option<usize> {
        let offset = period.checked_sub(self.start_period)?;
        (offset < self.total_periods).then_some(offset as usize)
    }
}

/// Everything the engine needs for one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    /// Teams.
    #[serde(default)]
    pub teams: Vec<Team>,
    /// Engineers with capacity vectors.
    #[serde(default)]
    pub engineers: Vec<Engineer>,
    /// Non-initiative loads.
    #[serde(default)]
    pub external_loads: Vec<ExternalLoad>,
    /// Initiatives to schedule.
    #[serde(default)]
    pub initiatives: Vec<Initiative>,
    /// Horizon settings.
    #[serde(default)]
    pub settings: PlanSettings,
}

impl PlanInput {
    /// Creates an empty plan with the given settings.
    pub fn new(settings: PlanSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Adds a team.
    pub fn with_team(mut self, team: Team) -> Self {
        self.teams.push(team);
        self
    }

    /// Adds an engineer.
    pub fn with_engineer(mut self, engineer: Engineer) -> Self {
        self.engineers.push(engineer);
        self
    }

    /// Adds an external load.
    pub fn with_external_load(mut self, load: ExternalLoad) -> Self {
        self.external_loads.push(load);
        self
    }

    /// Adds an initiative.
    pub fn with_initiative(mut self, initiative: Initiative) -> Self {
        self.initiatives.push(initiative);
        self
    }

    /// Parses a plan from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the plan as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Result of one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    /// One record per input initiative, in processing order.
    pub scheduled: Vec<ScheduledInitiative>,
    /// One cell per team per period.
    pub capacity: Vec<CapacityCell>,
    /// Ordered explanations.
    pub changelog: Vec<ChangelogEntry>,
}

impl PlanOutput {
    /// Finds the record for an initiative.
    pub fn initiative(&self, initiative_id: &str) -> Option<&ScheduledInitiative> {
        self.scheduled
            .iter()
            .find(|s| s.initiative_id == initiative_id)
    }

    /// Finds the capacity cell for a team and period.
    pub fn cell(&self, team_id: &str, period: u32) -> Option<&CapacityCell> {
        self.capacity
            .iter()
            .find(|c| c.team_id == team_id && c.period == period)
    }

    /// Changelog entries concerning one initiative.
    pub fn entries_for(&self, initiative_id: &str) -> Vec<&ChangelogEntry> {
        self.changelog
            .iter()
            .filter(|e| e.initiative_id.as_deref() == Some(initiative_id))
            .collect()
    }

    /// Serializes the output as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_periods() {
        let s = PlanSettings::with_periods(3);
        assert_eq!(s.periods().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(s.last_period(), Some(3));
        assert_eq!(s.index_of(1), Some(0));
        assert_eq!(s.index_of(3), Some(2));
        assert_eq!(s.index_of(4), None);
        assert_eq!(s.index_of(0), None);
    }

    #[test]
    fn test_settings_offset() {
        let s = PlanSettings {
            total_periods: 2,
            start_period: 5,
            strict_window: false,
        };
        assert_eq!(s.periods().collect::<Vec<_>>(), vec![5, 6]);
        assert_eq!(s.index_of(6), Some(1));
        assert_eq!(s.index_of(4), None);
    }

    #[test]
    fn test_empty_horizon() {
        let s = PlanSettings::with_periods(0);
        assert_eq!(s.last_period(), None);
        assert_eq!(s.periods().count(), 0);
    }

    #[test]
    fn test_settings_json_defaults() {
        let s: PlanSettings = serde_json::from_str(r#"{ "totalPeriods": 4 }"#).unwrap();
        assert_eq!(s.start_period, 1);
        assert!(!s.strict_window);
    }

    #[test]
    fn test_plan_json_round_trip() {
        let plan = PlanInput::new(PlanSettings::with_periods(2))
            .with_team(Team::new("T"))
            .with_initiative(Initiative::new("A", "T", 3.0));
        let json = plan.to_json_pretty().unwrap();
        assert!(json.contains("\"totalPeriods\": 2"));
        assert_eq!(PlanInput::from_json_str(&json).unwrap(), plan);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(PlanInput::from_json_str("{ not json").is_err());
    }
}

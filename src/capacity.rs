//! Capacity aggregation and the per-pass usage ledger.
//!
//! [`CapacityPlan`] reduces engineer capacity vectors and external-load
//! vectors into per-team base, load and available vectors. [`UsageLedger`]
//! records how much of each team/period cell earlier initiatives consumed.
//!
//! Available capacity per period is `max(0, base - load)`.

use std::collections::HashMap;

use crate::models::{Engineer, ExternalLoad, PlanSettings, Team};

/// Aggregated capacity of one team over the horizon.
///
/// All vectors have length `total_periods`; index 0 is the first period.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamCapacity {
    /// Team ID.
    pub team_id: String,
    /// Sum of engineer capacity per period.
    pub base: Vec<f64>,
    /// Sum of external load per period.
    pub load: Vec<f64>,
    /// Net capacity per period.
    pub available: Vec<f64>,
}

impl TeamCapacity {
    fn empty(team_id: &str, periods: usize) -> Self {
        Self {
            team_id: team_id.to_string(),
            base: vec![0.0; periods],
            load: vec![0.0; periods],
            available: vec![0.0; periods],
        }
    }

    /// Total available capacity over the horizon.
    pub fn total_available(&self) -> f64 {
        self.available.iter().sum()
    }
}

/// Per-team capacity for one pass, in team input order.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityPlan {
    settings: PlanSettings,
    teams: Vec<TeamCapacity>,
    index: HashMap<String, usize>,
}

impl CapacityPlan {
    /// Aggregates capacity for `teams`.
    ///
    /// Engineers count toward the team named by [`Engineer::team_id`].
    /// Vector entries beyond the horizon are ignored; missing entries count
    /// as 0. Rows referencing unknown teams are skipped.
    pub fn aggregate(
        teams: &[Team],
        engineers: &[Engineer],
        loads: &[ExternalLoad],
        settings: &PlanSettings,
    ) -> Self {
        let periods = settings.total_periods as usize;
        let mut plan = Self {
            settings: *settings,
            teams: Vec::with_capacity(teams.len()),
            index: HashMap::with_capacity(teams.len()),
        };

        for team in teams {
            if plan.index.contains_key(&team.id) {
                continue;
            }
            plan.index.insert(team.id.clone(), plan.teams.len());
            plan.teams.push(TeamCapacity::empty(&team.id, periods));
        }

        for engineer in engineers {
            match plan.index.get(&engineer.team_id) {
                Some(&t) => accumulate(&mut plan.teams[t].base, &engineer.period_capacity),
                None => tracing::debug!(
                    engineer_id = %engineer.id,
                    team_id = %engineer.team_id,
                    "Engineer references unknown team, skipping"
                ),
            }
        }

        for load in loads {
            match plan.index.get(&load.team_id) {
                Some(&t) => accumulate(&mut plan.teams[t].load, &load.period_load),
                None => tracing::debug!(
                    load_id = %load.id,
                    team_id = %load.team_id,
                    "External load references unknown team, skipping"
                ),
            }
        }

        for team in &mut plan.teams {
            for i in 0..periods {
                team.available[i] = (team.base[i] - team.load[i]).max(0.0);
            }
        }

        plan
    }

    /// Horizon the plan was aggregated for.
    pub fn settings(&self) -> &PlanSettings {
        &self.settings
    }

    /// Teams in input order.
    pub fn teams(&self) -> &[TeamCapacity] {
        &self.teams
    }

    /// Capacity of one team.
    pub fn team(&self, team_id: &str) -> Option<&TeamCapacity> {
        self.index.get(team_id).map(|&t| &self.teams[t])
    }

    /// Whether the team exists.
    pub fn has_team(&self, team_id: &str) -> bool {
        self.index.contains_key(team_id)
    }

    /// Net available capacity for a team in a period (0 outside the horizon
    /// or for unknown teams).
    pub fn available(&self, team_id: &str, period: u32) -> f64 {
        self.value(team_id, period, |t| &t.available)
    }

    /// Base capacity for a team in a period.
    pub fn base(&self, team_id: &str, period: u32) -> f64 {
        self.value(team_id, period, |t| &t.base)
    }

    /// External load for a team in a period.
    pub fn load(&self, team_id: &str, period: u32) -> f64 {
        self.value(team_id, period, |t| &t.load)
    }

    fn value(&self, team_id: &str, period: u32, pick: impl Fn(&TeamCapacity) -> &Vec<f64>) -> f64 {
        match (self.team(team_id), self.settings.index_of(period)) {
            (Some(team), Some(i)) => pick(team)[i],
            _ => 0.0,
        }
    }
}

fn accumulate(target: &mut [f64], values: &[f64]) {
    for (slot, value) in target.iter_mut().zip(values) {
        *slot += value;
    }
}

/// Effort consumed per team and period during one pass.
///
/// Owned by a single allocation pass and discarded with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageLedger {
    used: HashMap<(String, u32), f64>,
}

impl UsageLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Effort already consumed in a cell (0 if untouched).
    pub fn used(&self, team_id: &str, period: u32) -> f64 {
        self.used
            .get(&(team_id.to_string(), period))
            .copied()
            .unwrap_or(0.0)
    }

    /// Records `amount` of consumption in a cell.
    pub fn consume(&mut self, team_id: &str, period: u32, amount: f64) {
        *self
            .used
            .entry((team_id.to_string(), period))
            .or_insert(0.0) += amount;
    }

    /// Free capacity in a cell given the plan's available capacity.
    pub fn free(&self, plan: &CapacityPlan, team_id: &str, period: u32) -> f64 {
        plan.available(team_id, period) - self.used(team_id, period)
    }

    /// Total consumption across all cells.
    pub fn total(&self) -> f64 {
        self.used.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams() -> Vec<Team> {
        vec![Team::new("FE"), Team::new("BE"), Team::new("EMPTY")]
    }

    fn plan() -> CapacityPlan {
        let engineers = vec![
            Engineer::new("alice", "FE", vec![8.0, 8.0, 7.0]),
            Engineer::new("bob", "FE", vec![6.0, 5.0, 6.0]),
            Engineer::new("dan", "BE", vec![10.0, 10.0, 10.0]),
        ];
        let loads = vec![
            ExternalLoad::new("support", "FE", vec![2.0, 2.0, 2.0]),
            ExternalLoad::new("incidents", "BE", vec![1.0, 12.0, 1.0]),
        ];
        CapacityPlan::aggregate(&teams(), &engineers, &loads, &PlanSettings::with_periods(3))
    }

    #[test]
    fn test_base_load_available() {
        let p = plan();
        let fe = p.team("FE").unwrap();
        assert_eq!(fe.base, vec![14.0, 13.0, 13.0]);
        assert_eq!(fe.load, vec![2.0, 2.0, 2.0]);
        assert_eq!(fe.available, vec![12.0, 11.0, 11.0]);
        assert!((fe.total_available() - 34.0).abs() < 1e-10);
    }

    #[test]
    fn test_available_floored_at_zero() {
        let p = plan();
        // BE period 2: 10 - 12 → 0
        assert!((p.available("BE", 2) - 0.0).abs() < 1e-10);
        assert!((p.base("BE", 2) - 10.0).abs() < 1e-10);
        assert!((p.load("BE", 2) - 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_team_without_engineers() {
        let p = plan();
        let empty = p.team("EMPTY").unwrap();
        assert_eq!(empty.base, vec![0.0; 3]);
        assert_eq!(empty.available, vec![0.0; 3]);
    }

    #[test]
    fn test_outside_horizon_and_unknown_team() {
        let p = plan();
        assert!((p.available("FE", 0) - 0.0).abs() < 1e-10);
        assert!((p.available("FE", 4) - 0.0).abs() < 1e-10);
        assert!((p.available("nope", 1) - 0.0).abs() < 1e-10);
        assert!(!p.has_team("nope"));
        assert!(p.has_team("BE"));
    }

    #[test]
    fn test_short_and_long_vectors() {
        let engineers = vec![
            Engineer::new("short", "T", vec![5.0]),
            Engineer::new("long", "T", vec![1.0, 1.0, 1.0, 1.0, 1.0]),
        ];
        let p = CapacityPlan::aggregate(
            &[Team::new("T")],
            &engineers,
            &[],
            &PlanSettings::with_periods(3),
        );
        assert_eq!(p.team("T").unwrap().base, vec![6.0, 1.0, 1.0]);
    }

    #[test]
    fn test_unknown_team_rows_skipped() {
        let engineers = vec![Engineer::new("ghost", "missing", vec![5.0])];
        let loads = vec![ExternalLoad::new("l", "missing", vec![5.0])];
        let p = CapacityPlan::aggregate(
            &[Team::new("T")],
            &engineers,
            &loads,
            &PlanSettings::with_periods(1),
        );
        assert_eq!(p.teams().len(), 1);
        assert!((p.base("T", 1) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_start_offset() {
        let settings = PlanSettings {
            total_periods: 2,
            start_period: 4,
            strict_window: false,
        };
        let p = CapacityPlan::aggregate(
            &[Team::new("T")],
            &[Engineer::new("e", "T", vec![3.0, 7.0])],
            &[],
            &settings,
        );
        assert!((p.available("T", 4) - 3.0).abs() < 1e-10);
        assert!((p.available("T", 5) - 7.0).abs() < 1e-10);
        assert!((p.available("T", 1) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_ledger() {
        let p = plan();
        let mut ledger = UsageLedger::new();
        assert!((ledger.used("FE", 1) - 0.0).abs() < 1e-10);
        ledger.consume("FE", 1, 5.0);
        ledger.consume("FE", 1, 3.0);
        assert!((ledger.used("FE", 1) - 8.0).abs() < 1e-10);
        assert!((ledger.free(&p, "FE", 1) - 4.0).abs() < 1e-10);
        assert!((ledger.total() - 8.0).abs() < 1e-10);
    }
}

//! Team, engineer and external-load models.
//!
//! Teams own no capacity of their own. A team's per-period capacity is the
//! sum of its engineers' capacity vectors minus the external load recorded
//! against it (support rotations, incidents, ...).

use serde::{Deserialize, Serialize};

/// A delivery team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Unique team identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Engineers listed on the team (informational; capacity is keyed by
    /// [`Engineer::team_id`]).
    #[serde(default)]
    pub engineer_ids: Vec<String>,
}

/// An engineer with a per-period capacity vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engineer {
    /// Unique engineer identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display initials.
    #[serde(default)]
    pub initials: String,
    /// Owning team.
    pub team_id: String,
    /// Capacity per period; index 0 is the first period of the horizon.
    #[serde(default)]
    pub period_capacity: Vec<f64>,
}

/// Non-initiative work consuming a team's capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalLoad {
    /// Unique load identifier.
    pub id: String,
    /// Team whose capacity this load consumes.
    pub team_id: String,
    /// Human-readable name (e.g. "Support").
    #[serde(default)]
    pub name: String,
    /// Consumption per period; index 0 is the first period of the horizon.
    #[serde(default)]
    pub period_load: Vec<f64>,
}

impl Team {
    /// Creates a team with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            engineer_ids: Vec::new(),
        }
    }

    /// Sets the team name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Lists an engineer on the team.
    pub fn with_engineer(mut self, engineer_id: impl Into<String>) -> Self {
        self.engineer_ids.push(engineer_id.into());
        self
    }
}

impl Engineer {
    /// Creates an engineer on `team_id` with a capacity vector.
    pub fn new(id: impl Into<String>, team_id: impl Into<String>, capacity: Vec<f64>) -> Self {
        let id = id.into();
        let initials = id.chars().next().map(String::from).unwrap_or_default();
        Self {
            name: id.clone(),
            id,
            initials,
            team_id: team_id.into(),
            period_capacity: capacity,
        }
    }

    /// Convenience constructor for a flat capacity over `periods` periods.
    pub fn uniform(
        id: impl Into<String>,
        team_id: impl Into<String>,
        per_period: f64,
        periods: usize,
    ) -> Self {
        Self::new(id, team_id, vec![per_period; periods])
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the display initials.
    pub fn with_initials(mut self, initials: impl Into<String>) -> Self {
        self.initials = initials.into();
        self
    }
}

impl ExternalLoad {
    /// Creates an external load on `team_id`.
    pub fn new(id: impl Into<String>, team_id: impl Into<String>, load: Vec<f64>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            team_id: team_id.into(),
            period_load: load,
        }
    }

    /// Sets the load name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

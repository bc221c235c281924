//! Input validation for roadmap plans.
//!
//! The scheduler never validates its input: anomalies it can explain end up
//! in the changelog, and malformed values (negative effort, short vectors)
//! are taken as given. Callers that want to reject bad plans up front run
//! [`validate_plan`] first. Detects:
//! - Duplicate IDs
//! - Unknown team and dependency references
//! - Capacity/load vectors whose length differs from the horizon
//! - Negative effort, capacity or load
//! - Inverted or out-of-horizon target windows
//!
//! Dependency cycles are not validation errors; the scheduler reports them.

use std::collections::HashSet;

use crate::models::PlanInput;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// An entity references a team that doesn't exist.
    InvalidTeamReference,
    /// An initiative depends on an initiative that doesn't exist.
    InvalidDependency,
    /// A per-period vector does not match the horizon length.
    VectorLengthMismatch,
    /// Effort, capacity or load is negative.
    NegativeValue,
    /// Target window is inverted or outside the horizon.
    InvalidWindow,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn check_unique<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {kind} ID: {id}"),
            ));
        }
    }
    seen
}

fn check_vector(
    owner: &str,
    values: &[f64],
    periods: usize,
    errors: &mut Vec<ValidationError>,
) {
    if values.len() != periods {
        errors.push(ValidationError::new(
            ValidationErrorKind::VectorLengthMismatch,
            format!(
                "{owner} has {} period values, expected {periods}",
                values.len()
            ),
        ));
    }
    if values.iter().any(|v| *v < 0.0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!("{owner} has negative period values"),
        ));
    }
}

/// Validates a plan.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_plan(plan: &PlanInput) -> ValidationResult {
    let mut errors = Vec::new();
    let settings = &plan.settings;
    let periods = settings.total_periods as usize;

    let team_ids = check_unique("team", plan.teams.iter().map(|t| t.id.as_str()), &mut errors);
    check_unique(
        "engineer",
        plan.engineers.iter().map(|e| e.id.as_str()),
        &mut errors,
    );
    check_unique(
        "external load",
        plan.external_loads.iter().map(|l| l.id.as_str()),
        &mut errors,
    );
    let initiative_ids = check_unique(
        "initiative",
        plan.initiatives.iter().map(|i| i.id.as_str()),
        &mut errors,
    );

    for engineer in &plan.engineers {
        if !team_ids.contains(engineer.team_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTeamReference,
                format!(
                    "Engineer '{}' references unknown team '{}'",
                    engineer.id, engineer.team_id
                ),
            ));
        }
        check_vector(
            &format!("Engineer '{}'", engineer.id),
            &engineer.period_capacity,
            periods,
            &mut errors,
        );
    }

    for load in &plan.external_loads {
        if !team_ids.contains(load.team_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTeamReference,
                format!(
                    "External load '{}' references unknown team '{}'",
                    load.id, load.team_id
                ),
            ));
        }
        check_vector(
            &format!("External load '{}'", load.id),
            &load.period_load,
            periods,
            &mut errors,
        );
    }

    for initiative in &plan.initiatives {
        if !team_ids.contains(initiative.team_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTeamReference,
                format!(
                    "Initiative '{}' references unknown team '{}'",
                    initiative.id, initiative.team_id
                ),
            ));
        }
        if initiative.effort < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeValue,
                format!("Initiative '{}' has negative effort", initiative.id),
            ));
        }
        for dep in &initiative.dependency_ids {
            if !initiative_ids.contains(dep.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!(
                        "Initiative '{}' depends on unknown initiative '{}'",
                        initiative.id, dep
                    ),
                ));
            }
        }
        if let Some(w) = initiative.target_window {
            let outside = match settings.last_period() {
                Some(last) => w.start_period < settings.start_period || w.end_period > last,
                None => true,
            };
            if w.start_period > w.end_period {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidWindow,
                    format!(
                        "Initiative '{}' window starts after it ends ({w})",
                        initiative.id
                    ),
                ));
            } else if outside {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidWindow,
                    format!(
                        "Initiative '{}' window {w} lies outside the planning horizon",
                        initiative.id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

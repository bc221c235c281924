//! Invariants of the allocator over randomly generated plans.

use std::collections::HashMap;

use proptest::prelude::*;
use u_roadmap::models::{
    Engineer, ExternalLoad, Initiative, InitiativeStatus, PlanInput, PlanSettings, Priority, Team,
};
use u_roadmap::schedule;

const TOLERANCE: f64 = 1e-6;

type InitiativeSeed = (usize, u32, u8, Vec<usize>, Option<(u32, u32)>);

fn priority(rank: u8) -> Priority {
    match rank {
        0 => Priority::P0,
        1 => Priority::P1,
        2 => Priority::P2,
        _ => Priority::P3,
    }
}

fn build_plan(
    teams: usize,
    periods: u32,
    strict: bool,
    engineers: Vec<(usize, Vec<u32>)>,
    loads: Vec<(usize, Vec<u32>)>,
    initiatives: Vec<InitiativeSeed>,
) -> PlanInput {
    let team_id = |t: usize| {
        if t < teams {
            format!("t{t}")
        } else {
            "ghost".to_string()
        }
    };
    let mut plan = PlanInput::new(PlanSettings::with_periods(periods).strict(strict));
    for t in 0..teams {
        plan = plan.with_team(Team::new(team_id(t)));
    }
    for (n, (t, capacity)) in engineers.into_iter().enumerate() {
        let capacity = capacity.into_iter().map(f64::from).collect();
        plan = plan.with_engineer(Engineer::new(format!("e{n}"), team_id(t), capacity));
    }
    for (n, (t, load)) in loads.into_iter().enumerate() {
        let load = load.into_iter().map(f64::from).collect();
        plan = plan.with_external_load(ExternalLoad::new(format!("l{n}"), team_id(t), load));
    }
    for (n, (t, effort, rank, deps, window)) in initiatives.into_iter().enumerate() {
        let mut initiative = Initiative::new(format!("i{n}"), team_id(t), f64::from(effort))
            .with_priority(priority(rank));
        for d in deps {
            initiative = initiative.with_dependency(format!("i{d}"));
        }
        if let Some((start, len)) = window {
            initiative = initiative.with_target_window(start, start + len);
        }
        plan = plan.with_initiative(initiative);
    }
    plan
}

/// Plans with up to three teams, one of which may be referenced but missing,
/// dependencies that may be unknown or cyclic, and optional windows.
fn plan_strategy() -> impl Strategy<Value = PlanInput> {
    (1usize..=3, 1u32..=6, any::<bool>())
        .prop_flat_map(|(teams, periods, strict)| {
            let width = periods as usize;
            let engineers = prop::collection::vec(
                (0..teams, prop::collection::vec(0u32..10, width)),
                0..5,
            );
            let loads = prop::collection::vec(
                (0..teams, prop::collection::vec(0u32..6, width)),
                0..3,
            );
            let initiatives = prop::collection::vec(
                (
                    0..=teams,
                    1u32..30,
                    0u8..4,
                    prop::collection::vec(0usize..8, 0..3),
                    prop::option::of((1u32..=periods, 0u32..3)),
                ),
                0..8,
            );
            (
                Just(teams),
                Just(periods),
                Just(strict),
                engineers,
                loads,
                initiatives,
            )
        })
        .prop_map(|(teams, periods, strict, engineers, loads, initiatives)| {
            build_plan(teams, periods, strict, engineers, loads, initiatives)
        })
}

proptest! {
    #[test]
    fn prop_never_overcommits(plan in plan_strategy()) {
        let out = schedule(&plan);

        let mut used: HashMap<(&str, u32), f64> = HashMap::new();
        for item in &out.scheduled {
            for a in &item.allocations {
                *used.entry((item.team_id.as_str(), a.period)).or_default() += a.amount;
            }
        }
        for cell in &out.capacity {
            prop_assert!(cell.used <= cell.capacity + TOLERANCE);
            let summed = used.get(&(cell.team_id.as_str(), cell.period)).copied().unwrap_or(0.0);
            prop_assert!((summed - cell.used).abs() < TOLERANCE);
        }
    }

    #[test]
    fn prop_allocation_matches_status(plan in plan_strategy()) {
        let out = schedule(&plan);

        for item in &out.scheduled {
            let effort = plan
                .initiatives
                .iter()
                .find(|i| i.id == item.initiative_id)
                .map(|i| i.effort)
                .unwrap_or_default();
            let allocated = item.allocated_effort();
            prop_assert!(allocated <= effort + TOLERANCE);
            if item.status == InitiativeStatus::Placed {
                prop_assert!((allocated - effort).abs() < TOLERANCE);
                prop_assert_eq!(item.remaining_effort, 0.0);
            } else {
                prop_assert!(allocated < effort - TOLERANCE);
                prop_assert!(item.remaining_effort > 0.0);
            }
            if item.status.is_rejected() {
                prop_assert!(item.allocations.is_empty());
            }
        }
    }

    #[test]
    fn prop_each_initiative_once(plan in plan_strategy()) {
        let out = schedule(&plan);

        let mut expected: Vec<&str> = plan.initiatives.iter().map(|i| i.id.as_str()).collect();
        let mut actual: Vec<&str> = out.scheduled.iter().map(|s| s.initiative_id.as_str()).collect();
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn prop_dependents_start_after_dependencies(plan in plan_strategy()) {
        let out = schedule(&plan);

        for initiative in &plan.initiatives {
            let Some(item) = out.initiative(&initiative.id) else { continue };
            let Some(start) = item.start_period else { continue };
            for dep in &initiative.dependency_ids {
                let dep_item = out.initiative(dep);
                prop_assert!(dep_item.is_some_and(|d| d.status == InitiativeStatus::Placed));
                if let Some(end) = dep_item.and_then(|d| d.end_period) {
                    prop_assert!(start > end);
                }
            }
        }
    }

    #[test]
    fn prop_strict_windows_are_respected(plan in plan_strategy()) {
        let out = schedule(&plan);

        for initiative in &plan.initiatives {
            let (Some(w), Some(item)) = (initiative.target_window, out.initiative(&initiative.id)) else {
                continue;
            };
            for a in &item.allocations {
                prop_assert!(a.period >= w.start_period);
                if plan.settings.strict_window {
                    prop_assert!(a.period <= w.end_period);
                }
            }
        }
    }

    #[test]
    fn prop_deterministic(plan in plan_strategy()) {
        prop_assert_eq!(schedule(&plan), schedule(&plan));
    }
}

//! Role assignment engine for event heats.
//!
//! Staffs the two volunteer roles on every lane of every heat in scope:
//! - **Strict pass** (`core`): per-lane continuity runs with fatigue
//!   cooldowns, lunch protection, and look-ahead candidate scoring
//! - **Backfill pass** (`backfill`): relaxed coverage for whatever the
//!   strict pass could not fill
//!
//! # Pipeline
//!
//! 1. Purge judge/builder cells within scope
//! 2. Classify pools ([`pools::RolePools`]) and index availability
//! 3. Strict pass for builders, then judges, over the same scope
//! 4. Backfill builders, then judges
//!
//! The engine never fails: malformed heats are skipped, uncoverable cells
//! stay empty. Both roles share only the busy set (no volunteer holds two
//! cells at one instant); counters, lunch ledgers, and run/cooldown state
//! are per role.

pub mod availability;
pub mod backfill;
pub mod core;
pub mod pools;
pub mod scope;
pub mod state;
pub mod timeslot;

use std::collections::{HashMap, HashSet};

use crate::config::ScheduleRules;
use crate::model::{Heat, Role, Volunteer};

use self::availability::AvailabilityIndex;
use self::pools::RolePools;
use self::state::{BusySet, RoleState};
use self::timeslot::SlotKey;

/// Raw availability store shape: email -> slot key -> status.
pub type RawAvailability = HashMap<String, HashMap<String, String>>;

/// Coverage achieved by one engine invocation, over the cells in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    pub total_cells: usize,
    pub filled_cells: usize,
}

impl FillReport {
    pub fn gaps(&self) -> usize {
        self.total_cells - self.filled_cells
    }
}

/// Purge and recompute every judge/builder assignment across the whole
/// heat list. Team, day, time, and label fields are never altered.
pub fn assign_all(
    heats: &mut [Heat],
    roster: &[Volunteer],
    availability: &RawAvailability,
    rules: &ScheduleRules,
) -> FillReport {
    for heat in heats.iter_mut() {
        for lane in &mut heat.lanes {
            lane.purge_roles();
        }
    }
    let scope = scope::build_scope(heats);
    run_pipeline(heats, &scope, roster, availability, rules)
}

/// Purge and recompute assignments for a single (day, start) instant only.
/// A blank day or start yields an empty scope and changes nothing.
pub fn assign_one(
    heats: &mut [Heat],
    day: &str,
    start: &str,
    roster: &[Volunteer],
    availability: &RawAvailability,
    rules: &ScheduleRules,
) -> FillReport {
    let scope = scope::single_scope(day, start);
    let Some(target) = scope.first() else {
        return FillReport {
            total_cells: 0,
            filled_cells: 0,
        };
    };
    for heat in heats.iter_mut() {
        if &SlotKey::new(&heat.day, &heat.start) == target {
            for lane in &mut heat.lanes {
                lane.purge_roles();
            }
        }
    }
    run_pipeline(heats, &scope, roster, availability, rules)
}

fn run_pipeline(
    heats: &mut [Heat],
    scope: &[SlotKey],
    roster: &[Volunteer],
    availability: &RawAvailability,
    rules: &ScheduleRules,
) -> FillReport {
    let pools = RolePools::build(roster);
    let avail = AvailabilityIndex::build(availability);
    let global = pools.global();

    tracing::info!(
        instants = scope.len(),
        actives = pools.active_count(),
        builders = pools.for_role(Role::Builder).len(),
        judges = pools.for_role(Role::Judge).len(),
        "starting role assignment"
    );

    let mut busy = BusySet::default();
    let mut states: HashMap<Role, RoleState> = HashMap::new();

    // Builders first, then judges, under the same strict rules.
    for role in Role::ALL {
        let state = states.entry(role).or_default();
        self::core::assign_role_over_scope(
            heats,
            scope,
            pools.for_role(role),
            role,
            rules,
            &avail,
            state,
            &mut busy,
        );
    }
    for role in Role::ALL {
        let state = states.entry(role).or_default();
        backfill::backfill_role(
            heats,
            pools.for_role(role),
            &global,
            role,
            &avail,
            state,
            &mut busy,
        );
    }

    let report = coverage(heats, scope);
    tracing::info!(
        total = report.total_cells,
        filled = report.filled_cells,
        gaps = report.gaps(),
        "role assignment finished"
    );
    report
}

fn coverage(heats: &[Heat], scope: &[SlotKey]) -> FillReport {
    let in_scope: HashSet<&SlotKey> = scope.iter().collect();
    let mut report = FillReport {
        total_cells: 0,
        filled_cells: 0,
    };
    for heat in heats {
        let key = SlotKey::new(&heat.day, &heat.start);
        if !in_scope.contains(&key) {
            continue;
        }
        for lane in &heat.lanes {
            for role in Role::ALL {
                report.total_cells += 1;
                if !lane.is_empty_for(role) {
                    report.filled_cells += 1;
                }
            }
        }
    }
    report
}

//! Relaxed coverage pass.
//!
//! Continuity, cooldown, and lunch protection are desirable; coverage is
//! mandatory. This pass fills whatever the strict pass left empty, checking
//! only availability and the shared busy set (no double-booking at one
//! instant). Cells that still cannot be filled stay empty: an event without
//! enough volunteers shows explicit gaps rather than failing.

use std::collections::BTreeMap;

use crate::engine::availability::AvailabilityIndex;
use crate::engine::state::{BusySet, RoleState};
use crate::engine::timeslot::SlotKey;
use crate::model::{Heat, Role};

/// Fill remaining empty cells for `role`, trying the role's primary pool
/// first and the global active pool second.
pub fn backfill_role(
    heats: &mut [Heat],
    primary: &[String],
    global: &[String],
    role: Role,
    avail: &AvailabilityIndex,
    state: &mut RoleState,
    busy: &mut BusySet,
) {
    let missing = list_missing(heats, role);
    if missing.is_empty() {
        return;
    }

    for (at, cells) in missing {
        // Re-rank per instant: earlier fills shift the load balance.
        let primary = ranked_by_load(primary, state);
        let global = ranked_by_load(global, state);

        for (hi, lane) in cells {
            if !heats[hi].lanes[lane].is_empty_for(role) {
                continue;
            }

            let pick = first_free(&primary, &at, avail, busy)
                .or_else(|| first_free(&global, &at, avail, busy));

            match pick {
                Some(volunteer) => {
                    heats[hi].lanes[lane].assign(role, volunteer.clone());
                    state.bump(&volunteer);
                    // Block this instant for the other role's backfill too.
                    busy.mark(&volunteer, &at);
                    tracing::debug!(slot = %at, lane, role = %role, volunteer = %volunteer, "backfilled");
                }
                None => {
                    tracing::warn!(slot = %at, lane, role = %role, "uncoverable cell left empty");
                }
            }
        }
    }
}

/// Every empty cell for the role, grouped by exact instant in (day, start)
/// order. Heats with a blank day or start are skipped.
fn list_missing(heats: &[Heat], role: Role) -> BTreeMap<SlotKey, Vec<(usize, usize)>> {
    let mut missing: BTreeMap<SlotKey, Vec<(usize, usize)>> = BTreeMap::new();
    for (hi, heat) in heats.iter().enumerate() {
        let key = SlotKey::new(&heat.day, &heat.start);
        if key.is_blank() {
            continue;
        }
        for (lane, cell) in heat.lanes.iter().enumerate() {
            if cell.is_empty_for(role) {
                missing.entry(key.clone()).or_default().push((hi, lane));
            }
        }
    }
    missing
}

/// Ascending assignment count, email as the final tie-break.
fn ranked_by_load(pool: &[String], state: &RoleState) -> Vec<String> {
    let mut ranked = pool.to_vec();
    ranked.sort_by(|a, b| (state.count(a), a.as_str()).cmp(&(state.count(b), b.as_str())));
    ranked
}

fn first_free(
    pool: &[String],
    at: &SlotKey,
    avail: &AvailabilityIndex,
    busy: &BusySet,
) -> Option<String> {
    pool.iter()
        .find(|v| avail.is_available(v, at) && !busy.is_busy(v, at))
        .cloned()
}

//! Run-based strict assignment pass.
//!
//! Walks the scope chronologically and, per lane needing the role, either
//! extends the lane track's active run or starts a new one. New runs are
//! chosen by simulating each candidate forward along the same lane track
//! and preferring whoever can sustain the longest run, so volunteers work
//! consecutive heats instead of scattered one-offs. Cells with no eligible
//! candidate are left empty for the backfill pass.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::config::ScheduleRules;
use crate::engine::availability::AvailabilityIndex;
use crate::engine::scope::{index_heats, Timeline};
use crate::engine::state::{BusySet, LaneTrack, LunchLedger, RoleState, RunBoard};
use crate::engine::timeslot::SlotKey;
use crate::model::{Heat, Role};

/// Fill every empty (heat, lane) cell for `role` across `scope`, mutating
/// heats in place. Counters, the lunch ledger, and the busy set accumulate
/// in the caller's state; run/cooldown bookkeeping is scoped to this pass.
pub fn assign_role_over_scope(
    heats: &mut [Heat],
    scope: &[SlotKey],
    pool: &[String],
    role: Role,
    rules: &ScheduleRules,
    avail: &AvailabilityIndex,
    state: &mut RoleState,
    busy: &mut BusySet,
) {
    let heat_index = index_heats(heats);
    let timeline = Timeline::build(scope);
    let mut board = RunBoard::default();

    // Least-loaded first, identity as tie-break.
    let mut pool: Vec<String> = pool.to_vec();
    pool.sort_by(|a, b| (state.count(a), a.as_str()).cmp(&(state.count(b), b.as_str())));

    for at in scope {
        let Some(index) = timeline.position(&at.day, &at.start) else {
            continue;
        };
        let Some(heat_ids) = heat_index.get(at) else {
            continue;
        };

        for &hi in heat_ids {
            for lane in 0..heats[hi].lanes.len() {
                if !heats[hi].lanes[lane].is_empty_for(role) {
                    continue;
                }
                let track = LaneTrack::new(&at.day, lane);

                // Extend the track's active run when possible.
                if let Some(run) = board.active(&track) {
                    let current = run.volunteer.clone();
                    if run.len >= rules.run_max {
                        board.close(&track, index, rules);
                    } else if avail.is_available(&current, at)
                        && !busy.is_busy(&current, at)
                        && state.lunch.can_take(&current, at, rules)
                        && board.may_start(&current, &at.day, index)
                    {
                        commit(&mut heats[hi], lane, role, &current, at, state, busy);
                        board.extend(&track);
                        continue;
                    } else {
                        board.close(&track, index, rules);
                    }
                }

                // Start a new run.
                let candidates: Vec<&String> = pool
                    .iter()
                    .filter(|v| {
                        avail.is_available(v, at)
                            && !busy.is_busy(v, at)
                            && state.lunch.can_take(v, at, rules)
                            && board.may_start(v, &at.day, index)
                    })
                    .collect();
                if candidates.is_empty() {
                    tracing::debug!(slot = %at, lane, role = %role, "no eligible candidate, cell left empty");
                    continue;
                }

                let mut scored: Vec<(usize, &String)> = candidates
                    .into_iter()
                    .map(|v| {
                        let projected = project_run_length(
                            heats,
                            &heat_index,
                            &timeline,
                            avail,
                            busy,
                            &state.lunch,
                            rules,
                            v,
                            at,
                            lane,
                            index,
                        );
                        (projected, v)
                    })
                    .collect();
                scored.sort_by(|(la, va), (lb, vb)| {
                    (Reverse(*la), state.count(va), va.as_str())
                        .cmp(&(Reverse(*lb), state.count(vb), vb.as_str()))
                });

                // Prefer someone who can reach a worthwhile run; otherwise
                // take the best-ranked for a best-effort short run.
                let pick = scored
                    .iter()
                    .find(|(len, _)| *len >= rules.run_min)
                    .or_else(|| scored.first())
                    .map(|(len, v)| ((*v).clone(), *len));

                if let Some((volunteer, projected)) = pick {
                    commit(&mut heats[hi], lane, role, &volunteer, at, state, busy);
                    board.open(track, &volunteer, index);
                    tracing::debug!(
                        slot = %at,
                        lane,
                        role = %role,
                        volunteer = %volunteer,
                        projected,
                        "run opened"
                    );
                }
            }
        }
    }

    board.finish(rules);
}

/// Assign one cell and record it in the shared state.
fn commit(
    heat: &mut Heat,
    lane: usize,
    role: Role,
    volunteer: &str,
    at: &SlotKey,
    state: &mut RoleState,
    busy: &mut BusySet,
) {
    heat.lanes[lane].assign(role, volunteer.to_string());
    state.bump(volunteer);
    busy.mark(volunteer, at);
    state.lunch.claim(volunteer, at);
}

/// Pure look-ahead: the run length (capped at `run_max`) this candidate
/// could sustain on the lane track starting now, against a private copy of
/// the lunch ledger. Stops at the first missing lane or constraint violation.
#[allow(clippy::too_many_arguments)]
fn project_run_length(
    heats: &[Heat],
    heat_index: &HashMap<SlotKey, Vec<usize>>,
    timeline: &Timeline,
    avail: &AvailabilityIndex,
    busy: &BusySet,
    lunch: &LunchLedger,
    rules: &ScheduleRules,
    candidate: &str,
    at: &SlotKey,
    lane: usize,
    index: usize,
) -> usize {
    let mut len = 1;
    let mut idx = index;
    let mut lunch = lunch.clone();

    while len < rules.run_max {
        let Some(next_start) = timeline.start_at(&at.day, idx + 1) else {
            break;
        };
        let next = SlotKey {
            day: at.day.clone(),
            start: next_start.to_string(),
        };

        let lane_exists = heat_index
            .get(&next)
            .is_some_and(|ids| ids.iter().any(|&hi| heats[hi].lanes.len() > lane));
        if !lane_exists {
            break;
        }
        if !avail.is_available(candidate, &next)
            || busy.is_busy(candidate, &next)
            || !lunch.can_take(candidate, &next, rules)
        {
            break;
        }

        lunch.claim(candidate, &next);
        len += 1;
        idx += 1;
    }
    len
}

//! Explicit scheduling state threaded through the assignment passes.
//!
//! Nothing here is persisted. The busy set is shared by both role passes so
//! one volunteer can never hold two cells at the same instant; counters and
//! the lunch ledger live for one role's full pipeline (strict pass plus
//! backfill); the run board exists only for a single strict pass.

use std::collections::{HashMap, HashSet};

use crate::config::ScheduleRules;
use crate::engine::timeslot::{lunch_bucket, SlotKey};

/// One lane index followed across consecutive heats of one day — the
/// continuity unit runs are tracked on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LaneTrack {
    pub day: String,
    pub lane: usize,
}

impl LaneTrack {
    pub fn new(day: &str, lane: usize) -> Self {
        Self {
            day: day.to_string(),
            lane,
        }
    }
}

/// Instants at which each volunteer is already committed, across both roles.
#[derive(Debug, Default)]
pub struct BusySet {
    taken: HashMap<String, HashSet<SlotKey>>,
}

impl BusySet {
    /// Allocation-free: queried once per candidate per cell, so the hot
    /// path borrows instead of cloning.
    pub fn is_busy(&self, volunteer: &str, at: &SlotKey) -> bool {
        self.taken
            .get(volunteer)
            .is_some_and(|instants| instants.contains(at))
    }

    pub fn mark(&mut self, volunteer: &str, at: &SlotKey) {
        self.taken
            .entry(volunteer.to_string())
            .or_default()
            .insert(at.clone());
    }
}

/// Claimed lunch-window buckets per (volunteer, day).
///
/// `Clone` is deliberate: look-ahead simulation works on a private copy so
/// scoring never mutates live state.
#[derive(Debug, Default, Clone)]
pub struct LunchLedger {
    claimed: HashMap<(String, String), HashSet<&'static str>>,
}

impl LunchLedger {
    /// Whether assigning `at` keeps the volunteer under the lunch cap.
    /// Times outside the lunch window always pass; re-confirming an already
    /// held bucket also passes.
    pub fn can_take(&self, volunteer: &str, at: &SlotKey, rules: &ScheduleRules) -> bool {
        let Some(bucket) = lunch_bucket(&at.start) else {
            return true;
        };
        match self.claimed.get(&(volunteer.to_string(), at.day.clone())) {
            Some(held) => held.len() < rules.lunch_max_buckets || held.contains(bucket),
            None => rules.lunch_max_buckets > 0,
        }
    }

    pub fn claim(&mut self, volunteer: &str, at: &SlotKey) {
        if let Some(bucket) = lunch_bucket(&at.start) {
            self.claimed
                .entry((volunteer.to_string(), at.day.clone()))
                .or_default()
                .insert(bucket);
        }
    }

    #[cfg(test)]
    pub fn held(&self, volunteer: &str, day: &str) -> usize {
        self.claimed
            .get(&(volunteer.to_string(), day.to_string()))
            .map_or(0, HashSet::len)
    }
}

/// Per-role accumulators that outlive a single strict pass: how many cells
/// each volunteer holds, and which lunch buckets they have claimed.
#[derive(Debug, Default)]
pub struct RoleState {
    pub assigned: HashMap<String, usize>,
    pub lunch: LunchLedger,
}

impl RoleState {
    pub fn count(&self, volunteer: &str) -> usize {
        self.assigned.get(volunteer).copied().unwrap_or(0)
    }

    pub fn bump(&mut self, volunteer: &str) {
        *self.assigned.entry(volunteer.to_string()).or_insert(0) += 1;
    }
}

/// An in-progress consecutive sequence on one lane track.
#[derive(Debug, Clone)]
pub struct Run {
    pub volunteer: String,
    pub len: usize,
    pub start_index: usize,
}

/// Run and cooldown bookkeeping for one strict pass over the scope.
/// Discarded when the pass ends; cooldowns never cross roles.
#[derive(Debug, Default)]
pub struct RunBoard {
    runs: HashMap<LaneTrack, Run>,
    cooldown_floor: HashMap<(String, String), usize>,
}

impl RunBoard {
    pub fn active(&self, track: &LaneTrack) -> Option<&Run> {
        self.runs.get(track)
    }

    pub fn open(&mut self, track: LaneTrack, volunteer: &str, index: usize) {
        self.runs.insert(
            track,
            Run {
                volunteer: volunteer.to_string(),
                len: 1,
                start_index: index,
            },
        );
    }

    pub fn extend(&mut self, track: &LaneTrack) {
        if let Some(run) = self.runs.get_mut(track) {
            run.len += 1;
        }
    }

    /// Close the track's run at the given timeline index. A run of at least
    /// `run_min` puts its volunteer on cooldown for that day.
    pub fn close(&mut self, track: &LaneTrack, at_index: usize, rules: &ScheduleRules) {
        if let Some(run) = self.runs.remove(track) {
            if run.len >= rules.run_min {
                self.set_floor(&run.volunteer, &track.day, at_index + rules.cooldown);
            }
        }
    }

    /// Whether the volunteer is past their cooldown floor for this day.
    pub fn may_start(&self, volunteer: &str, day: &str, index: usize) -> bool {
        self.cooldown_floor
            .get(&(volunteer.to_string(), day.to_string()))
            .is_none_or(|&floor| floor <= index)
    }

    /// Close out every run still open at end of scope, as if each had ended
    /// just past its last occupied index.
    pub fn finish(&mut self, rules: &ScheduleRules) {
        let open: Vec<(LaneTrack, Run)> = self.runs.drain().collect();
        for (track, run) in open {
            if run.len >= rules.run_min {
                let end = run.start_index + run.len - 1;
                self.set_floor(&run.volunteer, &track.day, end + 1 + rules.cooldown);
            }
        }
    }

    fn set_floor(&mut self, volunteer: &str, day: &str, floor: usize) {
        let entry = self
            .cooldown_floor
            .entry((volunteer.to_string(), day.to_string()))
            .or_insert(0);
        *entry = (*entry).max(floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ScheduleRules {
        ScheduleRules::default()
    }

    fn at(day: &str, start: &str) -> SlotKey {
        SlotKey::new(day, start)
    }

    #[test]
    fn busy_set_blocks_exact_instant_only() {
        let mut busy = BusySet::default();
        busy.mark("a@x.y", &at("saturday", "10:00"));
        assert!(busy.is_busy("a@x.y", &at("saturday", "10:00")));
        assert!(!busy.is_busy("a@x.y", &at("saturday", "10:15")));
        assert!(!busy.is_busy("b@x.y", &at("saturday", "10:00")));
    }

    #[test]
    fn lunch_cap_leaves_one_bucket_free() {
        let mut ledger = LunchLedger::default();
        for start in ["12:00", "12:30", "13:00"] {
            assert!(ledger.can_take("a@x.y", &at("saturday", start), &rules()));
            ledger.claim("a@x.y", &at("saturday", start));
        }
        assert_eq!(ledger.held("a@x.y", "saturday"), 3);
        // Fourth distinct bucket is refused...
        assert!(!ledger.can_take("a@x.y", &at("saturday", "13:30"), &rules()));
        // ...but re-confirming a held bucket is fine, even via a finer time.
        assert!(ledger.can_take("a@x.y", &at("saturday", "13:15"), &rules()));
        // Other days and non-lunch times are unaffected.
        assert!(ledger.can_take("a@x.y", &at("sunday", "13:30"), &rules()));
        assert!(ledger.can_take("a@x.y", &at("saturday", "15:00"), &rules()));
    }

    #[test]
    fn lunch_claim_outside_window_is_a_no_op() {
        let mut ledger = LunchLedger::default();
        ledger.claim("a@x.y", &at("saturday", "09:00"));
        assert_eq!(ledger.held("a@x.y", "saturday"), 0);
    }

    #[test]
    fn role_state_counts() {
        let mut state = RoleState::default();
        assert_eq!(state.count("a@x.y"), 0);
        state.bump("a@x.y");
        state.bump("a@x.y");
        assert_eq!(state.count("a@x.y"), 2);
    }

    #[test]
    fn short_run_close_applies_no_cooldown() {
        let mut board = RunBoard::default();
        let track = LaneTrack::new("saturday", 0);
        board.open(track.clone(), "a@x.y", 0);
        board.close(&track, 1, &rules());
        assert!(board.may_start("a@x.y", "saturday", 1));
    }

    #[test]
    fn qualifying_run_close_applies_cooldown() {
        let mut board = RunBoard::default();
        let track = LaneTrack::new("saturday", 0);
        board.open(track.clone(), "a@x.y", 0);
        board.extend(&track);
        board.close(&track, 2, &rules());
        assert!(!board.may_start("a@x.y", "saturday", 2));
        assert!(!board.may_start("a@x.y", "saturday", 3));
        assert!(board.may_start("a@x.y", "saturday", 4));
        // Cooldown is per day.
        assert!(board.may_start("a@x.y", "sunday", 2));
    }

    #[test]
    fn finish_closes_open_runs_past_their_last_index() {
        let mut board = RunBoard::default();
        let track = LaneTrack::new("saturday", 0);
        board.open(track.clone(), "a@x.y", 3);
        board.extend(&track);
        board.extend(&track);
        // Run occupies indices 3..=5; cooldown floor is 6 + cooldown.
        board.finish(&rules());
        assert!(board.active(&track).is_none());
        assert!(!board.may_start("a@x.y", "saturday", 7));
        assert!(board.may_start("a@x.y", "saturday", 8));
    }

    #[test]
    fn cooldown_floor_never_moves_backwards() {
        let mut board = RunBoard::default();
        let track = LaneTrack::new("saturday", 0);
        board.open(track.clone(), "a@x.y", 0);
        board.extend(&track);
        board.close(&track, 5, &rules());
        board.open(track.clone(), "a@x.y", 7);
        board.extend(&track);
        board.close(&track, 2, &rules());
        assert!(!board.may_start("a@x.y", "saturday", 6));
        assert!(board.may_start("a@x.y", "saturday", 7));
    }
}

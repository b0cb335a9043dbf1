use std::collections::{BTreeSet, HashMap};

use crate::engine::timeslot::SlotKey;
use crate::model::Heat;

/// The sorted, deduplicated set of instants needing role coverage. Heats
/// with a blank day or start are silently excluded (spec'd tolerance: bad
/// rows are gaps, not errors).
pub fn build_scope(heats: &[Heat]) -> Vec<SlotKey> {
    let mut keys = BTreeSet::new();
    for heat in heats {
        let key = SlotKey::new(&heat.day, &heat.start);
        if !key.is_blank() {
            keys.insert(key);
        }
    }
    keys.into_iter().collect()
}

/// Scope restricted to a single instant.
pub fn single_scope(day: &str, start: &str) -> Vec<SlotKey> {
    let key = SlotKey::new(day, start);
    if key.is_blank() {
        Vec::new()
    } else {
        vec![key]
    }
}

/// Heat list indices grouped by normalized exact instant.
pub fn index_heats(heats: &[Heat]) -> HashMap<SlotKey, Vec<usize>> {
    let mut index: HashMap<SlotKey, Vec<usize>> = HashMap::new();
    for (i, heat) in heats.iter().enumerate() {
        let key = SlotKey::new(&heat.day, &heat.start);
        if !key.is_blank() {
            index.entry(key).or_default().push(i);
        }
    }
    index
}

/// Per-day position of each start time within scope.
///
/// Run and cooldown bookkeeping counts scope instants, not wall-clock time:
/// index distance 2 means "two heats later that day" whatever the actual gap.
#[derive(Debug, Default)]
pub struct Timeline {
    positions: HashMap<String, HashMap<String, usize>>,
    starts: HashMap<String, Vec<String>>,
}

impl Timeline {
    pub fn build(scope: &[SlotKey]) -> Self {
        let mut per_day: HashMap<String, BTreeSet<String>> = HashMap::new();
        for key in scope {
            per_day
                .entry(key.day.clone())
                .or_default()
                .insert(key.start.clone());
        }

        let mut positions = HashMap::new();
        let mut starts = HashMap::new();
        for (day, times) in per_day {
            let ordered: Vec<String> = times.into_iter().collect();
            let index: HashMap<String, usize> = ordered
                .iter()
                .enumerate()
                .map(|(i, t)| (t.clone(), i))
                .collect();
            positions.insert(day.clone(), index);
            starts.insert(day, ordered);
        }
        Self { positions, starts }
    }

    /// Index of a start time within its day, if the instant is in scope.
    pub fn position(&self, day: &str, start: &str) -> Option<usize> {
        self.positions.get(day)?.get(start).copied()
    }

    /// Start time at a given index of a day's timeline.
    pub fn start_at(&self, day: &str, index: usize) -> Option<&str> {
        self.starts.get(day)?.get(index).map(String::as_str)
    }
}

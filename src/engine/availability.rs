use std::collections::{HashMap, HashSet};

use crate::engine::timeslot::SlotKey;

/// Status value that marks a declared slot as usable. Every other status
/// (or an absent key) means unavailable.
pub const STATUS_AVAILABLE: &str = "available";

/// Per-volunteer lookup from (day, 30-minute bucket) to availability.
///
/// Built once per engine invocation from the raw availability store and
/// queried with exact heat start times; queries are floored to their bucket,
/// so a volunteer who declared the 10:30 bucket covers a 10:37 heat.
#[derive(Debug, Default)]
pub struct AvailabilityIndex {
    slots: HashMap<String, HashSet<SlotKey>>,
}

impl AvailabilityIndex {
    /// Index the raw store: `email -> { "day HH:MM" -> status }`. Slot keys
    /// that do not split into a day and a time are skipped.
    pub fn build(raw: &HashMap<String, HashMap<String, String>>) -> Self {
        let mut slots: HashMap<String, HashSet<SlotKey>> = HashMap::new();
        for (email, declared) in raw {
            let identity = email.trim().to_lowercase();
            if identity.is_empty() {
                continue;
            }
            let entry = slots.entry(identity).or_default();
            for (slot, status) in declared {
                if status != STATUS_AVAILABLE {
                    continue;
                }
                let Some((day, start)) = slot.trim().rsplit_once(' ') else {
                    continue;
                };
                let key = SlotKey::new(day, start).bucketed();
                if !key.is_blank() {
                    entry.insert(key);
                }
            }
        }
        Self { slots }
    }

    /// Tolerant exact-time predicate: buckets the requested instant and
    /// checks the declared flag for that window.
    pub fn is_available(&self, volunteer: &str, at: &SlotKey) -> bool {
        self.slots
            .get(volunteer)
            .is_some_and(|declared| declared.contains(&at.bucketed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with(email: &str, slots: &[(&str, &str)]) -> HashMap<String, HashMap<String, String>> {
        let mut declared = HashMap::new();
        for (slot, status) in slots {
            declared.insert(slot.to_string(), status.to_string());
        }
        HashMap::from([(email.to_string(), declared)])
    }

    #[test]
    fn declared_bucket_covers_finer_times() {
        let idx = AvailabilityIndex::build(&raw_with("a@x.y", &[("saturday 10:30", "available")]));
        assert!(idx.is_available("a@x.y", &SlotKey::new("saturday", "10:30")));
        assert!(idx.is_available("a@x.y", &SlotKey::new("saturday", "10:37")));
        assert!(idx.is_available("a@x.y", &SlotKey::new("saturday", "10:45")));
        assert!(!idx.is_available("a@x.y", &SlotKey::new("saturday", "10:15")));
        assert!(!idx.is_available("a@x.y", &SlotKey::new("sunday", "10:30")));
    }

    #[test]
    fn non_available_status_is_ignored() {
        let idx = AvailabilityIndex::build(&raw_with(
            "a@x.y",
            &[("saturday 10:00", "maybe"), ("saturday 10:30", "none")],
        ));
        assert!(!idx.is_available("a@x.y", &SlotKey::new("saturday", "10:00")));
        assert!(!idx.is_available("a@x.y", &SlotKey::new("saturday", "10:30")));
    }

    #[test]
    fn unknown_volunteer_is_unavailable() {
        let idx = AvailabilityIndex::default();
        assert!(!idx.is_available("ghost@x.y", &SlotKey::new("saturday", "10:00")));
    }

    #[test]
    fn identity_is_case_insensitive() {
        let idx = AvailabilityIndex::build(&raw_with("A@X.Y", &[("saturday 10:00", "available")]));
        assert!(idx.is_available("a@x.y", &SlotKey::new("saturday", "10:00")));
    }

    #[test]
    fn malformed_slot_keys_are_skipped() {
        let idx = AvailabilityIndex::build(&raw_with("a@x.y", &[("nonsense", "available")]));
        assert!(!idx.is_available("a@x.y", &SlotKey::new("nonsense", "")));
    }
}

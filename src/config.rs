use std::path::{Path, PathBuf};

/// Continuity and fatigue rules for the strict assignment pass.
///
/// All lengths are counted in scope instants (distinct start times on one
/// day), not wall-clock time: "2 heats later" means two scope entries later
/// on that day regardless of the gap between them.
#[derive(Debug, Clone)]
pub struct ScheduleRules {
    /// Minimum worthwhile run length. Runs shorter than this are started only
    /// as a last resort and do not trigger a cooldown when they end.
    pub run_min: usize,
    /// Maximum consecutive heats one volunteer works on a lane track.
    pub run_max: usize,
    /// Enforced idle instants after a run of at least `run_min` ends.
    pub cooldown: usize,
    /// Maximum lunch-window buckets (of the four spanning 12:00-14:00) one
    /// volunteer may hold per day, leaving at least one free for a break.
    pub lunch_max_buckets: usize,
}

impl Default for ScheduleRules {
    fn default() -> Self {
        Self {
            run_min: 2,
            run_max: 4,
            cooldown: 2,
            lunch_max_buckets: 3,
        }
    }
}

impl ScheduleRules {
    pub fn new(run_min: usize, run_max: usize, cooldown: usize) -> Self {
        Self {
            run_min,
            run_max,
            cooldown,
            ..Default::default()
        }
    }
}

/// Locations of the three JSON data files the engine reads and writes.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub heats: PathBuf,
    pub volunteers: PathBuf,
    pub availability: PathBuf,
}

impl DataPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            heats: dir.join("heats.json"),
            volunteers: dir.join("volunteers.json"),
            availability: dir.join("availability.json"),
        }
    }
}

use std::collections::HashSet;

use crate::model::{Role, Volunteer};

/// Role-eligible subsets of the active roster.
///
/// Classification is tolerant of free-text positions: an empty position or
/// one starting with `j` goes to the judge pool, one starting with `b` to
/// the builder pool, the literal `staff` to neither, and any other value to
/// both pools rather than losing the volunteer. An empty role pool falls
/// back to the full active roster.
#[derive(Debug)]
pub struct RolePools {
    judges: Vec<String>,
    builders: Vec<String>,
    actives: Vec<String>,
    staff: HashSet<String>,
}

impl RolePools {
    pub fn build(roster: &[Volunteer]) -> Self {
        let mut judges = Vec::new();
        let mut builders = Vec::new();
        let mut actives = Vec::new();
        let mut staff = HashSet::new();
        let mut seen = HashSet::new();

        for volunteer in roster {
            if !volunteer.active {
                continue;
            }
            let identity = volunteer.identity();
            if identity.is_empty() || !seen.insert(identity.clone()) {
                continue;
            }
            actives.push(identity.clone());

            let position = volunteer.position.trim().to_lowercase();
            match position.chars().next() {
                None => judges.push(identity),
                Some('j') => judges.push(identity),
                Some('b') => builders.push(identity),
                _ if position == "staff" => {
                    staff.insert(identity);
                }
                _ => {
                    // Unknown position: open to both pools.
                    judges.push(identity.clone());
                    builders.push(identity);
                }
            }
        }

        if judges.is_empty() {
            judges = actives.clone();
        }
        if builders.is_empty() {
            builders = actives.clone();
        }

        Self {
            judges,
            builders,
            actives,
            staff,
        }
    }

    pub fn for_role(&self, role: Role) -> &[String] {
        match role {
            Role::Judge => &self.judges,
            Role::Builder => &self.builders,
        }
    }

    /// Backfill fallback pool: every active volunteer in either role pool,
    /// minus staff; if that is empty, all actives minus staff.
    pub fn global(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut pool: Vec<String> = self
            .judges
            .iter()
            .chain(self.builders.iter())
            .filter(|id| !self.staff.contains(*id) && seen.insert((*id).clone()))
            .cloned()
            .collect();
        if pool.is_empty() {
            pool = self
                .actives
                .iter()
                .filter(|id| !self.staff.contains(*id))
                .cloned()
                .collect();
        }
        pool
    }

    pub fn active_count(&self) -> usize {
        self.actives.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volunteer(email: &str, position: &str, active: bool) -> Volunteer {
        Volunteer {
            name: String::new(),
            email: email.to_string(),
            position: position.to_string(),
            active,
        }
    }

    #[test]
    fn classification_by_position_prefix() {
        let roster = vec![
            volunteer("j1@x.y", "judge", true),
            volunteer("j2@x.y", "Juge", true),
            volunteer("b1@x.y", "builder", true),
            volunteer("b2@x.y", "build crew", true),
            volunteer("none@x.y", "", true),
            volunteer("staff@x.y", "staff", true),
            volunteer("odd@x.y", "medic", true),
        ];
        let pools = RolePools::build(&roster);
        assert_eq!(
            pools.for_role(Role::Judge),
            &["j1@x.y", "j2@x.y", "none@x.y", "odd@x.y"]
        );
        assert_eq!(
            pools.for_role(Role::Builder),
            &["b1@x.y", "b2@x.y", "odd@x.y"]
        );
        assert_eq!(pools.active_count(), 7);
    }

    #[test]
    fn inactive_and_blank_emails_are_skipped() {
        let roster = vec![
            volunteer("gone@x.y", "judge", false),
            volunteer("   ", "judge", true),
            volunteer("ok@x.y", "judge", true),
        ];
        let pools = RolePools::build(&roster);
        assert_eq!(pools.for_role(Role::Judge), &["ok@x.y"]);
        assert_eq!(pools.active_count(), 1);
    }

    #[test]
    fn duplicate_identities_are_deduplicated() {
        let roster = vec![
            volunteer("dup@x.y", "judge", true),
            volunteer("DUP@x.y", "builder", true),
        ];
        let pools = RolePools::build(&roster);
        assert_eq!(pools.active_count(), 1);
        assert_eq!(pools.for_role(Role::Judge), &["dup@x.y"]);
        // Builder pool is empty after dedup, so it falls back to all actives.
        assert_eq!(pools.for_role(Role::Builder), &["dup@x.y"]);
    }

    #[test]
    fn empty_role_pool_falls_back_to_actives() {
        let roster = vec![
            volunteer("j1@x.y", "judge", true),
            volunteer("j2@x.y", "judge", true),
        ];
        let pools = RolePools::build(&roster);
        assert_eq!(pools.for_role(Role::Builder), &["j1@x.y", "j2@x.y"]);
    }

    #[test]
    fn global_pool_excludes_staff() {
        let roster = vec![
            volunteer("j@x.y", "judge", true),
            volunteer("b@x.y", "builder", true),
            volunteer("s@x.y", "staff", true),
        ];
        let pools = RolePools::build(&roster);
        let global = pools.global();
        assert!(global.contains(&"j@x.y".to_string()));
        assert!(global.contains(&"b@x.y".to_string()));
        assert!(!global.contains(&"s@x.y".to_string()));
    }

    #[test]
    fn staff_only_roster_yields_empty_global_pool() {
        let roster = vec![volunteer("s@x.y", "staff", true)];
        let pools = RolePools::build(&roster);
        // Role pools fall back to the full roster, but the global pool still
        // filters staff out of the fallback.
        assert!(pools.global().is_empty());
    }
}

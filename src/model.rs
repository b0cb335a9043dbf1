use serde::{Deserialize, Serialize};

/// The two roles the engine staffs on every lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Judge,
    Builder,
}

impl Role {
    /// Both roles in the order the engine schedules them: builders first,
    /// then judges, over the same scope.
    pub const ALL: [Role; 2] = [Role::Builder, Role::Judge];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Judge => write!(f, "judge"),
            Role::Builder => write!(f, "builder"),
        }
    }
}

/// A volunteer as stored in the roster. Identity is the lowercased email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volunteer {
    #[serde(default)]
    pub name: String,
    pub email: String,
    /// Declared position, free text: "judge", "builder", "staff", or
    /// anything else. Empty means no preference (treated as judge).
    #[serde(default)]
    pub position: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Volunteer {
    /// Canonical identity: lowercased, trimmed email. Empty means the record
    /// is unusable and is skipped by the pool builder.
    pub fn identity(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// One lane within a heat. The team name is never touched by the engine;
/// only the role assignments are purged and rewritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lane {
    #[serde(default)]
    pub team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder: Option<String>,
}

impl Lane {
    pub fn assignee(&self, role: Role) -> Option<&str> {
        match role {
            Role::Judge => self.judge.as_deref(),
            Role::Builder => self.builder.as_deref(),
        }
    }

    pub fn assign(&mut self, role: Role, volunteer: String) {
        match role {
            Role::Judge => self.judge = Some(volunteer),
            Role::Builder => self.builder = Some(volunteer),
        }
    }

    /// Clear both role assignments, leaving the team untouched.
    pub fn purge_roles(&mut self) {
        self.judge = None;
        self.builder = None;
    }

    pub fn is_empty_for(&self, role: Role) -> bool {
        match self.assignee(role) {
            Some(v) => v.trim().is_empty(),
            None => true,
        }
    }
}

/// One timed round of the event. Day and start are free text, normalized at
/// the point of use; the label (wod/heat number) is opaque to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heat {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub lanes: Vec<Lane>,
}

use serde::{Deserialize, Serialize};

/// Account role. Stored in the database as its `as_str` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Worker,
    Coordinator,
    Practitioner,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Worker => "worker",
            Self::Coordinator => "coordinator",
            Self::Practitioner => "practitioner",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "worker" => Some(Self::Worker),
            "coordinator" => Some(Self::Coordinator),
            "practitioner" => Some(Self::Practitioner),
            _ => None,
        }
    }

    /// Whether this role may review documents and inspect other users'
    /// onboarding state.
    #[must_use]
    pub const fn can_review(self) -> bool {
        matches!(self, Self::Admin | Self::Coordinator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Worker, Role::Coordinator, Role::Practitioner] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_review_capability() {
        assert!(Role::Admin.can_review());
        assert!(Role::Coordinator.can_review());
        assert!(!Role::Worker.can_review());
        assert!(!Role::Practitioner.can_review());
    }
}

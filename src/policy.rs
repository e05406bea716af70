//! # Roles and Permission Policy
//!
//! The role hierarchy is an ordered enumeration; "highest role" and
//! "role >= X" checks are numeric comparisons on the variant rank rather than
//! chains of boolean tests.
//!
//! Each capability is an independent pure predicate over [`Role`]. There is no
//! shared policy table: adding a capability cannot change the semantics of an
//! existing one. Predicates never fail; anything that is not an explicit
//! allow is a deny.

use serde::{Deserialize, Serialize};

/// Privilege levels, ordered lowest to highest.
///
/// The derive order matters: `Ord` on the variants is the privilege order,
/// so `roles.iter().max()` yields the most privileged assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Analyst,
    Manager,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Numeric rank within the hierarchy; higher means more privileged.
    pub fn rank(self) -> u8 {
        match self {
            Role::Viewer => 0,
            Role::Analyst => 1,
            Role::Manager => 2,
            Role::Admin => 3,
            Role::SuperAdmin => 4,
        }
    }

    /// Stored string form, matching the `user_roles.role` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Analyst => "analyst",
            Role::Manager => "manager",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Human-readable label for display surfaces.
    pub fn label(self) -> &'static str {
        match self {
            Role::Viewer => "Viewer",
            Role::Analyst => "Analyst",
            Role::Manager => "Manager",
            Role::Admin => "Admin",
            Role::SuperAdmin => "Super Admin",
        }
    }

    /// Parses a stored role string. Unknown strings yield `None` and must be
    /// treated as deny by callers; they are never mapped to a default role.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "viewer" => Some(Role::Viewer),
            "analyst" => Some(Role::Analyst),
            "manager" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the single effective role from a principal's assignments.
///
/// Walks the privilege order from highest to lowest and returns the first
/// role present; an empty set resolves to [`Role::Viewer`], never to an
/// absent value. Pure and total.
pub fn effective_role(roles: &[Role]) -> Role {
    roles.iter().copied().max().unwrap_or(Role::Viewer)
}

pub fn can_view_dashboard(_role: Role) -> bool {
    true
}

pub fn can_crud_ideas(role: Role) -> bool {
    matches!(role, Role::SuperAdmin | Role::Admin | Role::Manager)
}

pub fn can_view_ideas(role: Role) -> bool {
    role != Role::Viewer
}

pub fn can_crud_clients(role: Role) -> bool {
    matches!(role, Role::SuperAdmin | Role::Admin | Role::Manager)
}

pub fn can_view_clients(role: Role) -> bool {
    role != Role::Viewer
}

pub fn can_crud_processes(role: Role) -> bool {
    matches!(role, Role::SuperAdmin | Role::Admin | Role::Manager)
}

pub fn can_view_processes(role: Role) -> bool {
    role != Role::Viewer
}

pub fn can_crud_architect(role: Role) -> bool {
    matches!(role, Role::SuperAdmin | Role::Admin | Role::Manager)
}

pub fn can_view_architect(role: Role) -> bool {
    role != Role::Viewer
}

pub fn can_manage_automations(role: Role) -> bool {
    matches!(role, Role::SuperAdmin | Role::Admin | Role::Manager)
}

pub fn can_view_automations(role: Role) -> bool {
    matches!(role, Role::SuperAdmin | Role::Admin | Role::Manager)
}

pub fn can_manage_users(role: Role) -> bool {
    matches!(role, Role::SuperAdmin | Role::Admin)
}

pub fn can_manage_secrets(role: Role) -> bool {
    matches!(role, Role::SuperAdmin | Role::Admin | Role::Manager)
}

pub fn can_view_secrets(role: Role) -> bool {
    matches!(
        role,
        Role::SuperAdmin | Role::Admin | Role::Manager | Role::Analyst
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 5] = [
        Role::Viewer,
        Role::Analyst,
        Role::Manager,
        Role::Admin,
        Role::SuperAdmin,
    ];

    #[test]
    fn rank_matches_ord() {
        for window in ALL_ROLES.windows(2) {
            assert!(window[0] < window[1]);
            assert!(window[0].rank() < window[1].rank());
        }
    }

    #[test]
    fn parse_round_trips() {
        for role in ALL_ROLES {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let back: Role = serde_json::from_str("\"analyst\"").unwrap();
        assert_eq!(back, Role::Analyst);
    }

    #[test]
    fn effective_role_picks_highest() {
        assert_eq!(
            effective_role(&[Role::Viewer, Role::Manager]),
            Role::Manager
        );
        assert_eq!(
            effective_role(&[Role::SuperAdmin, Role::Admin]),
            Role::SuperAdmin
        );
        assert_eq!(effective_role(&[Role::Analyst]), Role::Analyst);
    }

    #[test]
    fn effective_role_defaults_to_viewer() {
        assert_eq!(effective_role(&[]), Role::Viewer);
    }

    #[test]
    fn manage_secrets_matrix() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Manager] {
            assert!(can_manage_secrets(role), "{role} should manage secrets");
        }
        for role in [Role::Analyst, Role::Viewer] {
            assert!(!can_manage_secrets(role), "{role} should not manage secrets");
        }
    }

    #[test]
    fn view_secrets_matrix() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Manager, Role::Analyst] {
            assert!(can_view_secrets(role), "{role} should view secrets");
        }
        assert!(!can_view_secrets(Role::Viewer));
    }

    #[test]
    fn manage_implies_view() {
        for role in ALL_ROLES {
            if can_manage_secrets(role) {
                assert!(can_view_secrets(role));
            }
            if can_crud_clients(role) {
                assert!(can_view_clients(role));
            }
            if can_crud_ideas(role) {
                assert!(can_view_ideas(role));
            }
            if can_crud_processes(role) {
                assert!(can_view_processes(role));
            }
            if can_manage_automations(role) {
                assert!(can_view_automations(role));
            }
        }
    }

    #[test]
    fn dashboard_is_open_to_everyone() {
        for role in ALL_ROLES {
            assert!(can_view_dashboard(role));
        }
    }
}

//! Presentation metadata for role ids, with a fallback for legacy or
//! malformed data.

use serde::Serialize;

use crate::Role;

/// Display bundle for a role (label, description, colour token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleBadge {
    /// `None` for the fallback badge.
    pub role: Option<Role>,
    pub display_name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

impl RoleBadge {
    /// Badge shown for absent or unrecognised role ids.
    pub const UNKNOWN: RoleBadge = RoleBadge {
        role: None,
        display_name: "Unknown Role",
        description: "Role not recognised",
        color: "gray",
    };

    pub const fn is_unknown(&self) -> bool {
        self.role.is_none()
    }
}

impl From<Role> for RoleBadge {
    fn from(role: Role) -> Self {
        Self {
            role: Some(role),
            display_name: role.display_name(),
            description: role.description(),
            color: role.color(),
        }
    }
}

pub fn badge(role: Option<&str>) -> RoleBadge {
    role.and_then(Role::from_id)
        .map_or(RoleBadge::UNKNOWN, RoleBadge::from)
}

pub fn display_name(role: Option<&str>) -> &'static str {
    badge(role).display_name
}

pub fn description(role: Option<&str>) -> &'static str {
    badge(role).description
}

pub fn color_token(role: Option<&str>) -> &'static str {
    badge(role).color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_role_badge() {
        let b = badge(Some("tournament_organizer"));
        assert_eq!(b.role, Some(Role::TournamentOrganizer));
        assert_eq!(b.display_name, "Tournament Organizer");
        assert_eq!(b.color, "orange");
    }

    #[test]
    fn unknown_and_absent_fall_back() {
        for id in [None, Some(""), Some("moderator"), Some("ADMIN")] {
            let b = badge(id);
            assert!(b.is_unknown());
            assert_eq!(b, RoleBadge::UNKNOWN);
        }
        assert_eq!(display_name(Some("moderator")), "Unknown Role");
        assert_eq!(description(None), "Role not recognised");
        assert_eq!(color_token(Some("moderator")), "gray");
    }

    #[test]
    fn every_role_has_complete_metadata() {
        for role in Role::ALL {
            let b = RoleBadge::from(role);
            assert!(!b.display_name.is_empty());
            assert!(!b.description.is_empty());
            assert_ne!(b.color, RoleBadge::UNKNOWN.color);
        }
    }

    #[test]
    fn serializes_role_id() {
        let json = serde_json::to_value(badge(Some("coach"))).unwrap();
        assert_eq!(json["role"], "coach");
        assert_eq!(json["display_name"], "Coach");

        let json = serde_json::to_value(RoleBadge::UNKNOWN).unwrap();
        assert!(json["role"].is_null());
    }
}

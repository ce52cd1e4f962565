use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role held by a user account.
///
/// The set is closed: ids are persisted against user records elsewhere, so a
/// variant's id and rank must never be reused or renumbered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    Coach,
    TeamManager,
    Referee,
    TournamentOrganizer,
    Admin,
    SuperAdmin,
    OmanEsportCommittee,
}

/// Static metadata for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleInfo {
    pub id: &'static str,
    pub rank: u8,
    pub display_name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
}

const PLAYER: RoleInfo = RoleInfo {
    id: "player",
    rank: 1,
    display_name: "Player",
    description: "Competes in tournaments as a member of a team",
    color: "blue",
};

const COACH: RoleInfo = RoleInfo {
    id: "coach",
    rank: 2,
    display_name: "Coach",
    description: "Trains a team and helps prepare its strategy",
    color: "green",
};

const TEAM_MANAGER: RoleInfo = RoleInfo {
    id: "team_manager",
    rank: 3,
    display_name: "Team Manager",
    description: "Manages a team roster and registers it for tournaments",
    color: "purple",
};

const REFEREE: RoleInfo = RoleInfo {
    id: "referee",
    rank: 4,
    display_name: "Referee",
    description: "Officiates matches and reports results",
    color: "yellow",
};

const TOURNAMENT_ORGANIZER: RoleInfo = RoleInfo {
    id: "tournament_organizer",
    rank: 5,
    display_name: "Tournament Organizer",
    description: "Creates tournaments and manages their brackets",
    color: "orange",
};

const ADMIN: RoleInfo = RoleInfo {
    id: "admin",
    rank: 6,
    display_name: "Administrator",
    description: "Manages users and platform content",
    color: "red",
};

const SUPER_ADMIN: RoleInfo = RoleInfo {
    id: "super_admin",
    rank: 7,
    display_name: "Super Administrator",
    description: "Unrestricted control, including granting any role",
    color: "pink",
};

const OMAN_ESPORT_COMMITTEE: RoleInfo = RoleInfo {
    id: "oman_esport_committee",
    rank: 8,
    display_name: "Oman Esports Committee",
    description: "National governing body overseeing sanctioned competition",
    color: "emerald",
};

/// Returned by `FromStr` for ids outside the role set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    /// Every role, in ascending rank order.
    pub const ALL: [Role; 8] = [
        Role::Player,
        Role::Coach,
        Role::TeamManager,
        Role::Referee,
        Role::TournamentOrganizer,
        Role::Admin,
        Role::SuperAdmin,
        Role::OmanEsportCommittee,
    ];

    /// Role with unrestricted assignment rights.
    pub const SUPER: Role = Role::SuperAdmin;

    /// Governance role; only the super role may grant it.
    pub const GOVERNANCE: Role = Role::OmanEsportCommittee;

    pub const fn info(self) -> &'static RoleInfo {
        match self {
            Role::Player => &PLAYER,
            Role::Coach => &COACH,
            Role::TeamManager => &TEAM_MANAGER,
            Role::Referee => &REFEREE,
            Role::TournamentOrganizer => &TOURNAMENT_ORGANIZER,
            Role::Admin => &ADMIN,
            Role::SuperAdmin => &SUPER_ADMIN,
            Role::OmanEsportCommittee => &OMAN_ESPORT_COMMITTEE,
        }
    }

    /// Canonical string id (the persisted form).
    pub const fn id(self) -> &'static str {
        self.info().id
    }

    /// Privilege rank; strictly increasing with privilege, starting at 1.
    pub const fn rank(self) -> u8 {
        self.info().rank
    }

    pub const fn display_name(self) -> &'static str {
        self.info().display_name
    }

    pub const fn description(self) -> &'static str {
        self.info().description
    }

    pub const fn color(self) -> &'static str {
        self.info().color
    }

    /// Whether a new user may pick this role at signup.
    pub const fn is_self_registrable(self) -> bool {
        matches!(self, Role::Player | Role::Coach | Role::TeamManager)
    }

    /// Exact lookup by id. Ids are case-sensitive and never trimmed.
    pub fn from_id(id: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.id() == id)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_id(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_unique_and_parse_back() {
        let ids: HashSet<&str> = Role::ALL.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), Role::ALL.len());

        for role in Role::ALL {
            assert_eq!(role.id().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn ranks_are_strictly_increasing_from_one() {
        let ranks: Vec<u8> = Role::ALL.iter().map(|r| r.rank()).collect();
        assert_eq!(ranks, (1..=8).collect::<Vec<u8>>());
    }

    #[test]
    fn serde_uses_the_persisted_id() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.id()));
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn parsing_is_exact() {
        assert_eq!("Admin".parse::<Role>(), Err(UnknownRole("Admin".to_string())));
        assert!(Role::from_id(" admin").is_none());
        assert!(Role::from_id("").is_none());
    }

    #[test]
    fn registration_classes_split_the_role_set() {
        let self_registrable: Vec<Role> =
            Role::ALL.into_iter().filter(|r| r.is_self_registrable()).collect();
        assert_eq!(
            self_registrable,
            vec![Role::Player, Role::Coach, Role::TeamManager]
        );
        assert!(!Role::SUPER.is_self_registrable());
        assert!(!Role::GOVERNANCE.is_self_registrable());
    }
}

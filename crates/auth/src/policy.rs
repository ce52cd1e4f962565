//! Role policy: hierarchical access checks and role-assignment rights.
//!
//! Every function here is total. Absent or unrecognised role ids never
//! error; they fall back to "rank 0 / no rights" so callers fail closed.

use crate::Role;

impl Role {
    /// `true` iff this role ranks at or above `required`.
    pub const fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Whether an actor holding this role may grant `target` to a user.
    ///
    /// Not derived from rank: admins may grant every role except the super
    /// and governance roles, the super role may grant anything, and nobody
    /// else may grant anything.
    pub const fn can_assign(self, target: Role) -> bool {
        match self {
            Role::SuperAdmin => true,
            Role::Admin => !matches!(target, Role::SuperAdmin | Role::OmanEsportCommittee),
            _ => false,
        }
    }

    /// Roles this actor may grant, in rank order.
    pub fn assignable_roles(self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|target| self.can_assign(*target))
            .collect()
    }
}

/// Rank of a role id; `0` when absent or unknown.
pub fn rank_of(role: Option<&str>) -> u8 {
    role.and_then(Role::from_id).map_or(0, Role::rank)
}

/// Hierarchical access check on raw role ids.
///
/// `false` if either id is absent or unknown, otherwise
/// `rank(user_role) >= rank(required_role)`.
pub fn has_permission(user_role: Option<&str>, required_role: Option<&str>) -> bool {
    match (
        user_role.and_then(Role::from_id),
        required_role.and_then(Role::from_id),
    ) {
        (Some(user), Some(required)) => user.satisfies(required),
        _ => false,
    }
}

/// Whether `actor_role` may assign `target_role`; `false` if either is
/// absent or unknown.
pub fn can_assign_role(actor_role: Option<&str>, target_role: Option<&str>) -> bool {
    match (
        actor_role.and_then(Role::from_id),
        target_role.and_then(Role::from_id),
    ) {
        (Some(actor), Some(target)) => actor.can_assign(target),
        _ => false,
    }
}

/// Roles `actor_role` may grant; empty for absent, unknown or
/// non-administrative roles.
pub fn assignable_roles(actor_role: Option<&str>) -> Vec<Role> {
    actor_role
        .and_then(Role::from_id)
        .map(Role::assignable_roles)
        .unwrap_or_default()
}

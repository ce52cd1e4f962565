//! Signup role selection.
//!
//! Self-registration is a static list, independent of any actor's role.

use thiserror::Error;

use crate::Role;

/// Roles a new user may pick for themselves.
pub const SELF_REGISTRABLE_ROLES: [Role; 3] = [Role::Player, Role::Coach, Role::TeamManager];

/// Role used when the signup form leaves the choice empty.
pub const DEFAULT_SIGNUP_ROLE: Role = Role::Player;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("role '{0}' cannot be chosen at signup")]
    NotSelfRegistrable(Role),
}

/// Resolve the role a signup form asked for.
pub fn signup_role(choice: Option<&str>) -> Result<Role, RegistrationError> {
    let Some(id) = choice else {
        return Ok(DEFAULT_SIGNUP_ROLE);
    };

    let role = Role::from_id(id).ok_or_else(|| RegistrationError::UnknownRole(id.to_string()))?;
    if !SELF_REGISTRABLE_ROLES.contains(&role) {
        return Err(RegistrationError::NotSelfRegistrable(role));
    }
    Ok(role)
}

use serde::{Deserialize, Serialize};

use arena_core::UserId;

use crate::Role;

/// The signed-in user as seen by guards and admin screens.
///
/// `role` is kept as the raw stored id: legacy or corrupted records must
/// still load, and are treated as holding no privileges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub display_name: String,
    pub role: String,
}

impl CurrentUser {
    pub fn new(user_id: UserId, display_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            role: role.into(),
        }
    }

    pub fn with_role(user_id: UserId, display_name: impl Into<String>, role: Role) -> Self {
        Self::new(user_id, display_name, role.id())
    }

    pub fn role_id(&self) -> Option<&str> {
        Some(self.role.as_str())
    }

    /// Parsed role, `None` when the stored id is not recognised.
    pub fn role(&self) -> Option<Role> {
        Role::from_id(&self.role)
    }
}

/// Authentication state supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Still resolving who the user is.
    #[default]
    Loading,
    SignedOut,
    SignedIn(CurrentUser),
}

impl Session {
    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            Session::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_role_loads_but_does_not_parse() {
        let user = CurrentUser::new(UserId::new(), "Nasser", "moderator");
        assert_eq!(user.role(), None);
        assert_eq!(user.role_id(), Some("moderator"));
    }

    #[test]
    fn only_signed_in_sessions_have_a_user() {
        let user = CurrentUser::with_role(UserId::new(), "Aisha", Role::Coach);
        assert_eq!(user.role(), Some(Role::Coach));
        assert_eq!(Session::SignedIn(user.clone()).user(), Some(&user));
        assert_eq!(Session::Loading.user(), None);
        assert_eq!(Session::SignedOut.user(), None);
        assert_eq!(Session::default(), Session::Loading);
    }
}

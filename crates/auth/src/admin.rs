//! Admin user management over an injected user directory.
//!
//! The policy check runs before the directory is touched, so a rejected
//! change never reaches the store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use arena_core::aggregate::ExpectedVersion;
use arena_core::{Aggregate, AggregateRoot, DomainError, UserId};

use crate::badge::RoleBadge;
use crate::registration::{signup_role, RegistrationError};
use crate::user::{ChangeRole, Register, Reinstate, Suspend, User, UserCommand};
use crate::{CurrentUser, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("forbidden: role '{actor}' cannot assign role '{target}'")]
    Forbidden { actor: String, target: String },

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("user directory unavailable: {0}")]
    Directory(String),
}

/// Storage capability for user accounts, supplied by the caller.
pub trait UserDirectory: Send + Sync {
    fn load(&self, user_id: UserId) -> Result<Option<User>, AdminError>;

    /// Persist `user`, failing with a conflict if the stored copy is not at
    /// `expected` version.
    fn save(&self, user: User, expected: ExpectedVersion) -> Result<(), AdminError>;
}

/// In-process directory for tests and single-node embedding.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, AdminError> {
        let users = self
            .users
            .read()
            .map_err(|e| AdminError::Directory(e.to_string()))?;
        Ok(users.len())
    }

    pub fn is_empty(&self) -> Result<bool, AdminError> {
        Ok(self.len()? == 0)
    }
}

impl UserDirectory for InMemoryDirectory {
    fn load(&self, user_id: UserId) -> Result<Option<User>, AdminError> {
        let users = self
            .users
            .read()
            .map_err(|e| AdminError::Directory(e.to_string()))?;
        Ok(users.get(&user_id).cloned())
    }

    fn save(&self, user: User, expected: ExpectedVersion) -> Result<(), AdminError> {
        let mut users = self
            .users
            .write()
            .map_err(|e| AdminError::Directory(e.to_string()))?;
        let stored = users.get(&user.id).map(|u| u.version());
        expected.check(stored)?;
        users.insert(user.id, user);
        Ok(())
    }
}

/// Operations behind the admin console's user-management screen.
pub struct RoleAdministration<D> {
    directory: D,
}

impl<D: UserDirectory> RoleAdministration<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Entries for the role selector shown to `actor`.
    pub fn role_options(&self, actor: &CurrentUser) -> Vec<RoleBadge> {
        crate::policy::assignable_roles(actor.role_id())
            .into_iter()
            .map(RoleBadge::from)
            .collect()
    }

    /// Self-service signup with an optional role choice.
    pub fn register(
        &self,
        email: &str,
        display_name: &str,
        role_choice: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<User, AdminError> {
        let role = signup_role(role_choice)?;
        let user_id = UserId::new();
        let command = UserCommand::Register(Register {
            user_id,
            email: email.to_string(),
            display_name: display_name.to_string(),
            role,
            occurred_at: now,
        });

        let user = self.execute(User::empty(user_id), &command, ExpectedVersion::New)?;
        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Change `user_id`'s role to `role_id` on behalf of `actor`.
    pub fn change_role(
        &self,
        actor: &CurrentUser,
        user_id: UserId,
        role_id: &str,
        now: DateTime<Utc>,
    ) -> Result<User, AdminError> {
        let target =
            Role::from_id(role_id).ok_or_else(|| AdminError::UnknownRole(role_id.to_string()))?;

        if !crate::policy::can_assign_role(actor.role_id(), Some(target.id())) {
            warn!(
                actor_id = %actor.user_id,
                actor_role = %actor.role,
                target_role = %target,
                %user_id,
                "role change rejected"
            );
            return Err(AdminError::Forbidden {
                actor: actor.role.clone(),
                target: target.id().to_string(),
            });
        }
        let actor_role = self.actor_role(actor)?;

        let user = self.load_existing(user_id)?;
        let previous = user.role;
        let expected = ExpectedVersion::Exact(user.version());
        let command = UserCommand::ChangeRole(ChangeRole {
            user_id,
            role: target,
            actor_role,
            occurred_at: now,
        });
        let user = self.execute(user, &command, expected)?;

        info!(
            actor_id = %actor.user_id,
            %user_id,
            previous = %previous,
            role = %user.role,
            "role changed"
        );
        Ok(user)
    }

    pub fn suspend(
        &self,
        actor: &CurrentUser,
        user_id: UserId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<User, AdminError> {
        let actor_role = self.actor_role(actor)?;
        let user = self.load_existing(user_id)?;
        let expected = ExpectedVersion::Exact(user.version());
        let command = UserCommand::Suspend(Suspend {
            user_id,
            reason: reason.to_string(),
            actor_role,
            occurred_at: now,
        });
        let user = self.execute(user, &command, expected)?;
        info!(actor_id = %actor.user_id, %user_id, reason, "user suspended");
        Ok(user)
    }

    pub fn reinstate(
        &self,
        actor: &CurrentUser,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<User, AdminError> {
        let actor_role = self.actor_role(actor)?;
        let user = self.load_existing(user_id)?;
        let expected = ExpectedVersion::Exact(user.version());
        let command = UserCommand::Reinstate(Reinstate {
            user_id,
            actor_role,
            occurred_at: now,
        });
        let user = self.execute(user, &command, expected)?;
        info!(actor_id = %actor.user_id, %user_id, "user reinstated");
        Ok(user)
    }

    fn actor_role(&self, actor: &CurrentUser) -> Result<Role, AdminError> {
        actor.role().ok_or_else(|| AdminError::UnknownRole(actor.role.clone()))
    }

    fn load_existing(&self, user_id: UserId) -> Result<User, AdminError> {
        self.directory
            .load(user_id)?
            .ok_or(AdminError::UserNotFound(user_id))
    }

    /// Run `command`, apply its events and write the result back.
    fn execute(
        &self,
        mut user: User,
        command: &UserCommand,
        expected: ExpectedVersion,
    ) -> Result<User, AdminError> {
        let events = user.handle(command)?;
        for event in &events {
            user.apply(event);
        }
        self.directory.save(user.clone(), expected)?;
        Ok(user)
    }
}

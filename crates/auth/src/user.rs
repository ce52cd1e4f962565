//! User aggregate (event-sourced).
//!
//! A user holds exactly one role. Role changes are gated by
//! `Role::can_assign` on the acting role, never by the target's own role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use arena_core::{Aggregate, AggregateRoot, DomainError, UserId};
use arena_events::Event;

use crate::Role;

// ─────────────────────────────────────────────────────────────────────────────
// User Status
// ─────────────────────────────────────────────────────────────────────────────

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserStatus {
    #[default]
    Active,
    /// Banned from signing in and from receiving new roles.
    Suspended,
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "Active"),
            UserStatus::Suspended => write!(f, "Suspended"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// User account.
///
/// # Invariants
/// - Registered at most once, with a self-registrable role.
/// - Exactly one role at any time.
/// - Suspended users cannot receive a new role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub status: UserStatus,
    pub version: u64,
    pub registered: bool,
}

impl User {
    /// Unregistered shell, ready to receive a `Register` command.
    pub fn empty(id: UserId) -> Self {
        Self {
            id,
            email: String::new(),
            display_name: String::new(),
            role: Role::Player,
            status: UserStatus::Active,
            version: 0,
            registered: false,
        }
    }

    /// Rebuild state from a stream of events.
    pub fn replay<'a>(id: UserId, events: impl IntoIterator<Item = &'a UserEvent>) -> Self {
        let mut user = Self::empty(id);
        for event in events {
            user.apply(event);
        }
        user
    }

    fn ensure_registered(&self) -> Result<(), DomainError> {
        if !self.registered {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn ensure_addressed(&self, user_id: UserId) -> Result<(), DomainError> {
        if user_id != self.id {
            return Err(DomainError::invariant("command addressed to a different user"));
        }
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), DomainError> {
        if self.status == UserStatus::Suspended {
            return Err(DomainError::invariant("user is suspended"));
        }
        Ok(())
    }
}

impl AggregateRoot for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Self-service signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Register {
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub occurred_at: DateTime<Utc>,
}

/// Replace a user's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRole {
    pub user_id: UserId,
    pub role: Role,
    /// Role of the actor performing the change.
    pub actor_role: Role,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suspend {
    pub user_id: UserId,
    pub reason: String,
    pub actor_role: Role,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reinstate {
    pub user_id: UserId,
    pub actor_role: Role,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UserCommand {
    Register(Register),
    ChangeRole(ChangeRole),
    Suspend(Suspend),
    Reinstate(Reinstate),
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChanged {
    pub user_id: UserId,
    pub previous: Role,
    pub role: Role,
    pub changed_by: Role,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSuspended {
    pub user_id: UserId,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserReinstated {
    pub user_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserEvent {
    Registered(UserRegistered),
    RoleChanged(RoleChanged),
    Suspended(UserSuspended),
    Reinstated(UserReinstated),
}

impl Event for UserEvent {
    fn event_type(&self) -> &'static str {
        match self {
            UserEvent::Registered(_) => "auth.user.registered",
            UserEvent::RoleChanged(_) => "auth.user.role_changed",
            UserEvent::Suspended(_) => "auth.user.suspended",
            UserEvent::Reinstated(_) => "auth.user.reinstated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            UserEvent::Registered(e) => e.occurred_at,
            UserEvent::RoleChanged(e) => e.occurred_at,
            UserEvent::Suspended(e) => e.occurred_at,
            UserEvent::Reinstated(e) => e.occurred_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate Implementation
// ─────────────────────────────────────────────────────────────────────────────

impl Aggregate for User {
    type Command = UserCommand;
    type Event = UserEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            UserEvent::Registered(e) => {
                self.id = e.user_id;
                self.email = e.email.clone();
                self.display_name = e.display_name.clone();
                self.role = e.role;
                self.registered = true;
            }
            UserEvent::RoleChanged(e) => self.role = e.role,
            UserEvent::Suspended(_) => self.status = UserStatus::Suspended,
            UserEvent::Reinstated(_) => self.status = UserStatus::Active,
        }
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            UserCommand::Register(cmd) => self.handle_register(cmd),
            UserCommand::ChangeRole(cmd) => self.handle_change_role(cmd),
            UserCommand::Suspend(cmd) => self.handle_suspend(cmd),
            UserCommand::Reinstate(cmd) => self.handle_reinstate(cmd),
        }
    }
}

impl User {
    fn handle_register(&self, cmd: &Register) -> Result<Vec<UserEvent>, DomainError> {
        if self.registered {
            return Err(DomainError::invariant("user already registered"));
        }
        self.ensure_addressed(cmd.user_id)?;

        let email = cmd.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        if cmd.display_name.trim().is_empty() {
            return Err(DomainError::validation("display name cannot be empty"));
        }

        if !cmd.role.is_self_registrable() {
            return Err(DomainError::Unauthorized);
        }

        Ok(vec![UserEvent::Registered(UserRegistered {
            user_id: cmd.user_id,
            email: email.to_lowercase(),
            display_name: cmd.display_name.trim().to_string(),
            role: cmd.role,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_change_role(&self, cmd: &ChangeRole) -> Result<Vec<UserEvent>, DomainError> {
        self.ensure_registered()?;
        self.ensure_addressed(cmd.user_id)?;
        self.ensure_active()?;

        // Re-granting the current role is allowed.
        if !cmd.actor_role.can_assign(cmd.role) {
            return Err(DomainError::Unauthorized);
        }

        Ok(vec![UserEvent::RoleChanged(RoleChanged {
            user_id: self.id,
            previous: self.role,
            role: cmd.role,
            changed_by: cmd.actor_role,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_suspend(&self, cmd: &Suspend) -> Result<Vec<UserEvent>, DomainError> {
        self.ensure_registered()?;
        self.ensure_addressed(cmd.user_id)?;

        if !cmd.actor_role.satisfies(Role::Admin) {
            return Err(DomainError::Unauthorized);
        }

        if self.status == UserStatus::Suspended {
            return Err(DomainError::invariant("user already suspended"));
        }

        Ok(vec![UserEvent::Suspended(UserSuspended {
            user_id: self.id,
            reason: cmd.reason.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reinstate(&self, cmd: &Reinstate) -> Result<Vec<UserEvent>, DomainError> {
        self.ensure_registered()?;
        self.ensure_addressed(cmd.user_id)?;

        if !cmd.actor_role.satisfies(Role::Admin) {
            return Err(DomainError::Unauthorized);
        }

        if self.status == UserStatus::Active {
            return Err(DomainError::invariant("user is not suspended"));
        }

        Ok(vec![UserEvent::Reinstated(UserReinstated {
            user_id: self.id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

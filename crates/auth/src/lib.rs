//! `arena-auth` — role hierarchy and access policy for the arena platform.
//!
//! The policy core (`roles`, `policy`, `badge`) is pure and stateless; it
//! takes roles as arguments and never reads ambient state. The remaining
//! modules are the collaborators that consume it:
//!
//! - `registration`: which roles a new user may pick
//! - `guard`: route protection for the web front end
//! - `user` / `admin`: role changes committed through an injected directory

pub mod admin;
pub mod badge;
pub mod config;
pub mod guard;
pub mod policy;
pub mod principal;
pub mod registration;
pub mod roles;
pub mod user;

pub use admin::{AdminError, InMemoryDirectory, RoleAdministration, UserDirectory};
pub use badge::{badge, color_token, description, display_name, RoleBadge};
pub use config::GuardConfig;
pub use guard::{GuardDecision, RouteGuard};
pub use policy::{assignable_roles, can_assign_role, has_permission, rank_of};
pub use principal::{CurrentUser, Session};
pub use registration::{signup_role, RegistrationError, SELF_REGISTRABLE_ROLES};
pub use roles::{Role, RoleInfo, UnknownRole};
pub use user::{User, UserEvent, UserStatus};

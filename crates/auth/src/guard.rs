//! Route guard: turns a session and a path into a navigation decision.
//!
//! The guard only consults `has_permission`; it owns no policy of its own.

use serde::Serialize;
use tracing::debug;

use crate::config::GuardConfig;
use crate::policy::{has_permission, rank_of};
use crate::{Role, Session};

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "to", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    /// The session is still loading; render nothing yet.
    Pending,
    Redirect(String),
}

/// A protected route prefix and the role it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: String,
    pub required: Role,
}

/// Prefix-based route table plus redirect configuration.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    config: GuardConfig,
    rules: Vec<RouteRule>,
}

impl RouteGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            rules: Vec::new(),
        }
    }

    /// Guard preloaded with the application's protected areas.
    pub fn arena_default(config: GuardConfig) -> Self {
        Self::new(config)
            .require("/profile", Role::Player)
            .require("/teams/manage", Role::TeamManager)
            .require("/matches/report", Role::Referee)
            .require("/tournaments/manage", Role::TournamentOrganizer)
            .require("/admin", Role::Admin)
            .require("/admin/roles", Role::SuperAdmin)
    }

    /// Protect `prefix` (and everything below it). Re-registering a prefix
    /// replaces its requirement.
    pub fn require(mut self, prefix: impl Into<String>, required: Role) -> Self {
        let prefix = normalize(&prefix.into());
        match self.rules.iter_mut().find(|r| r.prefix == prefix) {
            Some(rule) => rule.required = required,
            None => self.rules.push(RouteRule { prefix, required }),
        }
        self
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Role required for `path`; the longest matching prefix wins.
    /// `None` means the route is public.
    pub fn required_role(&self, path: &str) -> Option<Role> {
        let path = normalize(path);
        self.rules
            .iter()
            .filter(|rule| covers(&rule.prefix, &path))
            .max_by_key(|rule| rule.prefix.len())
            .map(|rule| rule.required)
    }

    pub fn check(&self, session: &Session, path: &str) -> GuardDecision {
        let Some(required) = self.required_role(path) else {
            return GuardDecision::Allow;
        };

        let decision = match session {
            Session::Loading => GuardDecision::Pending,
            Session::SignedOut => GuardDecision::Redirect(self.config.login_path.clone()),
            Session::SignedIn(user) => {
                if has_permission(user.role_id(), Some(required.id())) {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Redirect(self.config.unauthorized_path.clone())
                }
            }
        };

        debug!(
            path,
            required = %required,
            user_role = session.user().map(|u| u.role.as_str()),
            ?decision,
            "route guard decision"
        );
        decision
    }

    /// Explain a decision, for admin tooling and audit logs.
    pub fn explain(&self, session: &Session, path: &str) -> GuardExplanation {
        let required = self.required_role(path);
        let decision = self.check(session, path);
        let user_role = session.user().map(|u| u.role.clone());
        let user_rank = session.user().map(|u| rank_of(u.role_id()));

        let reason = match (&decision, required, session.user()) {
            (GuardDecision::Allow, None, _) => "route is public".to_string(),
            (GuardDecision::Pending, _, _) => "session still loading".to_string(),
            (GuardDecision::Redirect(_), _, None) => "not signed in".to_string(),
            (GuardDecision::Allow, Some(req), Some(user)) => format!(
                "role '{}' (rank {}) meets required role '{}' (rank {})",
                user.role,
                rank_of(user.role_id()),
                req,
                req.rank()
            ),
            (GuardDecision::Redirect(_), Some(req), Some(user)) if user.role().is_none() => {
                format!("role '{}' is not recognised; '{}' required", user.role, req)
            }
            (GuardDecision::Redirect(_), Some(req), Some(user)) => format!(
                "role '{}' (rank {}) is below required role '{}' (rank {})",
                user.role,
                rank_of(user.role_id()),
                req,
                req.rank()
            ),
            (decision, required, _) => format!("{decision:?} (required: {required:?})"),
        };

        GuardExplanation {
            path: path.to_string(),
            required_role: required,
            user_role,
            user_rank,
            decision,
            reason,
        }
    }
}

/// Detailed view of why the guard decided what it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardExplanation {
    pub path: String,
    pub required_role: Option<Role>,
    pub user_role: Option<String>,
    pub user_rank: Option<u8>,
    pub decision: GuardDecision,
    pub reason: String,
}

/// Reduce a location to its path: drop `?query` and `#fragment`, collapse
/// repeated slashes, force a leading slash and strip the trailing one.
fn normalize(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Segment-aware prefix match: `/admin` covers `/admin/users` but not
/// `/administrators`.
fn covers(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use arena_core::UserId;

    use super::*;
    use crate::CurrentUser;

    fn signed_in(role: &str) -> Session {
        Session::SignedIn(CurrentUser::new(UserId::new(), "Salim", role))
    }

    fn guard() -> RouteGuard {
        RouteGuard::arena_default(GuardConfig::default())
    }

    #[test]
    fn public_routes_allow_everyone() {
        let g = guard();
        assert_eq!(g.check(&Session::Loading, "/tournaments"), GuardDecision::Allow);
        assert_eq!(g.check(&Session::SignedOut, "/"), GuardDecision::Allow);
        assert_eq!(g.check(&signed_in("junk"), "/brackets/42"), GuardDecision::Allow);
    }

    #[test]
    fn loading_session_is_pending() {
        assert_eq!(guard().check(&Session::Loading, "/admin"), GuardDecision::Pending);
    }

    #[test]
    fn signed_out_goes_to_login() {
        assert_eq!(
            guard().check(&Session::SignedOut, "/profile"),
            GuardDecision::Redirect("/login".to_string())
        );
    }

    #[test]
    fn under_ranked_user_is_turned_away() {
        let g = guard();
        assert_eq!(
            g.check(&signed_in("player"), "/admin/users"),
            GuardDecision::Redirect("/unauthorized".to_string())
        );
        assert_eq!(g.check(&signed_in("admin"), "/admin/users"), GuardDecision::Allow);
        assert_eq!(g.check(&signed_in("admin"), "/teams/manage"), GuardDecision::Allow);
    }

    #[test]
    fn longest_prefix_wins() {
        let g = guard();
        assert_eq!(g.required_role("/admin/roles/edit"), Some(Role::SuperAdmin));
        assert_eq!(g.required_role("/admin/users"), Some(Role::Admin));
        assert_eq!(
            g.check(&signed_in("admin"), "/admin/roles"),
            GuardDecision::Redirect("/unauthorized".to_string())
        );
        assert_eq!(g.check(&signed_in("super_admin"), "/admin/roles"), GuardDecision::Allow);
    }

    #[test]
    fn prefix_matching_respects_segments() {
        let g = guard();
        assert_eq!(g.required_role("/administrators"), None);
        assert_eq!(g.required_role("/admin/"), Some(Role::Admin));
        assert_eq!(g.required_role("admin"), Some(Role::Admin));
    }

    #[test]
    fn query_and_fragment_do_not_unprotect_a_route() {
        let g = guard();
        for path in ["/admin?tab=users", "/admin#users", "/admin/?tab=users", "/admin?"] {
            assert_eq!(g.required_role(path), Some(Role::Admin), "{path}");
            assert_eq!(
                g.check(&signed_in("player"), path),
                GuardDecision::Redirect("/unauthorized".to_string()),
                "{path}"
            );
        }
        assert_eq!(g.check(&Session::Loading, "/admin?x=1"), GuardDecision::Pending);
        assert_eq!(
            g.check(&Session::SignedOut, "/profile#settings"),
            GuardDecision::Redirect("/login".to_string())
        );
    }

    #[test]
    fn repeated_slashes_are_collapsed() {
        let g = guard();
        assert_eq!(g.required_role("//admin"), Some(Role::Admin));
        assert_eq!(g.required_role("/admin//roles"), Some(Role::SuperAdmin));
        assert_eq!(g.required_role("///teams///manage/"), Some(Role::TeamManager));
        assert_eq!(
            g.check(&signed_in("player"), "//admin"),
            GuardDecision::Redirect("/unauthorized".to_string())
        );
    }

    #[test]
    fn query_cannot_downgrade_super_admin_area() {
        let g = guard();
        assert_eq!(g.required_role("/admin/roles?x=1"), Some(Role::SuperAdmin));
        assert_eq!(g.required_role("/admin/roles#edit"), Some(Role::SuperAdmin));
        assert_eq!(
            g.check(&signed_in("admin"), "/admin/roles?x=1"),
            GuardDecision::Redirect("/unauthorized".to_string())
        );
        assert_eq!(g.check(&signed_in("super_admin"), "/admin/roles?x=1"), GuardDecision::Allow);
    }

    #[test]
    fn query_on_a_public_route_stays_public() {
        let g = guard();
        assert_eq!(g.required_role("/tournaments?game=valorant"), None);
        assert_eq!(g.required_role("?next=/admin"), None);
        assert_eq!(g.required_role("/brackets#/admin"), None);
    }

    #[test]
    fn unknown_role_fails_closed() {
        assert_eq!(
            guard().check(&signed_in("moderator"), "/profile"),
            GuardDecision::Redirect("/unauthorized".to_string())
        );
    }

    #[test]
    fn redirect_targets_come_from_config() {
        let g = RouteGuard::new(GuardConfig::default().with_login_path("/signin"))
            .require("/teams/manage", Role::TeamManager);
        assert_eq!(
            g.check(&Session::SignedOut, "/teams/manage"),
            GuardDecision::Redirect("/signin".to_string())
        );
    }

    #[test]
    fn re_registering_replaces_requirement() {
        let g = RouteGuard::default()
            .require("/brackets", Role::Player)
            .require("/brackets/", Role::Referee);
        assert_eq!(g.rules().len(), 1);
        assert_eq!(g.required_role("/brackets"), Some(Role::Referee));
    }

    #[test]
    fn explanation_names_ranks() {
        let exp = guard().explain(&signed_in("coach"), "/teams/manage");
        assert_eq!(exp.required_role, Some(Role::TeamManager));
        assert_eq!(exp.user_rank, Some(2));
        assert!(exp.reason.contains("below required role 'team_manager'"));

        let exp = guard().explain(&signed_in("moderator"), "/teams/manage");
        assert_eq!(exp.user_rank, Some(0));
        assert!(exp.reason.contains("not recognised"));

        let exp = guard().explain(&Session::Loading, "/teams/manage");
        assert_eq!(exp.decision, GuardDecision::Pending);
    }

    #[test]
    fn decision_serializes_with_target() {
        let json = serde_json::to_value(GuardDecision::Redirect("/login".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({ "decision": "redirect", "to": "/login" }));
        let json = serde_json::to_value(GuardDecision::Allow).unwrap();
        assert_eq!(json, serde_json::json!({ "decision": "allow" }));
    }
}

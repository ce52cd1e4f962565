//! Route guard configuration.

/// Where the guard sends users it turns away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Redirect target for signed-out users.
    pub login_path: String,
    /// Redirect target for signed-in users lacking the required role.
    pub unauthorized_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
        }
    }
}

impl GuardConfig {
    /// Read overrides from `ARENA_LOGIN_PATH` / `ARENA_UNAUTHORIZED_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            login_path: lookup("ARENA_LOGIN_PATH")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.login_path),
            unauthorized_path: lookup("ARENA_UNAUTHORIZED_PATH")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.unauthorized_path),
        }
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_unauthorized_path(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_path = path.into();
        self
    }
}

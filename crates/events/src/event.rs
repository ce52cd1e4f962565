use chrono::{DateTime, Utc};

/// A fact emitted by an aggregate (user registered, role changed, ...).
///
/// Events are immutable, versioned and append-only.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "auth.user.role_changed").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}

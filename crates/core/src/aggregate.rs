//! Aggregate traits for event-sourced domain models (user accounts, etc).

use crate::error::{DomainError, DomainResult};

/// Aggregate root marker + minimal interface.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Number of events applied to this aggregate so far.
    fn version(&self) -> u64;
}

/// What the writer believes is currently stored for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Nothing is stored yet (first write of a new aggregate).
    New,
    /// The stored aggregate is at exactly this version.
    Exact(u64),
}

impl ExpectedVersion {
    /// `stored` is `None` when the store holds no copy of the aggregate.
    pub fn check(self, stored: Option<u64>) -> DomainResult<()> {
        match (self, stored) {
            (ExpectedVersion::New, None) => Ok(()),
            (ExpectedVersion::Exact(v), Some(actual)) if v == actual => Ok(()),
            (expected, actual) => Err(DomainError::conflict(format!(
                "stale write (expected: {expected:?}, stored: {actual:?})"
            ))),
        }
    }
}

/// Aggregate execution semantics (pure, deterministic).
///
/// - `handle(&self, cmd)` decides which events happen.
/// - `apply(&mut self, event)` evolves state.
///
/// Neither method performs IO.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event (bumping `version()` by one).
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events to emit given the current state and a command.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}

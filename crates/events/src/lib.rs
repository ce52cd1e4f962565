//! Domain events emitted by arena aggregates.

pub mod event;

pub use event::Event;

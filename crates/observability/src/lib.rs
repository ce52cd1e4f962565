//! Process-wide tracing setup shared by arena binaries and test harnesses.

/// Initialize tracing/logging (JSON, `RUST_LOG`-filtered).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration.
pub mod tracing;

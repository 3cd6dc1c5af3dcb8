//! Request identifier sources.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out request identifiers for correlating requests and responses.
///
/// Identifiers must be unique for the lifetime of the source. Their values
/// are otherwise unconstrained.
pub trait RequestIdSource: Send + Sync {
    /// Next unused identifier.
    fn next_id(&self) -> u64;
}

/// Monotonically increasing identifiers starting at a fixed value.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Identifiers starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Identifiers starting at `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestIdSource for SequentialIds {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

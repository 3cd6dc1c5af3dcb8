//! Reconciliation options and provider traits
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific terminal UI.

use crate::types::{ItemResult, Mode};

/// Options for a reconciliation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Merge desired values in, or remove the addressed items
    pub mode: Mode,
    /// Compute changes without sending any `set`
    pub dry_run: bool,
}

impl ReconcileOptions {
    pub fn new(mode: Mode, dry_run: bool) -> Self {
        Self { mode, dry_run }
    }

    /// Check-mode options for `mode`
    pub fn check(mode: Mode) -> Self {
        Self::new(mode, true)
    }
}

/// Progress callback for reconciliation
///
/// Implement this trait to receive progress updates while items are
/// processed.
pub trait ProgressCallback {
    /// Called before an item's current state is read
    fn on_item_start(&mut self, resource_type: &str, identifier: &str);

    /// Called when an item reaches a terminal state
    fn on_item_complete(&mut self, result: &ItemResult);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_item_start(&mut self, _resource_type: &str, _identifier: &str) {}
    fn on_item_complete(&mut self, _result: &ItemResult) {}
}

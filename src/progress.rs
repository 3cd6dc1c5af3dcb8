//! Per-item progress lines while a reconciliation runs

use colored::Colorize;
use declarative::{ItemResult, Outcome, ProgressCallback};

use crate::ui;

/// Prints a numbered step per item and its outcome
pub struct StepProgress {
    total: usize,
    current: usize,
    quiet: bool,
}

impl StepProgress {
    pub fn new(total: usize, quiet: bool) -> Self {
        Self {
            total,
            current: 0,
            quiet,
        }
    }

    /// Items started so far
    pub fn started(&self) -> usize {
        self.current
    }
}

impl ProgressCallback for StepProgress {
    fn on_item_start(&mut self, resource_type: &str, identifier: &str) {
        self.current += 1;
        if !self.quiet {
            ui::step(
                self.current,
                self.total,
                &format!("{} {}", ui::resource_label(resource_type), identifier.bold()),
            );
        }
    }

    fn on_item_complete(&mut self, result: &ItemResult) {
        if self.quiet {
            return;
        }
        match result.outcome {
            Outcome::NoopDone => ui::dim("already in desired state"),
            Outcome::DryRunReported => ui::dim(&format!(
                "would send {}",
                ui::plural(result.operations.len(), "operation")
            )),
            Outcome::Executed => println!(
                "  {} {}",
                "✓".green(),
                ui::plural(result.operations.len(), "operation")
            ),
        }
    }
}

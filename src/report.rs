//! Report display - per-item changes and before/after diffs

use anyhow::Result;
use colored::Colorize;
use declarative::{ItemResult, Operation, Outcome, Report, Snapshot};

use crate::ui;

/// Pretty JSON for a snapshot, empty when absent
fn snapshot_text(snapshot: &Snapshot) -> String {
    snapshot
        .value()
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .map(|mut text| {
            text.push('\n');
            text
        })
        .unwrap_or_default()
}

/// Line diff of an item's root before and after
pub fn render_item_diff(item: &ItemResult) -> Vec<String> {
    let before = snapshot_text(&item.before);
    let after = snapshot_text(&item.after);
    let diff = similar::TextDiff::from_lines(&before, &after);

    diff.iter_all_changes()
        .filter_map(|change| match change.tag() {
            similar::ChangeTag::Delete => Some(format!("- {change}")),
            similar::ChangeTag::Insert => Some(format!("+ {change}")),
            similar::ChangeTag::Equal => None,
        })
        .map(|line| line.trim_end().to_string())
        .collect()
}

fn operation_line(op: &Operation) -> String {
    if op.is_delete() {
        format!("{} delete {}", "-".red(), op.path)
    } else {
        format!("{} update {}", "+".green(), op.path)
    }
}

/// Display a report in a user-friendly format
pub fn display_report(report: &Report, show_diff: bool) {
    let changed: Vec<&ItemResult> = report.items.iter().filter(|i| i.changed).collect();

    if changed.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    ui::header("Configuration Diff");
    for item in changed {
        let marker = match item.outcome {
            Outcome::Executed => "applied".green(),
            Outcome::DryRunReported => "pending".yellow(),
            Outcome::NoopDone => "unchanged".dimmed(),
        };
        println!(
            "{} {} [{}]",
            ui::resource_label(&item.resource_type).bold(),
            item.identifier,
            marker
        );
        for op in &item.operations {
            println!("    {}", operation_line(op));
        }
        if show_diff {
            for line in render_item_diff(item) {
                let line = if line.starts_with('-') {
                    line.red()
                } else {
                    line.green()
                };
                println!("      {line}");
            }
        }
    }

    let summary = report.summary();
    println!();
    println!(
        "Summary: {} changed, {} pending, {} unchanged, {} sent",
        summary.executed.to_string().green(),
        summary.pending.to_string().yellow(),
        summary.unchanged.to_string().dimmed(),
        ui::plural(summary.operations, "operation")
    );
}

/// Print the report as JSON on stdout
pub fn print_json(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

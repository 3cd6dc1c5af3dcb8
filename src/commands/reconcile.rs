//! `apply` and `diff`: converge a device to a desired-state file

use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use declarative::{Mode, NoProgress, Report};
use jsonrpc::{RequestIdSource, SequentialIds, Transport};
use srlinux::DesiredState;

use crate::Context;
use crate::cli::{ApplyArgs, DeviceArgs, DiffArgs};
use crate::config;
use crate::progress::StepProgress;
use crate::report;
use crate::ui;

/// Run `srlctl apply`
pub fn apply(ctx: &Context, device: &DeviceArgs, args: ApplyArgs) -> Result<()> {
    let tree = config::load_desired_state(&args.file)?;
    let mode = config::resolve_mode(args.state.map(Mode::from), &tree);
    if tree.is_empty() {
        ui::warn("Desired state is empty, nothing to do");
        return Ok(());
    }

    let transport = super::connect(device)?;
    let ids = SequentialIds::new();

    if args.check {
        let report = check(&tree, mode, &transport, &ids)?;
        return finish(ctx, &report, args.json, true);
    }

    if !args.yes {
        let preview = check(&tree, mode, &transport, &ids)?;
        if !args.json {
            report::display_report(&preview, true);
        }
        if !preview.changed {
            return finish(ctx, &preview, args.json, false);
        }
        if !confirm_proceed()? {
            println!();
            println!("  {} Aborted", "✗".red());
            return Ok(());
        }
    }

    let report = execute(ctx, &tree, mode, &transport, &ids)?;
    finish(ctx, &report, args.json, ctx.verbose > 0)
}

/// Run `srlctl diff`
pub fn diff(ctx: &Context, device: &DeviceArgs, args: DiffArgs) -> Result<()> {
    let tree = config::load_desired_state(&args.file)?;
    let mode = config::resolve_mode(args.state.map(Mode::from), &tree);
    let transport = super::connect(device)?;
    let ids = SequentialIds::new();

    let report = check(&tree, mode, &transport, &ids)?;
    finish(ctx, &report, args.json, true)
}

fn check(
    tree: &DesiredState,
    mode: Mode,
    transport: &dyn Transport,
    ids: &dyn RequestIdSource,
) -> Result<Report> {
    srlinux::reconcile_with_progress(tree, mode, true, transport, ids, &mut NoProgress)
        .context("Check failed")
}

fn execute(
    ctx: &Context,
    tree: &DesiredState,
    mode: Mode,
    transport: &dyn Transport,
    ids: &dyn RequestIdSource,
) -> Result<Report> {
    let total = tree.resources(mode).len();
    if !ctx.quiet {
        println!();
        println!(
            "  {} Applying {} in {} mode...",
            "→".cyan(),
            ui::plural(total, "item"),
            mode
        );
    }

    let mut progress = StepProgress::new(total, ctx.quiet);
    srlinux::reconcile_with_progress(tree, mode, false, transport, ids, &mut progress)
        .with_context(|| format!("Stopped at item {} of {}", progress.started(), total))
}

fn finish(ctx: &Context, report: &Report, json: bool, show_diff: bool) -> Result<()> {
    if json {
        return report::print_json(report);
    }
    if show_diff {
        report::display_report(report, true);
    }
    if ctx.quiet {
        return Ok(());
    }

    let summary = report.summary();
    println!();
    if summary.executed > 0 {
        ui::success(&format!("Applied {}", ui::plural(summary.executed, "item")));
    } else if summary.pending > 0 {
        ui::info("Check mode - no changes made");
    } else {
        ui::success("Device already in desired state");
    }
    Ok(())
}

/// Confirm with user
fn confirm_proceed() -> Result<bool> {
    use dialoguer::Confirm;

    let confirmed = Confirm::new()
        .with_prompt("Continue?")
        .default(true)
        .interact()?;

    Ok(confirmed)
}

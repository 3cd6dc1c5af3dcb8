//! Reconciliation driver - runs each item through read, diff and send
//!
//! Per item: `ReadCurrent -> Compile/Diff -> NoopDone | DryRunReported |
//! Executed`. Items run strictly in order and the first error aborts the
//! whole call.

use crate::compiler::Plan;
use crate::context::{ProgressCallback, ReconcileOptions};
use crate::diff::{needs_step, project};
use crate::error::Result;
use crate::executor::BatchExecutor;
use crate::reader::StateReader;
use crate::resource::Resource;
use crate::types::{ItemResult, Operation, Outcome, Report, Snapshot};
use jsonrpc::{RequestIdSource, Transport};
use log::{debug, info};
use std::iter;

/// Reconcile `resources` against the device
///
/// Every resource is compiled before the first RPC is issued, so desired
/// state problems surface without device traffic.
pub fn reconcile<P: ProgressCallback>(
    resources: &[Box<dyn Resource>],
    transport: &dyn Transport,
    ids: &dyn RequestIdSource,
    options: ReconcileOptions,
    progress: &mut P,
) -> Result<Report> {
    let plans = resources
        .iter()
        .map(|r| r.compile(options.mode))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        "compiled {} item(s) in {} mode{}",
        plans.len(),
        options.mode,
        if options.dry_run { " (check)" } else { "" }
    );

    let executor = BatchExecutor::new(transport, ids);
    let mut report = Report::default();
    for plan in &plans {
        progress.on_item_start(plan.resource_type(), plan.identifier());
        let result = run_plan(plan, &executor, options.dry_run)?;
        progress.on_item_complete(&result);
        report.push(result);
    }
    Ok(report)
}

/// Drive one compiled plan to a terminal state
///
/// The root and every step path are read with their own single-path `get`.
pub fn run_plan(plan: &Plan, executor: &BatchExecutor<'_>, dry_run: bool) -> Result<ItemResult> {
    let paths: Vec<_> = iter::once(plan.root().clone())
        .chain(plan.steps().iter().map(|s| s.operation.path.clone()))
        .collect();
    let current = StateReader::new(executor).read_many(&paths)?;
    let before = current.get(plan.root()).cloned().unwrap_or_default();

    let operations: Vec<Operation> = plan
        .steps()
        .iter()
        .filter(|step| {
            let snapshot = current
                .get(&step.operation.path)
                .unwrap_or(&Snapshot::Absent);
            needs_step(step, snapshot)
        })
        .map(|step| step.operation.clone())
        .collect();

    let (outcome, after) = if operations.is_empty() {
        (Outcome::NoopDone, before.clone())
    } else if dry_run {
        (Outcome::DryRunReported, project(&before, plan.root(), &operations))
    } else {
        executor.execute(&operations)?;
        (Outcome::Executed, project(&before, plan.root(), &operations))
    };

    info!(
        "{} {}: {:?} ({} of {} operation(s))",
        plan.resource_type(),
        plan.identifier(),
        outcome,
        operations.len(),
        plan.len()
    );

    Ok(ItemResult {
        identifier: plan.identifier().to_string(),
        resource_type: plan.resource_type().to_string(),
        changed: outcome != Outcome::NoopDone,
        outcome,
        before,
        after,
        operations,
    })
}

//! Diff computation between desired values and current snapshots

use crate::compiler::{Guard, Step};
use crate::path::ResourcePath;
use crate::types::{Operation, Snapshot};
use jsonrpc::Action;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether `desired` is a structural subset of `current`
///
/// Objects match when every desired key matches in `current`; extra keys
/// in `current` are ignored. Arrays must have the same length and match
/// element by element. Scalars compare exactly.
pub fn is_submatch(desired: &Value, current: &Value) -> bool {
    match (desired, current) {
        (Value::Object(want), Value::Object(have)) => want
            .iter()
            .all(|(key, value)| have.get(key).is_some_and(|h| is_submatch(value, h))),
        (Value::Array(want), Value::Array(have)) => {
            want.len() == have.len() && want.iter().zip(have).all(|(w, h)| is_submatch(w, h))
        }
        (want, have) => want == have,
    }
}

/// Whether applying `desired` as an update would change nothing
///
/// An absent resource is never a no-op, not even for an empty document:
/// the update would create it.
pub fn is_noop(desired: &Value, current: &Snapshot) -> bool {
    match current {
        Snapshot::Absent => false,
        Snapshot::Present(value) => is_submatch(desired, value),
    }
}

/// Whether a compiled step still has to be sent given the current state at
/// its path
pub fn needs_step(step: &Step, current: &Snapshot) -> bool {
    let op = &step.operation;
    match (op.action, step.guard) {
        (Action::Delete, _) => current.is_present(),
        (Action::Update, Guard::EnsureExists) => current.is_absent(),
        (Action::Update, Guard::Converge) => match &op.value {
            Some(value) => !is_noop(value, current),
            None => current.is_absent(),
        },
    }
}

/// Expected state at `root` once `operations` are applied on top of `before`
///
/// Only operations addressing `root` itself are considered: updates merge
/// into the snapshot, deletes clear it.
pub fn project(before: &Snapshot, root: &ResourcePath, operations: &[Operation]) -> Snapshot {
    let mut after = before.clone();
    for op in operations.iter().filter(|op| &op.path == root) {
        after = match (op.action, after) {
            (Action::Delete, _) => Snapshot::Absent,
            (Action::Update, Snapshot::Absent) => {
                Snapshot::from(op.value.clone().or(Some(Value::Object(Default::default()))))
            }
            (Action::Update, Snapshot::Present(mut current)) => {
                if let Some(value) = &op.value {
                    merge(&mut current, value);
                }
                Snapshot::Present(current)
            }
        };
    }
    after
}

fn merge(existing: &mut Value, incoming: &Value) {
    match (existing, incoming) {
        (Value::Object(current), Value::Object(update)) => {
            for (key, value) in update {
                match current.get_mut(key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        current.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Upserts that create a resource not present yet
    pub creates: usize,
    /// Upserts that change an existing resource
    pub updates: usize,
    /// Subtree removals
    pub deletes: usize,
}

impl DiffSummary {
    /// Count one surviving operation given the state it was checked against
    pub fn record(&mut self, operation: &Operation, current: &Snapshot) {
        match operation.action {
            Action::Delete => self.deletes += 1,
            Action::Update if current.is_absent() => self.creates += 1,
            Action::Update => self.updates += 1,
        }
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.creates + self.updates + self.deletes
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blue() -> ResourcePath {
        ResourcePath::new("network-instance").with_key("name", "blue")
    }

    fn step(operation: Operation, guard: Guard) -> Step {
        Step { operation, guard }
    }

    #[test]
    fn test_submatch_ignores_extra_current_fields() {
        let desired = json!({"type": "ip-vrf", "admin-state": "enable"});
        let current = json!({"type": "ip-vrf", "admin-state": "enable", "description": "x"});
        assert!(is_submatch(&desired, &current));
        assert!(!is_submatch(&current, &desired));
    }

    #[test]
    fn test_submatch_nested_and_key_order_independent() {
        let desired = json!({"timers": {"hold-time": 90, "connect-retry": 10}});
        let current = json!({"timers": {"connect-retry": 10, "hold-time": 90, "minimum-advertisement-interval": 5}});
        assert!(is_submatch(&desired, &current));
    }

    #[test]
    fn test_submatch_arrays_are_ordered() {
        let desired = json!({"nexthop": [{"index": 0}, {"index": 1}]});
        assert!(is_submatch(&desired, &json!({"nexthop": [{"index": 0}, {"index": 1}]})));
        assert!(!is_submatch(&desired, &json!({"nexthop": [{"index": 1}, {"index": 0}]})));
        assert!(!is_submatch(&desired, &json!({"nexthop": [{"index": 0}]})));
    }

    #[test]
    fn test_scalar_values_compare_exactly() {
        assert!(!is_submatch(&json!(65001), &json!("65001")));
        assert!(!is_submatch(&json!({"peer-as": 65001}), &json!({"peer-as": 65002})));
        assert!(is_submatch(&json!("enable"), &json!("enable")));
    }

    #[test]
    fn test_noop_against_absent_is_false() {
        assert!(!is_noop(&json!({}), &Snapshot::Absent));
        assert!(is_noop(&json!({}), &Snapshot::Present(json!({"a": 1}))));
    }

    #[test]
    fn test_needs_step_by_guard() {
        let present = Snapshot::Present(json!({"type": "ip-vrf"}));

        let update = step(Operation::update(blue(), json!({"type": "ip-vrf"})), Guard::Converge);
        assert!(!needs_step(&update, &present));
        assert!(needs_step(&update, &Snapshot::Absent));

        let prereq = step(Operation::update(blue(), json!({"type": "mac-vrf"})), Guard::EnsureExists);
        assert!(!needs_step(&prereq, &present));
        assert!(needs_step(&prereq, &Snapshot::Absent));

        let delete = step(Operation::delete(blue()), Guard::Converge);
        assert!(needs_step(&delete, &present));
        assert!(!needs_step(&delete, &Snapshot::Absent));
    }

    #[test]
    fn test_project_merges_root_updates_only() {
        let before = Snapshot::Present(json!({"type": "ip-vrf", "description": "old"}));
        let ops = vec![
            Operation::update(blue(), json!({"description": "new"})),
            Operation::update(blue().child("interface").with_key("name", "e1.0"), json!({})),
        ];
        assert_eq!(
            project(&before, &blue(), &ops),
            Snapshot::Present(json!({"type": "ip-vrf", "description": "new"}))
        );
    }

    #[test]
    fn test_project_delete_and_create() {
        let before = Snapshot::Present(json!({"type": "ip-vrf"}));
        assert!(project(&before, &blue(), &[Operation::delete(blue())]).is_absent());

        let created = project(
            &Snapshot::Absent,
            &blue(),
            &[Operation::update(blue(), json!({"type": "ip-vrf"}))],
        );
        assert_eq!(created, Snapshot::Present(json!({"type": "ip-vrf"})));
    }

    #[test]
    fn test_summary_record() {
        let mut summary = DiffSummary::default();
        summary.record(&Operation::update(blue(), json!({})), &Snapshot::Absent);
        summary.record(&Operation::update(blue(), json!({})), &Snapshot::Present(json!({})));
        summary.record(&Operation::delete(blue()), &Snapshot::Present(json!({})));
        assert_eq!(summary.creates, 1);
        assert_eq!(summary.updates, 1);
        assert_eq!(summary.deletes, 1);
        assert!(summary.has_changes());
        assert_eq!(summary.total(), 3);
    }
}

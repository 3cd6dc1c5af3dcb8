//! Core types for declarative reconciliation

use crate::error::Error;
use crate::path::ResourcePath;
use jsonrpc::{Action, Command};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Caller-selected intent for a reconciliation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Merge desired values into existing state
    #[default]
    Merged,
    /// Remove the addressed subtrees
    Deleted,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Merged => write!(f, "merged"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merged" => Ok(Self::Merged),
            "deleted" => Ok(Self::Deleted),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

/// One mutation against the device
///
/// `update` is an upsert; `delete` removes the addressed subtree and never
/// carries a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub action: Action,
    pub path: ResourcePath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Operation {
    /// Upsert `value` at `path`
    pub fn update(path: ResourcePath, value: Value) -> Self {
        Self {
            action: Action::Update,
            path,
            value: Some(value),
        }
    }

    /// Remove the subtree at `path`
    pub fn delete(path: ResourcePath) -> Self {
        Self {
            action: Action::Delete,
            path,
            value: None,
        }
    }

    pub fn is_update(&self) -> bool {
        self.action == Action::Update
    }

    pub fn is_delete(&self) -> bool {
        self.action == Action::Delete
    }

    /// Wire command for a `set` request
    pub fn to_command(&self) -> Command {
        match self.action {
            Action::Update => Command::update(
                self.path.to_string(),
                self.value.clone().unwrap_or(Value::Null),
            ),
            Action::Delete => Command::delete(self.path.to_string()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} {}", self.action, self.path, value),
            None => write!(f, "{} {}", self.action, self.path),
        }
    }
}

/// Current state of one resource as read from the device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    /// Resource does not exist
    #[default]
    Absent,
    /// Resource exists with these attribute values
    Present(Value),
}

impl Snapshot {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Present value, if any
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl From<Option<Value>> for Snapshot {
    fn from(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(value) => Self::Present(value),
        }
    }
}

/// Terminal state of one item's reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Device already matched; nothing to send
    NoopDone,
    /// Check mode; operations were computed but not sent
    DryRunReported,
    /// Operations were sent and accepted
    Executed,
}

/// Result of reconciling one logical item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResult {
    pub identifier: String,
    pub resource_type: String,
    pub changed: bool,
    pub outcome: Outcome,
    pub before: Snapshot,
    pub after: Snapshot,
    /// Operations that survived diff filtering, in send order
    pub operations: Vec<Operation>,
}

impl ItemResult {
    /// Operations actually sent to the device
    pub fn operations_sent(&self) -> &[Operation] {
        match self.outcome {
            Outcome::Executed => &self.operations,
            Outcome::NoopDone | Outcome::DryRunReported => &[],
        }
    }
}

/// Result of a whole reconciliation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub changed: bool,
    pub items: Vec<ItemResult>,
}

impl Report {
    /// Add an item result
    pub fn push(&mut self, item: ItemResult) {
        self.changed |= item.changed;
        self.items.push(item);
    }

    /// Find an item by identifier
    pub fn item(&self, identifier: &str) -> Option<&ItemResult> {
        self.items.iter().find(|i| i.identifier == identifier)
    }

    /// Count outcomes
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for item in &self.items {
            summary.add(item);
        }
        summary
    }
}

/// Summary counts of a reconciliation report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub executed: usize,
    pub pending: usize,
    pub unchanged: usize,
    /// Operations sent, or that would be sent in check mode
    pub operations: usize,
}

impl Summary {
    /// Items that changed or would change
    pub fn total_changes(&self) -> usize {
        self.executed + self.pending
    }

    /// Total number of items processed
    pub fn total(&self) -> usize {
        self.executed + self.pending + self.unchanged
    }

    /// Add an item result to the summary
    pub fn add(&mut self, item: &ItemResult) {
        match item.outcome {
            Outcome::NoopDone => self.unchanged += 1,
            Outcome::DryRunReported => self.pending += 1,
            Outcome::Executed => self.executed += 1,
        }
        self.operations += item.operations.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ni() -> ResourcePath {
        ResourcePath::new("network-instance").with_key("name", "blue")
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("merged".parse::<Mode>().unwrap(), Mode::Merged);
        assert_eq!("deleted".parse::<Mode>().unwrap(), Mode::Deleted);
        let err = "replaced".parse::<Mode>().unwrap_err();
        assert!(matches!(&err, Error::InvalidMode(input) if input == "replaced"));
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "invalid mode 'replaced' (expected merged or deleted)"
        );
        assert_eq!(Mode::default(), Mode::Merged);
    }

    #[test]
    fn test_operation_to_command() {
        let op = Operation::update(ni(), json!({"type": "ip-vrf"}));
        let cmd = serde_json::to_value(op.to_command()).unwrap();
        assert_eq!(
            cmd,
            json!({"action": "update", "path": "/network-instance[name=\"blue\"]", "value": {"type": "ip-vrf"}})
        );

        let del = serde_json::to_value(Operation::delete(ni()).to_command()).unwrap();
        assert_eq!(
            del,
            json!({"action": "delete", "path": "/network-instance[name=\"blue\"]"})
        );
    }

    #[test]
    fn test_snapshot_from_option() {
        assert!(Snapshot::from(None).is_absent());
        assert!(Snapshot::from(Some(Value::Null)).is_absent());
        assert_eq!(
            Snapshot::from(Some(json!({}))),
            Snapshot::Present(json!({}))
        );
    }

    #[test]
    fn test_snapshot_serializes_as_value_or_null() {
        assert_eq!(serde_json::to_value(Snapshot::Absent).unwrap(), Value::Null);
        assert_eq!(
            serde_json::to_value(Snapshot::Present(json!({"a": 1}))).unwrap(),
            json!({"a": 1})
        );
    }

    #[test]
    fn test_operations_sent_only_when_executed() {
        let mut item = ItemResult {
            identifier: "blue".into(),
            resource_type: "network_instance".into(),
            changed: true,
            outcome: Outcome::DryRunReported,
            before: Snapshot::Absent,
            after: Snapshot::Absent,
            operations: vec![Operation::delete(ni())],
        };
        assert!(item.operations_sent().is_empty());
        item.outcome = Outcome::Executed;
        assert_eq!(item.operations_sent().len(), 1);
    }

    #[test]
    fn test_report_changed_and_summary() {
        let mut report = Report::default();
        report.push(ItemResult {
            identifier: "a".into(),
            resource_type: "t".into(),
            changed: false,
            outcome: Outcome::NoopDone,
            before: Snapshot::Absent,
            after: Snapshot::Absent,
            operations: vec![],
        });
        assert!(!report.changed);
        report.push(ItemResult {
            identifier: "b".into(),
            resource_type: "t".into(),
            changed: true,
            outcome: Outcome::Executed,
            before: Snapshot::Absent,
            after: Snapshot::Absent,
            operations: vec![Operation::delete(ni())],
        });
        assert!(report.changed);

        let summary = report.summary();
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.executed, 1);
        assert_eq!(summary.total_changes(), 1);
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.operations, 1);
        assert!(report.item("b").is_some());
    }
}

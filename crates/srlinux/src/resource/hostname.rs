//! System hostname

use declarative::{Error, Mode, Plan, Resource, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::paths;

/// Desired hostname
///
/// The hostname may be omitted when deleting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hostname {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl Hostname {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
        }
    }
}

impl Resource for Hostname {
    fn id(&self) -> String {
        "host-name".to_string()
    }

    fn resource_type(&self) -> &'static str {
        "hostname"
    }

    fn description(&self) -> String {
        match &self.hostname {
            Some(name) => format!("Hostname {}", name),
            None => "Hostname".to_string(),
        }
    }

    fn compile(&self, mode: Mode) -> Result<Plan> {
        let path = paths::host_name();
        let mut plan = Plan::new(self.resource_type(), self.id(), path.clone());

        match mode {
            Mode::Merged => {
                let name = self
                    .hostname
                    .as_deref()
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| Error::validation("hostname", "hostname is required when merging"))?;
                plan.update(path, Value::String(name.to_string()));
            }
            Mode::Deleted => {
                plan.delete(path);
            }
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{NoProgress, ReconcileOptions, Snapshot, reconcile};
    use jsonrpc::{MemoryTransport, Method, SequentialIds};
    use serde_json::json;

    const PATH: &str = "/system/name/host-name";

    #[test]
    fn test_merged_sets_leaf() {
        let plan = Hostname::new("leaf1").compile(Mode::Merged).unwrap();
        let ops = plan.operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].path.to_string(), PATH);
        assert_eq!(ops[0].value, Some(json!("leaf1")));
    }

    #[test]
    fn test_missing_hostname_is_validation_gap() {
        let err = Hostname::default().compile(Mode::Merged).unwrap_err();
        assert!(err.is_validation());
        assert!(Hostname::new("").compile(Mode::Merged).is_err());
    }

    #[test]
    fn test_delete_needs_no_hostname() {
        let plan = Hostname::default().compile(Mode::Deleted).unwrap();
        assert!(plan.operations()[0].is_delete());
    }

    #[test]
    fn test_rename_reports_before_and_after() {
        let device = MemoryTransport::new().with_entry(PATH, json!("srl01"));
        let ids = SequentialIds::new();
        let resources: Vec<Box<dyn Resource>> = vec![Box::new(Hostname::new("leaf1"))];

        let report = reconcile(
            &resources,
            &device,
            &ids,
            ReconcileOptions::default(),
            &mut NoProgress,
        )
        .unwrap();

        let item = &report.items[0];
        assert!(item.changed);
        assert_eq!(item.before, Snapshot::Present(json!("srl01")));
        assert_eq!(item.after, Snapshot::Present(json!("leaf1")));
        assert_eq!(device.entry(PATH), Some(json!("leaf1")));
    }

    #[test]
    fn test_same_hostname_is_unchanged() {
        let device = MemoryTransport::new().with_entry(PATH, json!("leaf1"));
        let ids = SequentialIds::new();
        let resources: Vec<Box<dyn Resource>> = vec![Box::new(Hostname::new("leaf1"))];
        let report = reconcile(
            &resources,
            &device,
            &ids,
            ReconcileOptions::default(),
            &mut NoProgress,
        )
        .unwrap();
        assert!(!report.changed);
        assert!(device.requests_for(Method::Set).is_empty());
    }
}

//! Network-instances (VRFs and bridge tables)

use declarative::{Document, Error, Mode, Plan, Resource, Result};
use serde::{Deserialize, Serialize};

use crate::paths;
use crate::types::{AdminState, InstanceType};

/// A desired network-instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInstance {
    pub name: String,
    /// Required when merging
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<InstanceType>,
    #[serde(default)]
    pub admin_state: AdminState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NetworkInstance {
    pub fn new(name: impl Into<String>, instance_type: InstanceType) -> Self {
        Self {
            name: name.into(),
            instance_type: Some(instance_type),
            admin_state: AdminState::Enable,
            description: None,
        }
    }
}

impl Resource for NetworkInstance {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn resource_type(&self) -> &'static str {
        "network_instance"
    }

    fn description(&self) -> String {
        match self.instance_type {
            Some(t) => format!("Network-instance {} ({})", self.name, t),
            None => format!("Network-instance {}", self.name),
        }
    }

    fn compile(&self, mode: Mode) -> Result<Plan> {
        paths::require_key("network-instance", "name", &self.name)?;
        let root = paths::network_instance(&self.name);
        let mut plan = Plan::new(self.resource_type(), self.id(), root.clone());

        match mode {
            Mode::Merged => {
                let instance_type = self.instance_type.ok_or_else(|| {
                    Error::validation(&self.name, "network-instance type is required when merging")
                })?;
                let value = Document::new()
                    .set("type", instance_type)
                    .set("admin-state", self.admin_state)
                    .set_opt("description", self.description.as_deref())
                    .build()?;
                plan.update(root, value);
            }
            Mode::Deleted => {
                plan.delete(root);
            }
        }
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{NoProgress, Outcome, ReconcileOptions, reconcile};
    use jsonrpc::{MemoryTransport, Method, SequentialIds};
    use serde_json::json;

    const BLUE: &str = "/network-instance[name=\"blue\"]";

    fn run(ni: NetworkInstance, device: &MemoryTransport, mode: Mode) -> declarative::Report {
        let ids = SequentialIds::new();
        let resources: Vec<Box<dyn Resource>> = vec![Box::new(ni)];
        reconcile(
            &resources,
            device,
            &ids,
            ReconcileOptions::new(mode, false),
            &mut NoProgress,
        )
        .unwrap()
    }

    #[test]
    fn test_blue_vrf_compiles_to_one_update() {
        let plan = NetworkInstance::new("blue", InstanceType::IpVrf)
            .compile(Mode::Merged)
            .unwrap();
        let ops = plan.operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].path.to_string(), BLUE);
        assert_eq!(
            ops[0].value,
            Some(json!({"type": "ip-vrf", "admin-state": "enable"}))
        );
    }

    #[test]
    fn test_blue_vrf_created_when_absent() {
        let device = MemoryTransport::new();
        let report = run(NetworkInstance::new("blue", InstanceType::IpVrf), &device, Mode::Merged);
        assert!(report.changed);
        assert_eq!(report.items[0].outcome, Outcome::Executed);
        assert_eq!(
            device.entry(BLUE),
            Some(json!({"type": "ip-vrf", "admin-state": "enable"}))
        );
    }

    #[test]
    fn test_blue_vrf_unchanged_when_matching() {
        let device = MemoryTransport::new()
            .with_entry(BLUE, json!({"type": "ip-vrf", "admin-state": "enable"}));
        let report = run(NetworkInstance::new("blue", InstanceType::IpVrf), &device, Mode::Merged);
        assert!(!report.changed);
        assert!(report.items[0].operations.is_empty());
        assert!(device.requests_for(Method::Set).is_empty());
    }

    #[test]
    fn test_description_included_only_when_set() {
        let mut ni = NetworkInstance::new("red", InstanceType::MacVrf);
        ni.description = Some("bridge red".into());
        ni.admin_state = AdminState::Disable;
        let plan = ni.compile(Mode::Merged).unwrap();
        assert_eq!(
            plan.operations()[0].value,
            Some(json!({"type": "mac-vrf", "admin-state": "disable", "description": "bridge red"}))
        );
    }

    #[test]
    fn test_type_required_when_merging() {
        let ni = NetworkInstance {
            name: "blue".into(),
            instance_type: None,
            admin_state: AdminState::Enable,
            description: None,
        };
        assert!(ni.compile(Mode::Merged).unwrap_err().is_validation());
        assert!(ni.compile(Mode::Deleted).is_ok());
    }

    #[test]
    fn test_empty_name_rejected_in_both_modes() {
        let ni = NetworkInstance::new("", InstanceType::IpVrf);
        assert!(ni.compile(Mode::Merged).unwrap_err().is_validation());
        assert!(ni.compile(Mode::Deleted).unwrap_err().is_validation());
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let device = MemoryTransport::new();
        let report = run(NetworkInstance::new("blue", InstanceType::IpVrf), &device, Mode::Deleted);
        assert!(!report.changed);
        assert!(device.requests_for(Method::Set).is_empty());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let ni: NetworkInstance = serde_json::from_value(json!({"name": "blue", "type": "ip-vrf"})).unwrap();
        assert_eq!(ni, NetworkInstance::new("blue", InstanceType::IpVrf));
    }
}

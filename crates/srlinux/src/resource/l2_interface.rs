//! Bridged (layer 2) interfaces
//!
//! An L2 interface is attached to a mac-vrf through one subinterface per
//! VLAN. Trunks get a single-tagged subinterface per VLAN, indexed by the
//! VLAN id; access ports get one untagged subinterface.

use declarative::{Document, Error, Mode, Plan, Resource, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::defaults::{ACCESS_SUBINTERFACE, L2_INSTANCE_TYPE};
use crate::paths;
use crate::types::AdminState;

/// A desired L2 interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2Interface {
    pub name: String,
    /// mac-vrf the subinterfaces are attached to; created when missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_instance: Option<String>,
    #[serde(default)]
    pub admin_state: AdminState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trunk_vlans: Vec<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_vlan: Option<u16>,
}

/// Encapsulation of one bridged subinterface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encap {
    SingleTagged(u16),
    Untagged,
}

impl L2Interface {
    pub fn new(name: impl Into<String>, network_instance: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            network_instance: Some(network_instance.into()),
            admin_state: AdminState::Enable,
            description: None,
            trunk_vlans: Vec::new(),
            access_vlan: None,
        }
    }

    fn instance(&self) -> Result<&str> {
        self.network_instance
            .as_deref()
            .filter(|ni| !ni.trim().is_empty())
            .ok_or_else(|| Error::validation(&self.name, "network_instance is required"))
    }

    /// Subinterfaces implied by the VLAN settings, as `(index, encap)`
    fn subinterfaces(&self) -> Result<Vec<(u32, Encap)>> {
        match (self.trunk_vlans.is_empty(), self.access_vlan) {
            (false, Some(_)) => Err(Error::validation(
                &self.name,
                "trunk_vlans and access_vlan are mutually exclusive",
            )),
            (false, None) => Ok(self
                .trunk_vlans
                .iter()
                .map(|vlan| (u32::from(*vlan), Encap::SingleTagged(*vlan)))
                .collect()),
            (true, Some(_)) => Ok(vec![(ACCESS_SUBINTERFACE, Encap::Untagged)]),
            (true, None) => Ok(Vec::new()),
        }
    }

    fn subinterface_name(&self, index: u32) -> String {
        format!("{}.{}", self.name, index)
    }
}

fn subinterface_value(encap: Encap) -> Result<serde_json::Value> {
    let encap = match encap {
        Encap::SingleTagged(vlan) => json!({"single-tagged": {"vlan-id": vlan}}),
        Encap::Untagged => json!({"untagged": {}}),
    };
    Document::new()
        .set("type", "bridged")
        .set("vlan", json!({"encap": encap}))
        .build()
}

impl Resource for L2Interface {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn resource_type(&self) -> &'static str {
        "l2_interface"
    }

    fn compile(&self, mode: Mode) -> Result<Plan> {
        paths::require_key("l2-interface", "name", &self.name)?;
        let instance = self.instance()?;
        let subinterfaces = self.subinterfaces()?;
        let root = paths::interface(&self.name);
        let mut plan = Plan::new(self.resource_type(), self.id(), root.clone());

        match mode {
            Mode::Merged => {
                plan.prerequisite(
                    paths::network_instance(instance),
                    json!({"type": L2_INSTANCE_TYPE}),
                );

                let value = Document::new()
                    .set("admin-state", self.admin_state)
                    .set_opt("description", self.description.as_deref())
                    .set_opt("vlan-tagging", (!subinterfaces.is_empty()).then_some(true))
                    .build()?;
                plan.update(root, value);

                for (index, encap) in &subinterfaces {
                    plan.update(
                        paths::subinterface(&self.name, *index),
                        subinterface_value(*encap)?,
                    );
                }
                for (index, _) in &subinterfaces {
                    plan.update(
                        paths::instance_interface(instance, &self.subinterface_name(*index)),
                        json!({}),
                    );
                }
            }
            Mode::Deleted => {
                for (index, _) in &subinterfaces {
                    plan.delete(paths::instance_interface(
                        instance,
                        &self.subinterface_name(*index),
                    ));
                }
                plan.delete(root);
            }
        }
        Ok(plan)
    }
}

//! Routed (layer 3) interfaces
//!
//! A name of the form `BASE.INDEX` addresses a subinterface; a plain name
//! addresses the interface itself.

use declarative::{Document, Error, Mode, Plan, Resource, ResourcePath, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::defaults::L3_INSTANCE_TYPE;
use crate::paths;
use crate::types::AdminState;

/// A desired L3 interface or subinterface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L3Interface {
    /// `ethernet-1/1` or `ethernet-1/1.100`
    pub name: String,
    /// ip-vrf the interface is attached to; created when missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_instance: Option<String>,
    #[serde(default)]
    pub admin_state: AdminState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Address in prefix form, e.g. `10.0.0.1/31`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
}

/// Parsed interface name
#[derive(Debug, Clone, PartialEq, Eq)]
struct InterfaceName<'a> {
    base: &'a str,
    index: Option<u32>,
}

impl L3Interface {
    pub fn new(name: impl Into<String>, network_instance: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            network_instance: Some(network_instance.into()),
            admin_state: AdminState::Enable,
            description: None,
            ipv4_address: None,
        }
    }

    fn instance(&self) -> Result<&str> {
        self.network_instance
            .as_deref()
            .filter(|ni| !ni.trim().is_empty())
            .ok_or_else(|| Error::validation(&self.name, "network_instance is required"))
    }

    fn parse_name(&self) -> Result<InterfaceName<'_>> {
        match self.name.split_once('.') {
            None => Ok(InterfaceName {
                base: &self.name,
                index: None,
            }),
            Some((base, index)) => {
                let index = index.parse::<u32>().map_err(|_| {
                    Error::validation(
                        &self.name,
                        format!("subinterface index '{}' is not an integer", index),
                    )
                })?;
                if base.is_empty() {
                    return Err(Error::validation(&self.name, "interface name is empty"));
                }
                Ok(InterfaceName {
                    base,
                    index: Some(index),
                })
            }
        }
    }

    /// Path holding the item's own configuration
    fn root(name: &InterfaceName<'_>) -> ResourcePath {
        match name.index {
            Some(index) => paths::subinterface(name.base, index),
            None => paths::interface(name.base),
        }
    }
}

impl Resource for L3Interface {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn resource_type(&self) -> &'static str {
        "l3_interface"
    }

    fn compile(&self, mode: Mode) -> Result<Plan> {
        paths::require_key("l3-interface", "name", &self.name)?;
        let instance = self.instance()?;
        let name = self.parse_name()?;
        let root = Self::root(&name);
        let attachment = paths::instance_interface(instance, &self.name);
        let address = self
            .ipv4_address
            .as_deref()
            .map(|prefix| paths::ipv4_address(&root, prefix));
        let mut plan = Plan::new(self.resource_type(), self.id(), root.clone());

        match mode {
            Mode::Merged => {
                plan.prerequisite(
                    paths::network_instance(instance),
                    json!({"type": L3_INSTANCE_TYPE}),
                );

                let parent = Document::new().set("admin-state", self.admin_state);
                match name.index {
                    Some(_) => {
                        plan.update(paths::interface(name.base), parent.build()?);
                        let value = Document::new()
                            .set("admin-state", self.admin_state)
                            .set_opt("description", self.description.as_deref())
                            .set("ipv4", json!({"admin-state": AdminState::Enable}))
                            .build()?;
                        plan.update(root, value);
                    }
                    None => {
                        let value = parent
                            .set_opt("description", self.description.as_deref())
                            .build()?;
                        plan.update(root, value);
                    }
                }

                if let Some(address) = address {
                    plan.update(address, json!({}));
                }
                plan.update(attachment, json!({}));
            }
            Mode::Deleted => {
                plan.delete(attachment);
                match (name.index, address) {
                    (Some(_), _) => {
                        plan.delete(root);
                    }
                    (None, Some(address)) => {
                        plan.delete(address);
                    }
                    (None, None) => {}
                }
            }
        }
        Ok(plan)
    }
}

//! OSPFv2 instance, areas and area interfaces

use declarative::{Document, Error, Mode, Plan, Resource, ResourcePath, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::defaults::{OSPF_AUTH_TYPE, OSPF_INSTANCE, OSPF_VERSION};
use crate::paths;
use crate::types::AdminState;

/// OSPFv2 configuration of one network-instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ospf {
    pub network_instance: String,
    #[serde(default)]
    pub admin_state: AdminState,
    /// Required when merging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_bandwidth: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_metric: Option<MaxMetric>,
    /// Timer name to value; underscores in names become dashes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub spf_timers: BTreeMap<String, Value>,
    /// Timer name to value; underscores in names become dashes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub lsa_timers: BTreeMap<String, Value>,
    /// Sent as given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graceful_restart: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub areas: Vec<Area>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxMetric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_startup: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_lsa: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Dotted-quad area id, e.g. `0.0.0.0`
    pub area_id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub area_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub range: Vec<AreaRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<AreaInterface>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRange {
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advertise: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaInterface {
    /// Subinterface name, e.g. `ethernet-1/1.0`
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<AdminState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hello_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// Copy `timers` with `snake_case` names turned into `kebab-case`
fn kebab_keys(timers: &BTreeMap<String, Value>) -> Option<Value> {
    if timers.is_empty() {
        return None;
    }
    let map: Map<String, Value> = timers
        .iter()
        .map(|(name, value)| (name.replace('_', "-"), value.clone()))
        .collect();
    Some(Value::Object(map))
}

impl Ospf {
    fn instance_value(&self) -> Result<Value> {
        let router_id = self.router_id.as_deref().ok_or_else(|| {
            Error::validation(
                format!("ospf {}", self.network_instance),
                "router_id is required when merging",
            )
        })?;

        let max_metric = self
            .max_metric
            .as_ref()
            .map(|mm| {
                Document::new()
                    .set_opt("on-startup", mm.on_startup)
                    .set_opt("router-lsa", mm.router_lsa)
            })
            .unwrap_or_default();

        Document::new()
            .set("admin-state", self.admin_state)
            .set("router-id", router_id)
            .set("version", OSPF_VERSION)
            .set_opt("reference-bandwidth", self.reference_bandwidth)
            .set_doc("max-metric", max_metric)
            .set_opt("spf-timers", kebab_keys(&self.spf_timers))
            .set_opt("lsa-timers", kebab_keys(&self.lsa_timers))
            .set_opt("graceful-restart", self.graceful_restart.as_ref())
            .set_opt("export-policy", self.export_policy.as_deref())
            .build()
    }
}

impl Area {
    fn value(&self) -> Result<Value> {
        let ranges = self
            .range
            .iter()
            .map(|r| {
                Document::new()
                    .set("prefix", &r.prefix)
                    .set_opt("advertise", r.advertise)
                    .build()
            })
            .collect::<Result<Vec<_>>>()?;
        Document::new()
            .set_opt("type", self.area_type.as_deref())
            .set_opt("range", (!ranges.is_empty()).then_some(ranges))
            .build()
    }
}

impl AreaInterface {
    fn value(&self) -> Result<Value> {
        let authentication = self
            .authentication
            .as_ref()
            .map(|auth| {
                Document::new()
                    .set("type", auth.auth_type.as_deref().unwrap_or(OSPF_AUTH_TYPE))
                    .set_opt("key-id", auth.key_id)
                    .set_opt("key", auth.key.as_deref())
            })
            .unwrap_or_default();
        Document::new()
            .set_opt("admin-state", self.admin_state)
            .set_opt("cost", self.cost)
            .set_opt("priority", self.priority)
            .set_opt("hello-interval", self.hello_interval)
            .set_opt("dead-interval", self.dead_interval)
            .set_opt("network-type", self.network_type.as_deref())
            .set_opt("passive", self.passive)
            .set_doc("authentication", authentication)
            .build()
    }
}

fn instance_path(network_instance: &str) -> ResourcePath {
    paths::protocol(network_instance, "ospf")
        .child("instance")
        .with_key("name", OSPF_INSTANCE)
}

impl Resource for Ospf {
    fn id(&self) -> String {
        self.network_instance.clone()
    }

    fn resource_type(&self) -> &'static str {
        "ospf"
    }

    fn compile(&self, mode: Mode) -> Result<Plan> {
        let item = format!("ospf {}", self.network_instance);
        paths::require_key(&item, "network_instance", &self.network_instance)?;
        let root = instance_path(&self.network_instance);
        let mut plan = Plan::new(self.resource_type(), self.id(), root.clone());

        if mode == Mode::Deleted {
            plan.delete(root);
            return Ok(plan);
        }

        plan.update(root.clone(), self.instance_value()?);
        for area in &self.areas {
            paths::require_key(&item, "area_id", &area.area_id)?;
            let area_path = root.join("area").with_key("area-id", &area.area_id);
            plan.update(area_path.clone(), area.value()?);
            for iface in &area.interfaces {
                paths::require_key(&item, "interface name", &iface.name)?;
                plan.update(
                    area_path
                        .join("interface")
                        .with_key("interface-name", &iface.name),
                    iface.value()?,
                );
            }
        }
        Ok(plan)
    }
}

//! BGP instance, peer groups and neighbors
//!
//! The whole BGP configuration of one network-instance is a single item.
//! Groups come before neighbors so a neighbor's `peer-group` exists by the
//! time it is referenced.

use declarative::{Document, Error, Mode, Plan, Resource, ResourcePath, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::defaults::afi_safi_or_default;
use crate::paths;
use crate::types::{AdminState, AfiSafi};

/// BGP configuration of one network-instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bgp {
    pub network_instance: String,
    #[serde(default)]
    pub admin_state: AdminState,
    /// Required when merging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_id: Option<String>,
    /// Required when merging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autonomous_system: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "afi-safi")]
    pub afi_safi: Vec<AfiSafi>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<BgpGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub neighbors: Vec<BgpNeighbor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpGroup {
    #[serde(alias = "group-name")]
    pub group_name: String,
    #[serde(default, alias = "admin-state")]
    pub admin_state: AdminState,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "peer-as")]
    pub peer_as: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "export-policy")]
    pub export_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "import-policy")]
    pub import_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "afi-safi")]
    pub afi_safi: Vec<AfiSafi>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpNeighbor {
    #[serde(alias = "peer-address")]
    pub peer_address: String,
    #[serde(default, alias = "admin-state")]
    pub admin_state: AdminState,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "peer-group")]
    pub peer_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "peer-as")]
    pub peer_as: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", alias = "afi-safi")]
    pub afi_safi: Vec<AfiSafi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timers: Option<NeighborTimers>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborTimers {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "hold-time")]
    pub hold_time: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "keepalive-interval"
    )]
    pub keepalive_interval: Option<u32>,
}

impl Bgp {
    pub fn new(network_instance: impl Into<String>, router_id: impl Into<String>, autonomous_system: u32) -> Self {
        Self {
            network_instance: network_instance.into(),
            admin_state: AdminState::Enable,
            router_id: Some(router_id.into()),
            autonomous_system: Some(autonomous_system),
            afi_safi: Vec::new(),
            groups: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    fn global_value(&self) -> Result<Value> {
        let router_id = self
            .router_id
            .as_deref()
            .ok_or_else(|| self.gap("router_id is required when merging"))?;
        let autonomous_system = self
            .autonomous_system
            .ok_or_else(|| self.gap("autonomous_system is required when merging"))?;
        Document::new()
            .set("admin-state", self.admin_state)
            .set("router-id", router_id)
            .set("autonomous-system", autonomous_system)
            .build()
    }

    fn gap(&self, message: &str) -> Error {
        Error::validation(format!("bgp {}", self.network_instance), message)
    }
}

fn add_afi_safi(
    plan: &mut Plan,
    item: &str,
    parent: &ResourcePath,
    configured: &[AfiSafi],
) -> Result<()> {
    for family in afi_safi_or_default(configured).iter() {
        paths::require_key(item, "afi_safi_name", &family.afi_safi_name)?;
        plan.update(
            paths::afi_safi_admin_state(parent, &family.afi_safi_name),
            Value::String(family.admin_state.to_string()),
        );
    }
    Ok(())
}

impl BgpGroup {
    fn value(&self) -> Result<Value> {
        Document::new()
            .set("admin-state", self.admin_state)
            .set_opt("peer-as", self.peer_as)
            .set_opt("description", self.description.as_deref())
            .set_opt("export-policy", self.export_policy.as_deref())
            .set_opt("import-policy", self.import_policy.as_deref())
            .build()
    }
}

impl BgpNeighbor {
    fn value(&self) -> Result<Value> {
        Document::new()
            .set("admin-state", self.admin_state)
            .set_opt("peer-group", self.peer_group.as_deref())
            .set_opt("peer-as", self.peer_as)
            .set_opt("description", self.description.as_deref())
            .build()
    }

    fn timers(&self) -> Option<Document> {
        let timers = self.timers.as_ref()?;
        let doc = Document::new()
            .set_opt("hold-time", timers.hold_time)
            .set_opt("keepalive-interval", timers.keepalive_interval);
        (!doc.is_empty()).then_some(doc)
    }
}

impl Resource for Bgp {
    fn id(&self) -> String {
        self.network_instance.clone()
    }

    fn resource_type(&self) -> &'static str {
        "bgp"
    }

    fn description(&self) -> String {
        match self.autonomous_system {
            Some(asn) => format!("BGP AS {} in {}", asn, self.network_instance),
            None => format!("BGP in {}", self.network_instance),
        }
    }

    fn compile(&self, mode: Mode) -> Result<Plan> {
        let item = format!("bgp {}", self.network_instance);
        paths::require_key(&item, "network_instance", &self.network_instance)?;
        let root = paths::protocol(&self.network_instance, "bgp");
        let mut plan = Plan::new(self.resource_type(), self.id(), root.clone());

        if mode == Mode::Deleted {
            plan.delete(root);
            return Ok(plan);
        }

        plan.update(root.clone(), self.global_value()?);
        add_afi_safi(&mut plan, &item, &root, &self.afi_safi)?;

        for group in &self.groups {
            paths::require_key(&item, "group_name", &group.group_name)?;
            let path = root
                .join("group")
                .with_key("group-name", &group.group_name);
            plan.update(path.clone(), group.value()?);
            add_afi_safi(&mut plan, &item, &path, &group.afi_safi)?;
        }

        for neighbor in &self.neighbors {
            paths::require_key(&item, "peer_address", &neighbor.peer_address)?;
            let path = root
                .join("neighbor")
                .with_key("peer-address", &neighbor.peer_address);
            plan.update(path.clone(), neighbor.value()?);
            add_afi_safi(&mut plan, &item, &path, &neighbor.afi_safi)?;
            if let Some(timers) = neighbor.timers() {
                plan.update(path.join("timers"), timers.build()?);
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

    const ROOT: &str = "/network-instance[name=\"default\"]/protocols/bgp";

    fn neighbor(address: &str) -> BgpNeighbor {
        BgpNeighbor {
            peer_address: address.into(),
            admin_state: AdminState::Enable,
            peer_group: Some("spine".into()),
            peer_as: None,
            description: None,
            afi_safi: Vec::new(),
            timers: None,
        }
    }

    fn group() -> BgpGroup {
        BgpGroup {
            group_name: "spine".into(),
            admin_state: AdminState::Enable,
            peer_as: Some(65100),
            description: None,
            export_policy: Some("export-lo".into()),
            import_policy: None,
            afi_safi: vec![AfiSafi::new("ipv4-unicast", AdminState::Enable)],
        }
    }

    fn paths_of(plan: &Plan) -> Vec<String> {
        plan.operations().iter().map(|o| o.path.to_string()).collect()
    }

    #[test]
    fn test_neighbor_without_afi_safi_gets_default() {
        let mut bgp = Bgp::new("default", "10.0.0.1", 65001);
        bgp.neighbors.push(neighbor("10.0.0.2"));
        let plan = bgp.compile(Mode::Merged).unwrap();
        let ops = plan.operations();

        let default_af = format!(
            "{ROOT}/neighbor[peer-address=\"10.0.0.2\"]/afi-safi[afi-safi-name=ipv4-unicast]/admin-state"
        );
        let op = ops
            .iter()
            .find(|o| o.path.to_string() == default_af)
            .expect("default afi-safi operation");
        assert!(op.is_update());
        assert_eq!(op.value, Some(json!("enable")));
    }

    #[test]
    fn test_operation_order() {
        let mut bgp = Bgp::new("default", "10.0.0.1", 65001);
        bgp.groups.push(group());
        let mut peer = neighbor("10.0.0.2");
        peer.timers = Some(NeighborTimers {
            hold_time: Some(9),
            keepalive_interval: Some(3),
        });
        bgp.neighbors.push(peer);

        let plan = bgp.compile(Mode::Merged).unwrap();
        assert_eq!(
            paths_of(&plan),
            vec![
                ROOT.to_string(),
                format!("{ROOT}/afi-safi[afi-safi-name=ipv4-unicast]/admin-state"),
                format!("{ROOT}/group[group-name=\"spine\"]"),
                format!("{ROOT}/group[group-name=\"spine\"]/afi-safi[afi-safi-name=ipv4-unicast]/admin-state"),
                format!("{ROOT}/neighbor[peer-address=\"10.0.0.2\"]"),
                format!("{ROOT}/neighbor[peer-address=\"10.0.0.2\"]/afi-safi[afi-safi-name=ipv4-unicast]/admin-state"),
                format!("{ROOT}/neighbor[peer-address=\"10.0.0.2\"]/timers"),
            ]
        );
        assert!(plan.respects_containment());

        let ops = plan.operations();
        assert_eq!(
            ops[0].value,
            Some(json!({"admin-state": "enable", "router-id": "10.0.0.1", "autonomous-system": 65001}))
        );
        assert_eq!(
            ops[2].value,
            Some(json!({"admin-state": "enable", "peer-as": 65100, "export-policy": "export-lo"}))
        );
        assert_eq!(ops[6].value, Some(json!({"hold-time": 9, "keepalive-interval": 3})));
    }

    #[test]
    fn test_configured_families_replace_default() {
        let mut bgp = Bgp::new("default", "10.0.0.1", 65001);
        bgp.afi_safi = vec![
            AfiSafi::new("evpn", AdminState::Enable),
            AfiSafi::new("ipv4-unicast", AdminState::Disable),
        ];
        let ops = bgp.compile(Mode::Merged).unwrap().operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(
            ops[1].path.to_string(),
            format!("{ROOT}/afi-safi[afi-safi-name=evpn]/admin-state")
        );
        assert_eq!(ops[2].value, Some(json!("disable")));
    }

    #[test]
    fn test_empty_timers_are_skipped() {
        let mut bgp = Bgp::new("default", "10.0.0.1", 65001);
        let mut peer = neighbor("10.0.0.2");
        peer.timers = Some(NeighborTimers::default());
        bgp.neighbors.push(peer);
        let paths = paths_of(&bgp.compile(Mode::Merged).unwrap());
        assert!(paths.iter().all(|p| !p.ends_with("/timers")));
    }

    #[test]
    fn test_missing_router_id_is_validation_gap() {
        let mut bgp = Bgp::new("default", "10.0.0.1", 65001);
        bgp.router_id = None;
        assert!(bgp.compile(Mode::Merged).unwrap_err().is_validation());
        bgp.autonomous_system = None;
        let plan = bgp.compile(Mode::Deleted).unwrap();
        assert_eq!(paths_of(&plan), vec![ROOT.to_string()]);
    }

    #[test]
    fn test_blank_keys_are_validation_gaps() {
        assert!(Bgp::new("", "10.0.0.1", 65001).compile(Mode::Deleted).unwrap_err().is_validation());

        let mut bgp = Bgp::new("default", "10.0.0.1", 65001);
        bgp.neighbors.push(neighbor(""));
        let err = bgp.compile(Mode::Merged).unwrap_err();
        assert!(err.to_string().contains("peer_address must not be empty"));

        let mut bgp = Bgp::new("default", "10.0.0.1", 65001);
        let mut unnamed = group();
        unnamed.group_name = " ".into();
        bgp.groups.push(unnamed);
        assert!(bgp.compile(Mode::Merged).unwrap_err().is_validation());

        let mut bgp = Bgp::new("default", "10.0.0.1", 65001);
        bgp.afi_safi.push(AfiSafi::new("", AdminState::Enable));
        assert!(bgp.compile(Mode::Merged).unwrap_err().is_validation());
    }

    #[test]
    fn test_deserialize_original_field_spellings() {
        let bgp: Bgp = serde_json::from_value(json!({
            "network_instance": "default",
            "router_id": "10.0.0.1",
            "autonomous_system": 65001,
            "groups": [{"group-name": "spine", "peer-as": 65100, "export-policy": "export-lo"}],
            "neighbors": [{"peer-address": "10.0.0.2", "peer-group": "spine",
                           "timers": {"hold-time": 9}}]
        }))
        .unwrap();
        assert_eq!(bgp.groups[0].peer_as, Some(65100));
        assert_eq!(bgp.neighbors[0].timers.as_ref().unwrap().hold_time, Some(9));
    }

    #[test]
    fn test_reconcile_then_noop() {
        let mut bgp = Bgp::new("default", "10.0.0.1", 65001);
        bgp.groups.push(group());
        bgp.neighbors.push(neighbor("10.0.0.2"));

        let device = MemoryTransport::new();
        let ids = SequentialIds::new();
        let resources: Vec<Box<dyn Resource>> = vec![Box::new(bgp)];

        let first = reconcile(&resources, &device, &ids, ReconcileOptions::default(), &mut NoProgress).unwrap();
        assert!(first.changed);
        assert_eq!(
            first.items[0].after,
            Snapshot::Present(json!({"admin-state": "enable", "router-id": "10.0.0.1", "autonomous-system": 65001}))
        );

        let second = reconcile(&resources, &device, &ids, ReconcileOptions::default(), &mut NoProgress).unwrap();
        assert!(!second.changed);
        assert_eq!(device.requests_for(Method::Set).len(), 1);
    }
}

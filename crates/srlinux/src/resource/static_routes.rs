//! Static routes and next-hop-groups
//!
//! Each next-hop-group and each route is its own item. Groups are merged
//! before the routes that reference them and deleted after them.

use declarative::{BoxedResource, Document, KeyValue, Mode, Plan, Resource, ResourcePath, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::paths;
use crate::types::AdminState;

/// Static routing for one network-instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRoutes {
    pub network_instance: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_hop_groups: Vec<NextHopGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextHopGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<AdminState>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nexthops: Vec<NextHop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextHop {
    pub index: u32,
    pub ip_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Destination, e.g. `10.10.0.0/16`
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<AdminState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_hop_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blackhole: Option<bool>,
}

impl StaticRoutes {
    /// Items in processing order for `mode`
    pub fn resources(&self, mode: Mode) -> Vec<BoxedResource> {
        let groups = self.next_hop_groups.iter().map(|group| {
            Box::new(NextHopGroupItem {
                network_instance: self.network_instance.clone(),
                group: group.clone(),
            }) as BoxedResource
        });
        let routes = self.routes.iter().map(|route| {
            Box::new(RouteItem {
                network_instance: self.network_instance.clone(),
                route: route.clone(),
            }) as BoxedResource
        });

        match mode {
            Mode::Merged => groups.chain(routes).collect(),
            Mode::Deleted => routes.chain(groups).collect(),
        }
    }
}

/// `/network-instance[name="NI"]/next-hop-groups/group[name="NAME"]`
fn group_path(instance: &str, name: &str) -> ResourcePath {
    paths::network_instance(instance)
        .child("next-hop-groups")
        .child("group")
        .with_key("name", name)
}

/// `/network-instance[name="NI"]/static-routes/route[prefix=PREFIX]`
fn route_path(instance: &str, prefix: &str) -> ResourcePath {
    paths::network_instance(instance)
        .child("static-routes")
        .child("route")
        .with_key("prefix", KeyValue::bare(prefix))
}

#[derive(Debug, Clone)]
pub struct NextHopGroupItem {
    network_instance: String,
    group: NextHopGroup,
}

impl NextHopGroupItem {
    fn value(&self) -> Result<Value> {
        let nexthops: Vec<Value> = self
            .group
            .nexthops
            .iter()
            .map(|nh| json!({"index": nh.index, "ip-address": nh.ip_address}))
            .collect();
        Document::new()
            .set_opt("admin-state", self.group.admin_state)
            .set_opt("nexthop", (!nexthops.is_empty()).then_some(nexthops))
            .build()
    }
}

impl Resource for NextHopGroupItem {
    fn id(&self) -> String {
        format!("{}/{}", self.network_instance, self.group.name)
    }

    fn resource_type(&self) -> &'static str {
        "next_hop_group"
    }

    fn compile(&self, mode: Mode) -> Result<Plan> {
        let item = format!("next-hop-group {}", self.id());
        paths::require_key(&item, "network_instance", &self.network_instance)?;
        paths::require_key(&item, "name", &self.group.name)?;
        let root = group_path(&self.network_instance, &self.group.name);
        let mut plan = Plan::new(self.resource_type(), self.id(), root.clone());
        match mode {
            Mode::Merged => plan.update(root, self.value()?),
            Mode::Deleted => plan.delete(root),
        };
        Ok(plan)
    }
}

#[derive(Debug, Clone)]
pub struct RouteItem {
    network_instance: String,
    route: Route,
}

impl RouteItem {
    fn value(&self) -> Result<Value> {
        let route = &self.route;
        Document::new()
            .set_opt("admin-state", route.admin_state)
            .set_opt("metric", route.metric)
            .set_opt("preference", route.preference)
            .set_opt("next-hop-group", route.next_hop_group.as_deref())
            .set_opt("description", route.description.as_deref())
            .set_opt("blackhole", route.blackhole)
            .build()
    }
}

impl Resource for RouteItem {
    fn id(&self) -> String {
        format!("{}/{}", self.network_instance, self.route.prefix)
    }

    fn resource_type(&self) -> &'static str {
        "static_route"
    }

    fn compile(&self, mode: Mode) -> Result<Plan> {
        let item = format!("static route {}", self.id());
        paths::require_key(&item, "network_instance", &self.network_instance)?;
        paths::require_key(&item, "prefix", &self.route.prefix)?;
        let root = route_path(&self.network_instance, &self.route.prefix);
        let mut plan = Plan::new(self.resource_type(), self.id(), root.clone());
        match mode {
            Mode::Merged => plan.update(root, self.value()?),
            Mode::Deleted => plan.delete(root),
        };
        Ok(plan)
    }
}

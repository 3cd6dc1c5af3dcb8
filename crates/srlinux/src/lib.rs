//! # srlinux
//!
//! Desired-state compilers for Nokia SR Linux on top of the
//! [`declarative`] engine.
//!
//! A [`DesiredState`] tree groups every domain this crate knows about.
//! [`reconcile`] turns it into items, in dependency order, and drives them
//! against a device through any [`jsonrpc::Transport`].
//!
//! ## Example
//!
//! ```
//! use declarative::Mode;
//! use jsonrpc::{MemoryTransport, SequentialIds};
//! use srlinux::{DesiredState, reconcile};
//!
//! let tree: DesiredState = serde_json::from_value(serde_json::json!({
//!     "network_instances": [{"name": "blue", "type": "ip-vrf"}]
//! }))
//! .unwrap();
//!
//! let device = MemoryTransport::new();
//! let ids = SequentialIds::new();
//! let report = reconcile(&tree, Mode::Merged, false, &device, &ids)?;
//! assert!(report.changed);
//! # Ok::<(), declarative::Error>(())
//! ```

pub mod defaults;
pub mod paths;
pub mod resource;
pub mod types;

use declarative::{
    BoxedResource, Mode, NoProgress, ProgressCallback, ReconcileOptions, Report, Result,
};
use jsonrpc::{RequestIdSource, Transport};
use serde::{Deserialize, Serialize};

use crate::resource::{
    Bgp, Hostname, L2Interface, L3Interface, NetworkInstance, Ospf, RoutingPolicy, StaticRoutes,
};

pub use types::{AdminState, AfiSafi, InstanceType};

/// Everything a caller wants configured on one device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesiredState {
    /// Mode recorded in the desired-state file, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<Hostname>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub network_instances: Vec<NetworkInstance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub l2_interfaces: Vec<L2Interface>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub l3_interfaces: Vec<L3Interface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_policy: Option<RoutingPolicy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_routes: Vec<StaticRoutes>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bgp: Vec<Bgp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ospf: Vec<Ospf>,
}

/// Configuration domains in dependency order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Domain {
    Hostname,
    NetworkInstances,
    L2Interfaces,
    L3Interfaces,
    RoutingPolicy,
    StaticRoutes,
    Bgp,
    Ospf,
}

const MERGE_ORDER: [Domain; 8] = [
    Domain::Hostname,
    Domain::NetworkInstances,
    Domain::L2Interfaces,
    Domain::L3Interfaces,
    Domain::RoutingPolicy,
    Domain::StaticRoutes,
    Domain::Bgp,
    Domain::Ospf,
];

fn boxed<R: declarative::Resource + Clone + 'static>(items: &[R]) -> Vec<BoxedResource> {
    items
        .iter()
        .map(|item| Box::new(item.clone()) as BoxedResource)
        .collect()
}

impl DesiredState {
    /// Whether the tree configures nothing
    pub fn is_empty(&self) -> bool {
        self.hostname.is_none()
            && self.network_instances.is_empty()
            && self.l2_interfaces.is_empty()
            && self.l3_interfaces.is_empty()
            && self.routing_policy.is_none()
            && self.static_routes.is_empty()
            && self.bgp.is_empty()
            && self.ospf.is_empty()
    }

    /// Items in processing order for `mode`
    ///
    /// Domains are visited so that whatever an item references is merged
    /// before it, and deleted after it. Items within a domain keep the
    /// order they were given in.
    pub fn resources(&self, mode: Mode) -> Vec<BoxedResource> {
        let mut domains = MERGE_ORDER.to_vec();
        if mode == Mode::Deleted {
            domains.reverse();
        }
        domains
            .into_iter()
            .flat_map(|domain| self.domain_resources(domain, mode))
            .collect()
    }

    fn domain_resources(&self, domain: Domain, mode: Mode) -> Vec<BoxedResource> {
        match domain {
            Domain::Hostname => self
                .hostname
                .iter()
                .map(|h| Box::new(h.clone()) as BoxedResource)
                .collect(),
            Domain::NetworkInstances => boxed(&self.network_instances),
            Domain::L2Interfaces => boxed(&self.l2_interfaces),
            Domain::L3Interfaces => boxed(&self.l3_interfaces),
            Domain::RoutingPolicy => self
                .routing_policy
                .as_ref()
                .map(|policy| policy.resources(mode))
                .unwrap_or_default(),
            Domain::StaticRoutes => self
                .static_routes
                .iter()
                .flat_map(|routes| routes.resources(mode))
                .collect(),
            Domain::Bgp => boxed(&self.bgp),
            Domain::Ospf => boxed(&self.ospf),
        }
    }
}

/// Reconcile `tree` against the device behind `transport`
pub fn reconcile(
    tree: &DesiredState,
    mode: Mode,
    dry_run: bool,
    transport: &dyn Transport,
    ids: &dyn RequestIdSource,
) -> Result<Report> {
    reconcile_with_progress(tree, mode, dry_run, transport, ids, &mut NoProgress)
}

/// [`reconcile`] with per-item progress reporting
pub fn reconcile_with_progress<P: ProgressCallback>(
    tree: &DesiredState,
    mode: Mode,
    dry_run: bool,
    transport: &dyn Transport,
    ids: &dyn RequestIdSource,
    progress: &mut P,
) -> Result<Report> {
    let resources = tree.resources(mode);
    log::info!(
        "reconciling {} item(s) in {} mode{}",
        resources.len(),
        mode,
        if dry_run { " (check)" } else { "" }
    );
    declarative::reconcile(
        &resources,
        transport,
        ids,
        ReconcileOptions::new(mode, dry_run),
        progress,
    )
}

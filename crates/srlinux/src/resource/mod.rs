//! Desired-state items, one module per configuration domain
//!
//! Each type here implements [`declarative::Resource`]: it compiles itself
//! into the ordered operations for merged or deleted mode.

pub mod bgp;
pub mod hostname;
pub mod l2_interface;
pub mod l3_interface;
pub mod network_instance;
pub mod ospf;
pub mod routing_policy;
pub mod static_routes;

pub use bgp::{Bgp, BgpGroup, BgpNeighbor, NeighborTimers};
pub use hostname::Hostname;
pub use l2_interface::L2Interface;
pub use l3_interface::L3Interface;
pub use network_instance::NetworkInstance;
pub use ospf::{Area, AreaInterface, AreaRange, Authentication, MaxMetric, Ospf};
pub use routing_policy::{
    Policy, PolicyResult, Prefix, PrefixSet, RoutingPolicy, Statement, StatementAction,
    StatementMatch,
};
pub use static_routes::{NextHop, NextHopGroup, Route, StaticRoutes};

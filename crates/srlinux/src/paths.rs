//! Resource paths of the SR Linux configuration tree
//!
//! Names and descriptions are quoted keys; indexes are numeric. Routing
//! policy names, static-route prefixes and address families are rendered
//! bare, the way the device's CLI prints them.

use declarative::{Error, KeyValue, ResourcePath, Result};

/// Fail with a validation gap when an identifying key is blank
///
/// Blank keys would render as `name=""` or, for bare keys, `name=`.
pub fn require_key(item: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(item, format!("{field} must not be empty")));
    }
    Ok(())
}

/// `/system/name/host-name`
pub fn host_name() -> ResourcePath {
    ResourcePath::new("system").child("name").child("host-name")
}

/// `/network-instance[name="NAME"]`
pub fn network_instance(name: &str) -> ResourcePath {
    ResourcePath::new("network-instance").with_key("name", name)
}

/// `/network-instance[name="NI"]/interface[name="NAME"]`
pub fn instance_interface(instance: &str, name: &str) -> ResourcePath {
    network_instance(instance)
        .child("interface")
        .with_key("name", name)
}

/// `/interface[name="NAME"]`
pub fn interface(name: &str) -> ResourcePath {
    ResourcePath::new("interface").with_key("name", name)
}

/// `/interface[name="NAME"]/subinterface[index=INDEX]`
pub fn subinterface(name: &str, index: u32) -> ResourcePath {
    interface(name).child("subinterface").with_key("index", index)
}

/// `.../ipv4/address[ip-prefix="PREFIX"]` under `parent`
pub fn ipv4_address(parent: &ResourcePath, prefix: &str) -> ResourcePath {
    parent
        .join("ipv4")
        .child("address")
        .with_key("ip-prefix", prefix)
}

/// `/network-instance[name="NI"]/protocols/PROTOCOL`
pub fn protocol(instance: &str, protocol: &str) -> ResourcePath {
    network_instance(instance).child("protocols").child(protocol)
}

/// `.../afi-safi[afi-safi-name=NAME]/admin-state` under `parent`
pub fn afi_safi_admin_state(parent: &ResourcePath, name: &str) -> ResourcePath {
    parent
        .join("afi-safi")
        .with_key("afi-safi-name", KeyValue::bare(name))
        .child("admin-state")
}

/// `/routing-policy/prefix-set[name=NAME]`
pub fn prefix_set(name: &str) -> ResourcePath {
    ResourcePath::new("routing-policy")
        .child("prefix-set")
        .with_key("name", KeyValue::bare(name))
}

/// `/routing-policy/policy[name=NAME]`
pub fn policy(name: &str) -> ResourcePath {
    ResourcePath::new("routing-policy")
        .child("policy")
        .with_key("name", KeyValue::bare(name))
}

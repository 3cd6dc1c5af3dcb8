//! Device defaults the compilers synthesize
//!
//! SR Linux enables some objects implicitly. Emitting them explicitly keeps
//! the no-op check meaningful: a neighbor with no address families would
//! otherwise never match what the device reports.

use crate::types::{AdminState, AfiSafi, InstanceType};
use std::borrow::Cow;

/// Address families assumed when a BGP instance, group or neighbor lists none
pub const DEFAULT_AFI_SAFI: &[(&str, AdminState)] = &[("ipv4-unicast", AdminState::Enable)];

/// Name of the OSPF instance inside a network-instance
pub const OSPF_INSTANCE: &str = "1";

/// OSPF protocol version
pub const OSPF_VERSION: &str = "ospf-v2";

/// Authentication type for OSPF interfaces that give none
pub const OSPF_AUTH_TYPE: &str = "none";

/// Network-instance created when an L2 interface's bridge table is missing
pub const L2_INSTANCE_TYPE: InstanceType = InstanceType::MacVrf;

/// Network-instance created when an L3 interface's VRF is missing
pub const L3_INSTANCE_TYPE: InstanceType = InstanceType::IpVrf;

/// Subinterface index of an untagged access port
pub const ACCESS_SUBINTERFACE: u32 = 0;

/// `configured`, or the default address families when it is empty
pub fn afi_safi_or_default(configured: &[AfiSafi]) -> Cow<'_, [AfiSafi]> {
    if configured.is_empty() {
        Cow::Owned(
            DEFAULT_AFI_SAFI
                .iter()
                .map(|(name, state)| AfiSafi::new(*name, *state))
                .collect(),
        )
    } else {
        Cow::Borrowed(configured)
    }
}

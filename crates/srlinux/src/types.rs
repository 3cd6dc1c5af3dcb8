//! Value types shared by several domains

use serde::{Deserialize, Serialize};
use std::fmt;

/// Administrative state of a configurable object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    #[default]
    Enable,
    Disable,
}

impl fmt::Display for AdminState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enable => write!(f, "enable"),
            Self::Disable => write!(f, "disable"),
        }
    }
}

/// One address-family entry of a BGP instance, group or neighbor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfiSafi {
    #[serde(alias = "afi-safi-name")]
    pub afi_safi_name: String,
    #[serde(default, alias = "admin-state")]
    pub admin_state: AdminState,
}

impl AfiSafi {
    pub fn new(name: impl Into<String>, admin_state: AdminState) -> Self {
        Self {
            afi_safi_name: name.into(),
            admin_state,
        }
    }
}

/// Network-instance flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceType {
    /// The default routing instance
    Default,
    /// Layer 3 VRF
    IpVrf,
    /// Layer 2 bridge table
    MacVrf,
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::IpVrf => write!(f, "ip-vrf"),
            Self::MacVrf => write!(f, "mac-vrf"),
        }
    }
}

//! Resource trait for declarative state management
//!
//! A Resource is one logical desired item (a network-instance, an
//! interface, a BGP instance). It knows how to compile itself into a
//! [`Plan`]; reading, diffing and sending are left to the driver.

use crate::compiler::Plan;
use crate::error::Result;
use crate::types::Mode;
use std::fmt;

/// Core trait for declarative resources
///
/// # Example
///
/// ```
/// use declarative::{Document, Mode, Plan, Resource, ResourcePath, Result};
///
/// #[derive(Debug)]
/// struct Vrf {
///     name: String,
/// }
///
/// impl Resource for Vrf {
///     fn id(&self) -> String {
///         self.name.clone()
///     }
///
///     fn resource_type(&self) -> &'static str {
///         "network_instance"
///     }
///
///     fn compile(&self, mode: Mode) -> Result<Plan> {
///         let root = ResourcePath::new("network-instance").with_key("name", &self.name);
///         let mut plan = Plan::new(self.resource_type(), self.id(), root.clone());
///         match mode {
///             Mode::Merged => plan.update(root, Document::new().set("type", "ip-vrf").build()?),
///             Mode::Deleted => plan.delete(root),
///         };
///         Ok(plan)
///     }
/// }
///
/// let plan = Vrf { name: "blue".into() }.compile(Mode::Merged).unwrap();
/// assert_eq!(plan.len(), 1);
/// ```
pub trait Resource: Send + Sync + fmt::Debug {
    /// Identifier of this item, unique within its type
    ///
    /// Examples:
    /// - "blue" for a network-instance
    /// - "ethernet-1/1.100" for an L3 subinterface
    /// - "default" for the BGP instance of the default network-instance
    fn id(&self) -> String;

    /// Resource type category, used for grouping in reports
    fn resource_type(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> String {
        format!("{} {}", self.resource_type(), self.id())
    }

    /// Compile the desired item into ordered operations for `mode`
    ///
    /// Must not touch the device. Desired-state problems that schema
    /// validation cannot catch are reported as
    /// [`Error::ValidationGap`](crate::Error::ValidationGap).
    fn compile(&self, mode: Mode) -> Result<Plan>;
}

/// A boxed resource for type-erased storage
pub type BoxedResource = Box<dyn Resource>;

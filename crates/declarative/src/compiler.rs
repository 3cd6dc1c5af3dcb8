//! Plan building for desired-state compilers
//!
//! A domain compiler turns one desired item into a [`Plan`]: the ordered
//! steps that would bring the device to the desired state if nothing were
//! configured yet. The driver later drops the steps that are already
//! satisfied.
//!
//! Value documents are built with [`Document`], which keeps key ordering
//! deterministic and treats absent optional fields as "not specified".

use crate::error::Result;
use crate::path::ResourcePath;
use crate::types::Operation;
use serde::Serialize;
use serde_json::{Map, Value};

/// When a step may be skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Skip when the current value already matches (updates), or when the
    /// resource is already absent (deletes)
    Converge,
    /// Prerequisite: skip when the resource exists at all, whatever its value
    EnsureExists,
}

/// One compiled operation and its skip rule
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub operation: Operation,
    pub guard: Guard,
}

/// Ordered operations for one logical item
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    resource_type: &'static str,
    identifier: String,
    root: ResourcePath,
    steps: Vec<Step>,
    prerequisites: usize,
}

impl Plan {
    /// Create an empty plan for the item rooted at `root`
    pub fn new(
        resource_type: &'static str,
        identifier: impl Into<String>,
        root: ResourcePath,
    ) -> Self {
        Self {
            resource_type,
            identifier: identifier.into(),
            root,
            steps: Vec::new(),
            prerequisites: 0,
        }
    }

    /// Add a prerequisite resource that must exist before anything else in
    /// the plan is applied
    ///
    /// Prerequisites are always placed ahead of regular steps, in the order
    /// they were declared.
    pub fn prerequisite(&mut self, path: ResourcePath, value: Value) -> &mut Self {
        let step = Step {
            operation: Operation::update(path, value),
            guard: Guard::EnsureExists,
        };
        self.steps.insert(self.prerequisites, step);
        self.prerequisites += 1;
        self
    }

    /// Append an upsert
    pub fn update(&mut self, path: ResourcePath, value: Value) -> &mut Self {
        self.steps.push(Step {
            operation: Operation::update(path, value),
            guard: Guard::Converge,
        });
        self
    }

    /// Append a subtree removal
    pub fn delete(&mut self, path: ResourcePath) -> &mut Self {
        self.steps.push(Step {
            operation: Operation::delete(path),
            guard: Guard::Converge,
        });
        self
    }

    pub fn resource_type(&self) -> &'static str {
        self.resource_type
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Path whose snapshot represents the item's before/after state
    pub fn root(&self) -> &ResourcePath {
        &self.root
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Compiled operations in order, before diff filtering
    pub fn operations(&self) -> Vec<Operation> {
        self.steps.iter().map(|s| s.operation.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether no update targets a resource before an update of one of its
    /// containers
    ///
    /// Deletes are not checked: removing a dependent before its container
    /// is the expected order.
    pub fn respects_containment(&self) -> bool {
        let updates: Vec<&ResourcePath> = self
            .steps
            .iter()
            .filter(|s| s.operation.is_update())
            .map(|s| &s.operation.path)
            .collect();

        updates.iter().enumerate().all(|(i, earlier)| {
            updates[i + 1..]
                .iter()
                .all(|later| !later.is_ancestor_of(earlier))
        })
    }
}

/// Builder for an update value document
///
/// # Example
///
/// ```
/// use declarative::Document;
/// use serde_json::json;
///
/// let description: Option<String> = None;
/// let value = Document::new()
///     .set("type", "ip-vrf")
///     .set("admin-state", "enable")
///     .set_opt("description", description)
///     .build()?;
///
/// assert_eq!(value, json!({"type": "ip-vrf", "admin-state": "enable"}));
/// # Ok::<(), declarative::Error>(())
/// ```
///
/// The first field that fails to serialize is kept and reported by
/// [`Document::build`].
#[derive(Debug, Default)]
pub struct Document {
    fields: Map<String, Value>,
    error: Option<serde_json::Error>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`
    pub fn set(mut self, key: &str, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.fields.insert(key.to_string(), value);
            }
            Err(err) => self.fail(err),
        }
        self
    }

    /// Set `key` only when a value was supplied
    pub fn set_opt<T: Serialize>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    /// Set `key` to a nested document, unless that document is empty
    pub fn set_doc(mut self, key: &str, doc: Document) -> Self {
        if let Some(err) = doc.error {
            self.fail(err);
        } else if !doc.fields.is_empty() {
            self.fields.insert(key.to_string(), Value::Object(doc.fields));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finish the document, failing if any field could not be serialized
    pub fn build(self) -> Result<Value> {
        match self.error {
            Some(err) => Err(err.into()),
            None => Ok(Value::Object(self.fields)),
        }
    }

    fn fail(&mut self, err: serde_json::Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn bgp() -> ResourcePath {
        ResourcePath::new("network-instance")
            .with_key("name", "default")
            .child("protocols")
            .child("bgp")
    }

    #[test]
    fn test_prerequisites_stay_in_front() {
        let ni = ResourcePath::new("network-instance").with_key("name", "mac1");
        let iface = ResourcePath::new("interface").with_key("name", "ethernet-1/1");

        let mut plan = Plan::new("l2_interface", "ethernet-1/1", iface.clone());
        plan.update(iface.clone(), json!({"admin-state": "enable"}));
        plan.prerequisite(ni.clone(), json!({"type": "mac-vrf"}));
        plan.update(ni.join("interface").with_key("name", "ethernet-1/1.0"), json!({}));

        let ops = plan.operations();
        assert_eq!(ops[0].path, ni);
        assert_eq!(plan.steps()[0].guard, Guard::EnsureExists);
        assert_eq!(ops[1].path, iface);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_multiple_prerequisites_keep_declaration_order() {
        let mut plan = Plan::new("t", "x", ResourcePath::new("x"));
        plan.update(ResourcePath::new("x"), json!({}));
        plan.prerequisite(ResourcePath::new("a"), json!({}));
        plan.prerequisite(ResourcePath::new("b"), json!({}));
        let names: Vec<String> = plan.operations().iter().map(|o| o.path.to_string()).collect();
        assert_eq!(names, vec!["/a", "/b", "/x"]);
    }

    #[test]
    fn test_respects_containment() {
        let mut good = Plan::new("bgp", "default", bgp());
        good.update(bgp(), json!({}));
        good.update(bgp().child("group").with_key("group-name", "g"), json!({}));
        assert!(good.respects_containment());

        let mut bad = Plan::new("bgp", "default", bgp());
        bad.update(bgp().child("group").with_key("group-name", "g"), json!({}));
        bad.update(bgp(), json!({}));
        assert!(!bad.respects_containment());
    }

    #[test]
    fn test_deletes_ignored_by_containment_check() {
        let mut plan = Plan::new("bgp", "default", bgp());
        plan.delete(bgp().child("group").with_key("group-name", "g"));
        plan.delete(bgp());
        assert!(plan.respects_containment());
    }

    #[test]
    fn test_document_skips_absent_and_empty() {
        let timers = Document::new().set_opt::<u32>("hold-time", None);
        let value = Document::new()
            .set("admin-state", "enable")
            .set_opt("peer-as", Some(65001u32))
            .set_opt::<String>("description", None)
            .set_doc("timers", timers)
            .build()
            .unwrap();
        assert_eq!(value, json!({"admin-state": "enable", "peer-as": 65001}));
    }

    #[test]
    fn test_document_nested() {
        let value = Document::new()
            .set_doc("max-metric", Document::new().set("on-startup", true))
            .build()
            .unwrap();
        assert_eq!(value, json!({"max-metric": {"on-startup": true}}));
    }

    #[test]
    fn test_unserializable_field_fails_build() {
        let tuple_keys: BTreeMap<(u8, u8), u8> = BTreeMap::from([((1, 2), 3)]);
        let err = Document::new()
            .set("admin-state", "enable")
            .set("weights", &tuple_keys)
            .build()
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Serialization(_)));

        let nested = Document::new().set("weights", &tuple_keys);
        let err = Document::new().set_doc("timers", nested).build().unwrap_err();
        assert!(matches!(err, crate::error::Error::Serialization(_)));
    }
}

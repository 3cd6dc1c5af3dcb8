//! Routing policy: prefix-sets and policies

use declarative::{BoxedResource, Document, KeyValue, Mode, Plan, Resource, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::paths;

/// Prefix-sets and policies under `/routing-policy`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefix_sets: Vec<PrefixSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<Policy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixSet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefixes: Vec<Prefix>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefix {
    pub ip_prefix: String,
    /// `exact` or `LOW..HIGH`
    pub mask_length_range: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_action: Option<PolicyResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub name: String,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_: Option<StatementMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<StatementAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_set: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_result: Option<PolicyResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyResult {
    Accept,
    Reject,
}

impl RoutingPolicy {
    /// Items in processing order for `mode`
    ///
    /// Prefix-sets are merged before the policies that match on them and
    /// deleted after them.
    pub fn resources(&self, mode: Mode) -> Vec<BoxedResource> {
        let sets = self
            .prefix_sets
            .iter()
            .map(|set| Box::new(set.clone()) as BoxedResource);
        let policies = self
            .policies
            .iter()
            .map(|policy| Box::new(policy.clone()) as BoxedResource);

        match mode {
            Mode::Merged => sets.chain(policies).collect(),
            Mode::Deleted => policies.chain(sets).collect(),
        }
    }
}

impl Resource for PrefixSet {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn resource_type(&self) -> &'static str {
        "prefix_set"
    }

    fn compile(&self, mode: Mode) -> Result<Plan> {
        let item = format!("prefix-set {}", self.name);
        paths::require_key(&item, "name", &self.name)?;
        let root = paths::prefix_set(&self.name);
        let mut plan = Plan::new(self.resource_type(), self.id(), root.clone());

        match mode {
            Mode::Merged => {
                plan.update(root.clone(), json!({}));
                for prefix in &self.prefixes {
                    paths::require_key(&item, "ip_prefix", &prefix.ip_prefix)?;
                    paths::require_key(&item, "mask_length_range", &prefix.mask_length_range)?;
                    let path = root
                        .join("prefix")
                        .with_key("ip-prefix", KeyValue::bare(&prefix.ip_prefix))
                        .with_key("mask-length-range", KeyValue::bare(&prefix.mask_length_range));
                    plan.update(path, json!({}));
                }
            }
            Mode::Deleted => {
                plan.delete(root);
            }
        }
        Ok(plan)
    }
}

impl Resource for Policy {
    fn id(&self) -> String {
        self.name.clone()
    }

    fn resource_type(&self) -> &'static str {
        "policy"
    }

    fn compile(&self, mode: Mode) -> Result<Plan> {
        let item = format!("policy {}", self.name);
        paths::require_key(&item, "name", &self.name)?;
        let root = paths::policy(&self.name);
        let mut plan = Plan::new(self.resource_type(), self.id(), root.clone());

        match mode {
            Mode::Merged => {
                let default_action = self
                    .default_action
                    .map(|result| json!({"policy-result": result}));
                plan.update(
                    root.clone(),
                    Document::new()
                        .set_opt("default-action", default_action)
                        .build()?,
                );

                for statement in &self.statements {
                    paths::require_key(&item, "statement name", &statement.name)?;
                    let matches = Document::new().set_opt(
                        "prefix-set",
                        statement.match_.as_ref().and_then(|m| m.prefix_set.as_deref()),
                    );
                    let action = Document::new().set_opt(
                        "policy-result",
                        statement.action.as_ref().and_then(|a| a.policy_result),
                    );
                    let value = Document::new()
                        .set_doc("match", matches)
                        .set_doc("action", action)
                        .build()?;
                    let path = root
                        .join("statement")
                        .with_key("name", KeyValue::bare(&statement.name));
                    plan.update(path, value);
                }
            }
            Mode::Deleted => {
                plan.delete(root);
            }
        }
        Ok(plan)
    }
}

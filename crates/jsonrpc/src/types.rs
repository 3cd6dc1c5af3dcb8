//! JSON-RPC 2.0 envelope types.
//!
//! The device API exposes two methods, `get` and `set`, both taking a list
//! of commands addressed by resource path strings.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Protocol version carried in every request envelope.
pub const JSON_RPC_VERSION: &str = "2.0";

/// RPC method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Read one or more paths.
    Get,
    /// Apply an ordered list of mutations.
    Set,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Set => write!(f, "set"),
        }
    }
}

/// Mutation kind for `set` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Create-or-merge the addressed resource.
    Update,
    /// Remove the addressed subtree.
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A single command inside `params.commands`.
///
/// `get` commands carry only a path; `set` commands carry an action and,
/// for updates, a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Command {
    /// A read command for `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            action: None,
            path: path.into(),
            value: None,
        }
    }

    /// An upsert of `value` at `path`.
    pub fn update(path: impl Into<String>, value: Value) -> Self {
        Self {
            action: Some(Action::Update),
            path: path.into(),
            value: Some(value),
        }
    }

    /// Removal of the subtree at `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            action: Some(Action::Delete),
            path: path.into(),
            value: None,
        }
    }
}

/// Parameters of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub commands: Vec<Command>,
}

/// A JSON-RPC request envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub method: Method,
    pub params: Params,
    pub id: u64,
}

impl Request {
    /// Build a request with the current protocol version.
    pub fn new(method: Method, commands: Vec<Command>, id: u64) -> Self {
        Self {
            jsonrpc: JSON_RPC_VERSION.to_string(),
            method,
            params: Params { commands },
            id,
        }
    }

    /// Serialize to the wire payload.
    pub fn to_payload(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Encode(e.to_string()))
    }
}

/// A JSON-RPC response envelope.
///
/// `null` and missing `result`/`error` fields both deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl Response {
    /// Successful response carrying `result`.
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            jsonrpc: Some(JSON_RPC_VERSION.to_string()),
            id: Some(id),
            result: Some(result),
            error: None,
        }
    }

    /// Failed response carrying the device's error payload.
    pub fn failure(id: u64, error: Value) -> Self {
        Self {
            jsonrpc: Some(JSON_RPC_VERSION.to_string()),
            id: Some(id),
            result: None,
            error: Some(error),
        }
    }

    /// Interpret a parsed response document.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidResponse(format!(
                "expected a JSON object envelope, got {}",
                value
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Whether the device reported an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

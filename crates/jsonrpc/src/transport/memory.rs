//! In-memory device simulator.
//!
//! Keeps configuration keyed by resource path string and answers `get` and
//! `set` the way the device does: updates merge into what is stored,
//! deletes remove the addressed path and everything beneath it.

use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::{Action, Method, Request, Response};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Shape of the `result` field in `get` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultShape {
    /// `{"<path>": {"value": ...}}`
    #[default]
    Document,
    /// `[{"<path>": {"value": ...}}]`
    Sequence,
    /// One element per command, in command order, `{}` where nothing is
    /// configured: `[{"<a>": {"value": ...}}, {}]`
    PerCommand,
}

#[derive(Debug, Default)]
struct DeviceState {
    config: BTreeMap<String, Value>,
    requests: Vec<Request>,
    reject_next_set: Option<Value>,
}

/// A stateful fake device.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<DeviceState>>,
    shape: ResultShape,
}

impl MemoryTransport {
    /// Create an empty device.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `shape` for `get` results.
    #[must_use]
    pub fn with_shape(mut self, shape: ResultShape) -> Self {
        self.shape = shape;
        self
    }

    /// Seed the device with `value` at `path`.
    #[must_use]
    pub fn with_entry(self, path: impl Into<String>, value: Value) -> Self {
        self.insert(path, value);
        self
    }

    /// Store `value` at `path`, replacing anything there.
    pub fn insert(&self, path: impl Into<String>, value: Value) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).config.insert(path.into(), value);
    }

    /// Stored value at `path`.
    pub fn entry(&self, path: &str) -> Option<Value> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).config.get(path).cloned()
    }

    /// Number of stored paths.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).config.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make the next `set` fail with `error` without applying anything.
    pub fn reject_next_set(&self, error: Value) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).reject_next_set = Some(error);
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).requests.clone()
    }

    /// Requests received for `method`.
    pub fn requests_for(&self, method: Method) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    fn answer_get(&self, state: &DeviceState, request: &Request) -> Value {
        let per_command: Vec<Map<String, Value>> = request
            .params
            .commands
            .iter()
            .map(|command| {
                let mut found = Map::new();
                if let Some(value) = state.config.get(&command.path) {
                    let mut entry = Map::new();
                    entry.insert("value".to_string(), value.clone());
                    found.insert(command.path.clone(), Value::Object(entry));
                }
                found
            })
            .collect();

        if self.shape == ResultShape::PerCommand {
            return Value::Array(per_command.into_iter().map(Value::Object).collect());
        }
        let found: Map<String, Value> = per_command.into_iter().flatten().collect();
        match self.shape {
            ResultShape::Sequence if found.is_empty() => Value::Array(Vec::new()),
            ResultShape::Sequence => Value::Array(vec![Value::Object(found)]),
            _ => Value::Object(found),
        }
    }
}

impl Transport for MemoryTransport {
    fn post(&self, payload: &str) -> Result<Value> {
        let request: Request =
            serde_json::from_str(payload).map_err(|e| Error::Encode(e.to_string()))?;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.requests.push(request.clone());

        let response = match request.method {
            Method::Get => Response::success(request.id, self.answer_get(&state, &request)),
            Method::Set => {
                if let Some(error) = state.reject_next_set.take() {
                    Response::failure(request.id, error)
                } else {
                    for command in &request.params.commands {
                        match command.action {
                            Some(Action::Update) => {
                                let value = command.value.clone().unwrap_or(Value::Null);
                                match state.config.get_mut(&command.path) {
                                    Some(existing) => merge(existing, value),
                                    None => {
                                        state.config.insert(command.path.clone(), value);
                                    }
                                }
                            }
                            Some(Action::Delete) => {
                                let prefix = format!("{}/", command.path);
                                state.config.retain(|path, _| {
                                    path != &command.path && !path.starts_with(&prefix)
                                });
                            }
                            None => {
                                return Err(Error::Encode(format!(
                                    "set command for {} has no action",
                                    command.path
                                )));
                            }
                        }
                    }
                    Response::success(request.id, Value::Object(Map::new()))
                }
            }
        };
        Ok(serde_json::to_value(response)?)
    }
}

/// Merge `incoming` into `existing`: objects merge key by key, anything
/// else is replaced.
fn merge(existing: &mut Value, incoming: Value) {
    match (existing, incoming) {
        (Value::Object(current), Value::Object(update)) => {
            for (key, value) in update {
                match current.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        current.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

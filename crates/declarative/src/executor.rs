//! RPC batch executor - wraps operations in JSON-RPC envelopes

use crate::error::{Error, Result};
use crate::path::ResourcePath;
use crate::types::Operation;
use jsonrpc::{Command, Method, Request, RequestIdSource, Response, Transport};
use log::{debug, warn};
use serde_json::Value;

/// Sends `get` and `set` requests through a transport
///
/// Each call draws one fresh identifier from the id source. A non-null
/// `error` in the response fails the call with [`Error::DeviceRejected`];
/// nothing is retried.
pub struct BatchExecutor<'a> {
    transport: &'a dyn Transport,
    ids: &'a dyn RequestIdSource,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(transport: &'a dyn Transport, ids: &'a dyn RequestIdSource) -> Self {
        Self { transport, ids }
    }

    /// Send all `operations` as one `set` request, in order
    ///
    /// Returns the response `result`. An empty batch sends nothing.
    pub fn execute(&self, operations: &[Operation]) -> Result<Value> {
        if operations.is_empty() {
            return Ok(Value::Null);
        }
        let commands = operations.iter().map(Operation::to_command).collect();
        self.call(Method::Set, commands)
    }

    /// Read `paths` with one `get` request
    pub fn query(&self, paths: &[ResourcePath]) -> Result<Value> {
        let commands = paths.iter().map(|p| Command::get(p.to_string())).collect();
        self.call(Method::Get, commands)
    }

    fn call(&self, method: Method, commands: Vec<Command>) -> Result<Value> {
        let id = self.ids.next_id();
        let request = Request::new(method, commands, id);
        debug!(
            "{} request {} with {} command(s)",
            method,
            id,
            request.params.commands.len()
        );

        let payload = request.to_payload()?;
        let response = Response::from_value(self.transport.post(&payload)?)?;

        if response.id.is_some_and(|got| got != id) {
            warn!(
                "response id {:?} does not match request {}",
                response.id, id
            );
        }

        match response.error {
            Some(error) if !error.is_null() => {
                debug!("{} request {} rejected: {}", method, id, error);
                Err(Error::DeviceRejected {
                    method,
                    request_id: id,
                    error,
                })
            }
            _ => Ok(response.result.unwrap_or(Value::Null)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpc::{Action, MockTransport, SequentialIds};
    use serde_json::json;

    fn ni(name: &str) -> ResourcePath {
        ResourcePath::new("network-instance").with_key("name", name)
    }

    #[test]
    fn test_execute_sends_one_set_in_order() {
        let mock = MockTransport::new();
        mock.respond_result(json!({}));
        let ids = SequentialIds::new();
        let executor = BatchExecutor::new(&mock, &ids);

        let ops = vec![
            Operation::update(ni("mac1"), json!({"type": "mac-vrf"})),
            Operation::update(ni("mac1").child("interface").with_key("name", "ethernet-1/1.0"), json!({})),
            Operation::delete(ni("old")),
        ];
        executor.execute(&ops).unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Set);
        let commands = &requests[0].params.commands;
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].path, "/network-instance[name=\"mac1\"]");
        assert_eq!(commands[2].action, Some(Action::Delete));
        assert_eq!(commands[2].value, None);
    }

    #[test]
    fn test_empty_batch_sends_nothing() {
        let mock = MockTransport::new();
        let ids = SequentialIds::new();
        BatchExecutor::new(&mock, &ids).execute(&[]).unwrap();
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_device_error_is_rejection() {
        let mock = MockTransport::new();
        mock.respond_error(json!({"code": -32000, "message": "Schema validation failed"}));
        let ids = SequentialIds::starting_at(40);
        let err = BatchExecutor::new(&mock, &ids)
            .execute(&[Operation::delete(ni("blue"))])
            .unwrap_err();

        match err {
            Error::DeviceRejected {
                method,
                request_id,
                error,
            } => {
                assert_eq!(method, Method::Set);
                assert_eq!(request_id, 40);
                assert_eq!(error["code"], -32000);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_error_field_is_success() {
        let mock = MockTransport::new();
        mock.respond_raw(json!({"jsonrpc": "2.0", "id": 1, "result": {"a": 1}, "error": null}));
        let ids = SequentialIds::new();
        let result = BatchExecutor::new(&mock, &ids).query(&[ni("blue")]).unwrap();
        assert_eq!(result, json!({"a": 1}));
    }

    #[test]
    fn test_transport_failure_propagates() {
        let mock = MockTransport::new();
        mock.fail_with("connection refused");
        let ids = SequentialIds::new();
        let err = BatchExecutor::new(&mock, &ids).query(&[ni("blue")]).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn test_ids_are_distinct_across_calls() {
        let mock = MockTransport::new();
        mock.respond_result(json!({}));
        mock.respond_result(json!({}));
        let ids = SequentialIds::new();
        let executor = BatchExecutor::new(&mock, &ids);
        executor.query(&[ni("a")]).unwrap();
        executor.execute(&[Operation::delete(ni("a"))]).unwrap();

        let requests = mock.requests();
        assert_ne!(requests[0].id, requests[1].id);
        assert!(requests[1].id > requests[0].id);
    }

    #[test]
    fn test_query_uses_get_without_action() {
        let mock = MockTransport::new();
        mock.respond_result(json!({}));
        let ids = SequentialIds::new();
        BatchExecutor::new(&mock, &ids)
            .query(&[ni("a"), ni("b")])
            .unwrap();
        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.params.commands.len(), 2);
        assert!(request.params.commands.iter().all(|c| c.action.is_none()));
    }
}

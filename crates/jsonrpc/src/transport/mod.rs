//! Transport trait and implementations for posting JSON-RPC payloads.
//!
//! [`http::HttpTransport`] talks to a real device. [`MockTransport`] and
//! [`memory::MemoryTransport`] stand in for a device in tests.
//!
//! # Testing
//!
//! ```
//! use jsonrpc::transport::{MockTransport, Transport};
//! use serde_json::json;
//!
//! let mock = MockTransport::new();
//! mock.respond_result(json!({"/system/name/host-name": {"value": "srl01"}}));
//!
//! let payload = r#"{"jsonrpc":"2.0","method":"get","params":{"commands":[{"path":"/system/name/host-name"}]},"id":1}"#;
//! let response = mock.post(payload).unwrap();
//! assert_eq!(response["id"], 1);
//! assert_eq!(mock.requests().len(), 1);
//! ```

pub mod http;
pub mod memory;

use crate::error::{Error, Result};
use crate::types::{Request, Response};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Posts a serialized JSON-RPC request and returns the parsed response.
///
/// Implementations do not interpret the response envelope; a device-side
/// `error` field is returned as data, not as an `Err`.
pub trait Transport: Send + Sync {
    /// Post `payload` and return the parsed response document.
    ///
    /// # Errors
    ///
    /// Returns an error if the call could not be completed (network,
    /// authentication, timeout, unparseable body).
    fn post(&self, payload: &str) -> Result<Value>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, payload: &str) -> Result<Value> {
        (**self).post(payload)
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Raw(Value),
    Result(Value),
    DeviceError(Value),
    Fail(String),
}

/// Mock transport with scripted replies.
///
/// Replies are consumed in order, one per `post`. Every request is
/// recorded so tests can assert on what was sent.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
    /// Create a mock with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response document, returned as-is.
    pub fn respond_raw(&self, response: Value) {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).push_back(Reply::Raw(response));
    }

    /// Queue a successful response whose `result` is `result`.
    pub fn respond_result(&self, result: Value) {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).push_back(Reply::Result(result));
    }

    /// Queue a response carrying a device-side error payload.
    pub fn respond_error(&self, error: Value) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Reply::DeviceError(error));
    }

    /// Queue a transport-level failure.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Reply::Fail(message.into()));
    }

    /// All requests posted so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of replies not yet consumed.
    pub fn pending_replies(&self) -> usize {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Transport for MockTransport {
    fn post(&self, payload: &str) -> Result<Value> {
        let request: Request =
            serde_json::from_str(payload).map_err(|e| Error::Encode(e.to_string()))?;
        let id = request.id;
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| Error::Other(format!("no scripted reply for request {}", id)))?;

        let response = match reply {
            Reply::Raw(value) => return Ok(value),
            Reply::Result(result) => Response::success(id, result),
            Reply::DeviceError(error) => Response::failure(id, error),
            Reply::Fail(message) => return Err(Error::http(message, None)),
        };
        Ok(serde_json::to_value(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Command, Method};
    use serde_json::json;

    fn payload(id: u64) -> String {
        Request::new(Method::Get, vec![Command::get("/system")], id)
            .to_payload()
            .unwrap()
    }

    #[test]
    fn test_mock_replies_in_order() {
        let mock = MockTransport::new();
        mock.respond_result(json!({"a": 1}));
        mock.respond_error(json!({"message": "nope"}));

        let first = mock.post(&payload(1)).unwrap();
        assert_eq!(first["result"], json!({"a": 1}));
        assert_eq!(first["id"], 1);

        let second = mock.post(&payload(2)).unwrap();
        assert_eq!(second["error"]["message"], "nope");
        assert_eq!(mock.pending_replies(), 0);
    }

    #[test]
    fn test_mock_records_requests() {
        let mock = MockTransport::new();
        mock.respond_result(json!({}));
        mock.post(&payload(9)).unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, 9);
        assert_eq!(requests[0].method, Method::Get);
    }

    #[test]
    fn test_mock_without_script_errors() {
        let mock = MockTransport::new();
        assert!(mock.post(&payload(1)).is_err());
    }

    #[test]
    fn test_mock_transport_failure() {
        let mock = MockTransport::new();
        mock.fail_with("connection refused");
        let err = mock.post(&payload(1)).unwrap_err();
        assert!(err.is_retryable());
    }
}
